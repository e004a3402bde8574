use super::ActionTransition;
use crate::engine::{self, ActionError, ActionOutcome};
use crate::env::GameEnv;
use crate::state::{GameState, Position, Team};

fn ensure_in_play(state: &GameState) -> Result<(), ActionError> {
    if state.game_over {
        return Err(ActionError::GameOver);
    }
    if state.swap_phase {
        return Err(ActionError::SwapPhase);
    }
    Ok(())
}

fn ensure_swap_phase(state: &GameState) -> Result<(), ActionError> {
    if state.game_over {
        return Err(ActionError::GameOver);
    }
    if !state.swap_phase {
        return Err(ActionError::NotSwapPhase);
    }
    Ok(())
}

fn validate(state: &GameState) -> Result<(), ActionError> {
    state.validate().map_err(ActionError::from)
}

/// Ends the current team's turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurnAction;

impl ActionTransition for EndTurnAction {
    type Error = ActionError;
    type Result = ActionOutcome;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        ensure_in_play(state)
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Result, Self::Error> {
        let mut events = Vec::new();
        engine::end_turn(env, state, &mut events)?;
        Ok(ActionOutcome::new(events))
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        validate(state)
    }
}

/// Concedes the match for `team`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurrenderAction {
    pub team: Team,
}

impl ActionTransition for SurrenderAction {
    type Error = ActionError;
    type Result = ActionOutcome;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if state.game_over {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<Self::Result, Self::Error> {
        let mut events = Vec::new();
        engine::surrender(state, self.team, &mut events);
        Ok(ActionOutcome::new(events))
    }
}

/// Leaves the swap phase and starts the first turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndSwapPhaseAction;

impl ActionTransition for EndSwapPhaseAction {
    type Error = ActionError;
    type Result = ActionOutcome;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        ensure_swap_phase(state)
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Result, Self::Error> {
        let mut events = Vec::new();
        engine::end_swap_phase(env, state, &mut events)?;
        Ok(ActionOutcome::new(events))
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        validate(state)
    }
}

/// Exchanges whatever stands on two starting positions of the same team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapStartingPositionsAction {
    pub a: Position,
    pub b: Position,
}

impl SwapStartingPositionsAction {
    fn owner(state: &GameState, position: Position) -> Result<Team, ActionError> {
        Team::ALL
            .into_iter()
            .find(|&team| state.map.starting_positions(team).contains(&position))
            .ok_or(ActionError::NotStartingPosition(position))
    }
}

impl ActionTransition for SwapStartingPositionsAction {
    type Error = ActionError;
    type Result = ActionOutcome;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        ensure_swap_phase(state)?;
        if Self::owner(state, self.a)? != Self::owner(state, self.b)? {
            return Err(ActionError::MixedStartingPositions(self.a, self.b));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _env: &GameEnv<'_>) -> Result<Self::Result, Self::Error> {
        let team = Self::owner(state, self.a)?;
        let mut events = Vec::new();
        engine::swap_starting_positions(state, team, self.a, self.b, &mut events);
        Ok(ActionOutcome::new(events))
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        validate(state)
    }
}
