//! Match setup, state queries and the action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! mutation flows through the same three-phase pipeline
//! (`pre_validate → apply → post_validate`) and ends with a rehash, so
//! structurally identical states always share a content hash. Queries such
//! as [`calculate_combat_result`] never mutate their input.

mod assist;
mod combat;
mod errors;
mod outcome;
mod transition;
mod turns;

pub use assist::heal_amount;
pub use errors::{ActionError, ExecuteError, TransitionPhase, TransitionPhaseError};
pub use outcome::{ActionOutcome, OutcomeEvent, ScoreKind};
pub use turns::capture_presence;

pub(crate) use assist::perform_assist;
pub(crate) use combat::perform_combat;
pub(crate) use turns::{
    check_auto_end_turn, check_game_over, end_swap_phase, end_turn, surrender,
    swap_starting_positions,
};

use std::collections::BTreeSet;

use crate::action::{Action, UnitAction};
use crate::build::{Build, BuildError, instantiate, validate_team};
use crate::combat::{CombatError, CombatResult};
use crate::env::{CatalogOracle, Env, GameEnv, MapDescriptor};
use crate::range::{self, MovementRange};
use crate::state::{GameMode, GameState, Position, Team, UnitId};

// ============================================================================
// Setup
// ============================================================================

/// Creates a match in its swap phase.
///
/// Builds are validated per team, then placed on the map's starting
/// positions in roster order. The first unit of each roster is its captain.
///
/// # Errors
///
/// Returns [`BuildError`] if a build or team is invalid or a team has more
/// units than starting positions.
pub fn new_game<C>(
    env: &Env<'_, C>,
    map: MapDescriptor,
    builds: [&[Build]; 2],
    mode: GameMode,
) -> Result<GameState, BuildError>
where
    C: CatalogOracle + ?Sized,
{
    let mut teams = [Vec::new(), Vec::new()];
    for team in Team::ALL {
        let roster = builds[team.index()];
        validate_team(env, mode, roster)?;

        let positions = map.starting_positions(team);
        if roster.len() > positions.len() {
            return Err(BuildError::NotEnoughStartingPositions {
                team,
                available: positions.len(),
                units: roster.len(),
            });
        }
        for (slot, (build, &position)) in roster.iter().zip(positions).enumerate() {
            teams[team.index()].push(instantiate(env, build, team, slot, position)?);
        }
    }
    Ok(GameState::new(mode, map, teams, env.config()))
}

// ============================================================================
// Queries
// ============================================================================

/// Resolves the engagement `attacker → defender` as it would happen from
/// the attacker's current tile.
///
/// # Errors
///
/// Returns [`CombatError`] if either unit is missing or both share a team.
pub fn calculate_combat_result(
    env: &GameEnv<'_>,
    state: &GameState,
    attacker: UnitId,
    defender: UnitId,
) -> Result<CombatResult, CombatError> {
    crate::combat::resolve(env, state, attacker, defender)
}

/// Forecast of an attack action: the attacker first moves to `action.to`.
///
/// # Errors
///
/// Returns [`ActionError`] if the action does not describe an attack.
pub fn preview_attack(
    env: &GameEnv<'_>,
    state: &GameState,
    action: &UnitAction,
) -> Result<CombatResult, ActionError> {
    let crate::action::UnitActionKind::Attack(defender) = action.kind(state)? else {
        return Err(ActionError::NoTarget(action.target.unwrap_or(action.to)));
    };
    let attacker = state.unit_at(action.from).ok_or(ActionError::NoUnitAt(action.from))?.id;
    let mut moved = state.clone();
    moved.require_mut(attacker)?.position = action.to;
    Ok(crate::combat::resolve(env, &moved, attacker, defender)?)
}

/// Tiles `unit` can end its move on, with the path to each.
///
/// # Errors
///
/// Returns [`ActionError`] if the unit is missing or references an unknown ability.
pub fn calculate_movement_range(
    env: &GameEnv<'_>,
    state: &GameState,
    unit: UnitId,
) -> Result<MovementRange, ActionError> {
    let unit = state.require(unit)?;
    Ok(range::movement_range(env, state, unit, true)?)
}

/// Tiles `unit` could attack after moving.
///
/// # Errors
///
/// Returns [`ActionError`] if the unit is missing or references an unknown ability.
pub fn calculate_threat_range(
    env: &GameEnv<'_>,
    state: &GameState,
    unit: UnitId,
) -> Result<BTreeSet<Position>, ActionError> {
    let unit = state.require(unit)?;
    Ok(range::threat_range(env, state, unit)?)
}

// ============================================================================
// Engine
// ============================================================================

/// Game engine that executes actions against the authoritative state.
///
/// All state mutations flow through the three-phase action pipeline:
/// pre_validate → apply → post_validate
///
/// A failed `pre_validate` leaves the state untouched. A failed
/// `post_validate` means an invariant broke and the state must not be used
/// further.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Executes an action by routing it through the appropriate transition pipeline.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        action: &Action,
    ) -> Result<ActionOutcome, ExecuteError> {
        let result = transition::execute_transition(action, self.state, &env);
        let mutated = match &result {
            Ok(_) => true,
            Err(err) => err.phase() != TransitionPhase::PreValidate,
        };
        if mutated {
            self.state.rehash();
        }
        result
    }

    pub fn execute_action(
        &mut self,
        env: GameEnv<'_>,
        action: UnitAction,
    ) -> Result<ActionOutcome, ExecuteError> {
        self.execute(env, &Action::Unit(action))
    }

    pub fn end_turn(&mut self, env: GameEnv<'_>) -> Result<ActionOutcome, ExecuteError> {
        self.execute(env, &Action::end_turn())
    }

    pub fn surrender(&mut self, env: GameEnv<'_>, team: Team) -> Result<ActionOutcome, ExecuteError> {
        self.execute(env, &Action::surrender(team))
    }

    pub fn end_swap_phase(&mut self, env: GameEnv<'_>) -> Result<ActionOutcome, ExecuteError> {
        self.execute(env, &Action::end_swap_phase())
    }

    pub fn swap_starting_positions(
        &mut self,
        env: GameEnv<'_>,
        a: Position,
        b: Position,
    ) -> Result<ActionOutcome, ExecuteError> {
        self.execute(env, &Action::swap_starting_positions(a, b))
    }
}
