use super::{ActionTransition, check_unit_action};
use crate::engine::{self, ActionError, ActionOutcome, OutcomeEvent};
use crate::env::GameEnv;
use crate::state::{GameState, Position, UnitId};

/// Move `from → to`, then interact with `target` if present.
///
/// Actions are addressed by tile so they can be compared and replayed
/// independently of unit identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitAction {
    pub from: Position,
    pub to: Position,
    pub target: Option<Position>,
}

/// What a unit action does, resolved against the current board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitActionKind {
    Move,
    Attack(UnitId),
    Assist(UnitId),
    BlockAttack(Position),
}

impl UnitActionKind {
    pub fn is_attack(self) -> bool {
        matches!(self, UnitActionKind::Attack(_))
    }
}

impl UnitAction {
    pub const fn moving(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            target: None,
        }
    }

    pub const fn targeting(from: Position, to: Position, target: Position) -> Self {
        Self {
            from,
            to,
            target: Some(target),
        }
    }

    /// Resolves what the action does on `state`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoUnitAt`] if nobody stands on `from` and
    /// [`ActionError::NoTarget`] if `target` holds neither a unit nor a
    /// breakable block.
    pub fn kind(&self, state: &GameState) -> Result<UnitActionKind, ActionError> {
        let actor = state
            .unit_at(self.from)
            .ok_or(ActionError::NoUnitAt(self.from))?;
        let Some(target) = self.target else {
            return Ok(UnitActionKind::Move);
        };
        if let Some(unit) = state.unit_at(target).filter(|unit| unit.id != actor.id) {
            return Ok(if unit.team == actor.team {
                UnitActionKind::Assist(unit.id)
            } else {
                UnitActionKind::Attack(unit.id)
            });
        }
        match state.map.block_at(target) {
            Some(block) if block.breakable && block.hp > 0 => Ok(UnitActionKind::BlockAttack(target)),
            _ => Err(ActionError::NoTarget(target)),
        }
    }
}

impl std::fmt::Display for UnitAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        if let Some(target) = self.target {
            write!(f, " @ {target}")?;
        }
        Ok(())
    }
}

impl ActionTransition for UnitAction {
    type Error = ActionError;
    type Result = ActionOutcome;

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        check_unit_action(env, state, self)
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Result, Self::Error> {
        let kind = self.kind(state)?;
        let actor = state.unit_at(self.from).ok_or(ActionError::NoUnitAt(self.from))?.id;
        let mut events = Vec::new();

        let unit = state.require_mut(actor)?;
        unit.position = self.to;
        unit.has_action = false;
        if self.from != self.to {
            events.push(OutcomeEvent::Moved {
                unit: actor,
                from: self.from,
                to: self.to,
            });
        }

        match kind {
            UnitActionKind::Move => {}
            UnitActionKind::BlockAttack(position) => {
                if let Some(block) = state.map.block_at_mut(position) {
                    block.hp -= 1;
                    events.push(OutcomeEvent::BlockDamaged {
                        position,
                        hp: block.hp,
                    });
                }
            }
            UnitActionKind::Assist(target) => {
                engine::perform_assist(env, state, actor, target, &mut events)?;
            }
            UnitActionKind::Attack(target) => {
                engine::perform_combat(env, state, actor, target, &mut events)?;
            }
        }

        if let Some(unit) = state.unit_mut(actor) {
            unit.end_action();
        }
        engine::check_game_over(state, &mut events);
        if !state.game_over {
            engine::check_auto_end_turn(env, state, &mut events)?;
        }
        Ok(ActionOutcome::new(events))
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        state.validate().map_err(ActionError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_target() {
        let action = UnitAction::targeting(Position::new(0, 0), Position::new(0, 1), Position::new(0, 2));
        assert_eq!(action.to_string(), "(0, 0) -> (0, 1) @ (0, 2)");
        assert_eq!(
            UnitAction::moving(Position::new(1, 1), Position::new(2, 1)).to_string(),
            "(1, 1) -> (2, 1)"
        );
    }
}
