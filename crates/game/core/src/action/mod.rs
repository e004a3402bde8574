//! Player actions and their transitions.
//!
//! A unit action is a move to `to`, optionally followed by an interaction
//! with whatever stands at `target`: a foe is attacked, an ally is assisted
//! and a breakable block is struck. System actions manage turns and the
//! pre-battle swap phase.
//!
//! - `generate`: legal action enumeration and validation
//! - `unit`: the unit action transition
//! - `turn`: end turn, surrender and swap-phase transitions

mod generate;
mod turn;
mod unit;

pub use generate::{check_unit_action, generate_actions, generate_team_actions, is_valid_action};
pub use turn::{EndSwapPhaseAction, EndTurnAction, SurrenderAction, SwapStartingPositionsAction};
pub use unit::{UnitAction, UnitActionKind};

use crate::env::GameEnv;
use crate::state::{GameState, Team};

/// Defines how a concrete action variant mutates game state.
///
/// Implementors override the validation hooks to surface pre- and
/// post-conditions that must hold around the state mutation. The hooks
/// receive read-only access to the catalog and configuration via `Env` and
/// must stay side-effect free.
pub trait ActionTransition {
    type Error;
    type Result;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly. Implementations
    /// may assume that `pre_validate` has already run successfully.
    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// System action variants (turn and swap-phase management).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemAction {
    EndTurn(EndTurnAction),
    Surrender(SurrenderAction),
    EndSwapPhase(EndSwapPhaseAction),
    SwapStartingPositions(SwapStartingPositionsAction),
}

/// Top-level action: a unit action or a system action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Unit(UnitAction),
    System(SystemAction),
}

impl Action {
    pub fn end_turn() -> Self {
        Self::System(SystemAction::EndTurn(EndTurnAction))
    }

    pub fn surrender(team: Team) -> Self {
        Self::System(SystemAction::Surrender(SurrenderAction { team }))
    }

    pub fn end_swap_phase() -> Self {
        Self::System(SystemAction::EndSwapPhase(EndSwapPhaseAction))
    }

    pub fn swap_starting_positions(a: crate::state::Position, b: crate::state::Position) -> Self {
        Self::System(SystemAction::SwapStartingPositions(
            SwapStartingPositionsAction { a, b },
        ))
    }

    pub fn as_unit(&self) -> Option<&UnitAction> {
        match self {
            Action::Unit(action) => Some(action),
            Action::System(_) => None,
        }
    }

    pub fn is_end_turn(&self) -> bool {
        matches!(self, Action::System(SystemAction::EndTurn(_)))
    }
}

impl From<UnitAction> for Action {
    fn from(action: UnitAction) -> Self {
        Self::Unit(action)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Unit(action) => action.fmt(f),
            Action::System(SystemAction::EndTurn(_)) => f.write_str("end turn"),
            Action::System(SystemAction::Surrender(action)) => write!(f, "{} surrenders", action.team),
            Action::System(SystemAction::EndSwapPhase(_)) => f.write_str("end swap phase"),
            Action::System(SystemAction::SwapStartingPositions(action)) => {
                write!(f, "swap {} and {}", action.a, action.b)
            }
        }
    }
}
