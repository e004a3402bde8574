//! State invariant violations.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, UnitId};

/// Broken state invariants. These indicate defects; the engine refuses to
/// continue once one is detected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    #[error("unit {0} appears more than once")]
    DuplicateUnitId(UnitId),

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {unit} has hp {hp} outside [0, {max}]")]
    HpOutOfRange { unit: UnitId, hp: i32, max: i32 },

    #[error("defeated unit {0} is still on the board")]
    DefeatedOnBoard(UnitId),

    #[error("units {first} and {second} share {position}")]
    SharedTile {
        position: Position,
        first: UnitId,
        second: UnitId,
    },

    #[error("unit {unit} stands outside the map at {position}")]
    OffMap { unit: UnitId, position: Position },
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StateError::UnitNotFound(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StateError::DuplicateUnitId(_) => "STATE_DUPLICATE_UNIT_ID",
            StateError::UnitNotFound(_) => "STATE_UNIT_NOT_FOUND",
            StateError::HpOutOfRange { .. } => "STATE_HP_OUT_OF_RANGE",
            StateError::DefeatedOnBoard(_) => "STATE_DEFEATED_ON_BOARD",
            StateError::SharedTile { .. } => "STATE_SHARED_TILE",
            StateError::OffMap { .. } => "STATE_OFF_MAP",
        }
    }
}
