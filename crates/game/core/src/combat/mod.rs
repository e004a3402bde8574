//! Combat resolution.
//!
//! [`resolve`] computes the full, deterministic attack sequence of one
//! engagement on combat copies of the two units. Nothing here writes to the
//! board: the engine applies a [`CombatResult`] afterwards.
//!
//! - [`Combatant`]: in-combat view of a unit (temp stats, flags, counters)
//! - [`CombatFlags`]: flags accumulated from effects, resolved without stacking
//! - [`damage`]: the per-hit damage formula and percentage reductions

mod combatant;
pub mod damage;
mod flags;
mod resolve;
mod result;

pub use combatant::Combatant;
pub use damage::{aoe_damage, apply_percent_reductions, calculate_damage};
pub use flags::{CombatFlags, CombatSwitches, StatMask};
pub use resolve::resolve;
pub use result::{CombatResult, Hit};

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{StateError, UnitId};

/// Errors raised while resolving an engagement.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error("units {0} and {1} are on the same team")]
    SameTeam(UnitId, UnitId),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::Oracle(err) => err.severity(),
            CombatError::State(err) => err.severity(),
            CombatError::SameTeam(..) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::Oracle(err) => err.error_code(),
            CombatError::State(err) => err.error_code(),
            CombatError::SameTeam(..) => "COMBAT_SAME_TEAM",
        }
    }
}
