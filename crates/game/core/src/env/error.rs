//! Catalog and oracle access errors.

use crate::ability::Phase;
use crate::error::{ErrorSeverity, GameError};
use crate::state::AbilityId;

/// Errors that occur when looking up read-only game data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("ability '{0}' not found")]
    AbilityNotFound(String),

    #[error("hero '{0}' not found")]
    HeroNotFound(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            OracleError::AbilityNotFound(_) => "ORACLE_ABILITY_NOT_FOUND",
            OracleError::HeroNotFound(_) => "ORACLE_HERO_NOT_FOUND",
        }
    }
}

/// Malformed catalog content. Always fatal: raised while building the
/// catalog, never during battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate ability id '{0}'")]
    DuplicateAbility(AbilityId),

    #[error("duplicate hero id '{0}'")]
    DuplicateHero(String),

    #[error("ability '{ability}' references unknown status '{status}'")]
    UnknownStatus { ability: AbilityId, status: AbilityId },

    #[error("ability '{ability}' has an effect in phase {phase}: {reason}")]
    PhaseMismatch {
        ability: AbilityId,
        phase: Phase,
        reason: &'static str,
    },

    #[error("ability '{ability}' is invalid: {reason}")]
    InvalidParameter {
        ability: AbilityId,
        reason: &'static str,
    },
}

impl CatalogError {
    pub(crate) fn phase(ability: &AbilityId, phase: Phase, reason: &'static str) -> Self {
        Self::PhaseMismatch {
            ability: ability.clone(),
            phase,
            reason,
        }
    }

    pub(crate) fn invalid(ability: &AbilityId, reason: &'static str) -> Self {
        Self::InvalidParameter {
            ability: ability.clone(),
            reason,
        }
    }
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::DuplicateAbility(_) => "CATALOG_DUPLICATE_ABILITY",
            CatalogError::DuplicateHero(_) => "CATALOG_DUPLICATE_HERO",
            CatalogError::UnknownStatus { .. } => "CATALOG_UNKNOWN_STATUS",
            CatalogError::PhaseMismatch { .. } => "CATALOG_PHASE_MISMATCH",
            CatalogError::InvalidParameter { .. } => "CATALOG_INVALID_PARAMETER",
        }
    }
}
