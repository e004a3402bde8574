//! Error types for the transition pipeline.

use crate::action::{
    ActionTransition, EndSwapPhaseAction, EndTurnAction, SurrenderAction,
    SwapStartingPositionsAction, UnitAction,
};
use crate::combat::CombatError;
use crate::env::OracleError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{Position, StateError, Team, UnitId};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "E: serde::Deserialize<'de>, 'de: 'static"))
)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
    /// Turn and acting unit the transition ran for.
    pub context: ErrorContext,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self {
            phase,
            error,
            context: ErrorContext::default(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// True if the failure happened before any mutation.
    pub fn left_state_untouched(&self) -> bool {
        self.phase == TransitionPhase::PreValidate
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

// ============================================================================
// Action Errors
// ============================================================================

/// Rejected player intent and failures raised while applying an action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,

    #[error("units cannot act during the swap phase")]
    SwapPhase,

    #[error("the swap phase has already ended")]
    NotSwapPhase,

    #[error("no unit stands at {0}")]
    NoUnitAt(Position),

    #[error("unit {unit} belongs to {team}, but it is {current}'s turn")]
    NotCurrentTeam {
        unit: UnitId,
        team: Team,
        current: Team,
    },

    #[error("unit {0} has already acted")]
    AlreadyActed(UnitId),

    #[error("unit {unit} cannot perform this action")]
    Illegal { unit: UnitId },

    #[error("nothing to target at {0}")]
    NoTarget(Position),

    #[error("{0} is not a starting position")]
    NotStartingPosition(Position),

    #[error("starting positions {0} and {1} belong to different teams")]
    MixedStartingPositions(Position, Position),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            GameOver | SwapPhase | NotSwapPhase => ErrorSeverity::Recoverable,
            NotCurrentTeam { .. } | AlreadyActed(_) | Illegal { .. } => ErrorSeverity::Recoverable,
            NoUnitAt(_) | NoTarget(_) => ErrorSeverity::Validation,
            NotStartingPosition(_) | MixedStartingPositions(..) => ErrorSeverity::Validation,
            Combat(err) => err.severity(),
            Oracle(err) => err.severity(),
            State(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            GameOver => "ACTION_GAME_OVER",
            SwapPhase => "ACTION_SWAP_PHASE",
            NotSwapPhase => "ACTION_NOT_SWAP_PHASE",
            NoUnitAt(_) => "ACTION_NO_UNIT",
            NotCurrentTeam { .. } => "ACTION_NOT_CURRENT_TEAM",
            AlreadyActed(_) => "ACTION_ALREADY_ACTED",
            Illegal { .. } => "ACTION_ILLEGAL",
            NoTarget(_) => "ACTION_NO_TARGET",
            NotStartingPosition(_) => "ACTION_NOT_STARTING_POSITION",
            MixedStartingPositions(..) => "ACTION_MIXED_STARTING_POSITIONS",
            Combat(err) => err.error_code(),
            Oracle(err) => err.error_code(),
            State(err) => err.error_code(),
        }
    }
}

// ============================================================================
// Execute Errors
// ============================================================================

/// Errors surfaced while executing an action through the game engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound(deserialize = "'de: 'static")))]
pub enum ExecuteError {
    #[error("unit action failed: {0}")]
    Unit(TransitionPhaseError<<UnitAction as ActionTransition>::Error>),

    #[error("end turn failed: {0}")]
    EndTurn(TransitionPhaseError<<EndTurnAction as ActionTransition>::Error>),

    #[error("surrender failed: {0}")]
    Surrender(TransitionPhaseError<<SurrenderAction as ActionTransition>::Error>),

    #[error("end swap phase failed: {0}")]
    EndSwapPhase(TransitionPhaseError<<EndSwapPhaseAction as ActionTransition>::Error>),

    #[error("swap starting positions failed: {0}")]
    SwapStartingPositions(
        TransitionPhaseError<<SwapStartingPositionsAction as ActionTransition>::Error>,
    ),
}

impl ExecuteError {
    pub fn phase(&self) -> TransitionPhase {
        self.inner().phase
    }

    /// The action error, whichever transition raised it.
    pub fn action_error(&self) -> &ActionError {
        &self.inner().error
    }

    fn inner(&self) -> &TransitionPhaseError<ActionError> {
        match self {
            ExecuteError::Unit(err)
            | ExecuteError::EndTurn(err)
            | ExecuteError::Surrender(err)
            | ExecuteError::EndSwapPhase(err)
            | ExecuteError::SwapStartingPositions(err) => err,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        let inner = self.inner();
        match inner.phase {
            // A broken invariant after mutation is never recoverable.
            TransitionPhase::PostValidate => ErrorSeverity::Fatal,
            _ => inner.error.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        Some(&self.inner().context)
    }

    fn error_code(&self) -> &'static str {
        self.action_error().error_code()
    }
}
