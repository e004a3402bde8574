//! Best-move search for the team to move.
//!
//! Iterative deepening negamax with alpha-beta pruning over deep copies of
//! the state. Every branch runs through [`crate::engine::GameEngine`], so the
//! search sees exactly the rules the authoritative game applies. The search
//! is deterministic: the same state, depth and configuration always produce
//! the same move, node count and score.
//!
//! - `eval`: static evaluation from the side to move
//! - `table`: transposition table with exact and bound entries
//! - `ordering`: PV, attack, killer, assist and history move ordering
//! - `negamax`: the tree walk and quiescence extension

mod eval;
mod negamax;
mod ordering;
mod table;

pub use eval::evaluate;
pub use table::{Bound, TableEntry, TranspositionTable};

use crate::action::Action;
use crate::config::SearchConfig;
use crate::engine::ExecuteError;
use crate::env::{GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::GameState;

use negamax::Searcher;

/// Bound on every score the search returns.
pub const INFINITY: i32 = 50_000;
/// Score of a win at the root. A win `n` plies deep scores `WIN - n`.
pub const WIN: i32 = 49_000;
pub const DRAW: i32 = 0;

/// Result of a completed search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOutcome {
    /// Best action found; ending the turn when nothing scores better.
    pub best: Option<Action>,
    /// Score of `best` from the point of view of the team to move.
    pub score: i32,
    pub depth: u32,
    /// Nodes visited over all iterations.
    pub nodes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search depth must be at least 1")]
    InvalidDepth,

    #[error("the game is already over")]
    GameOver,

    #[error("cannot search during the swap phase")]
    SwapPhase,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("explored action failed: {0}")]
    Execute(Box<ExecuteError>),
}

impl GameError for SearchError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SearchError::InvalidDepth | SearchError::GameOver | SearchError::SwapPhase => {
                ErrorSeverity::Validation
            }
            SearchError::Oracle(err) => err.severity(),
            SearchError::Execute(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SearchError::InvalidDepth => "SEARCH_INVALID_DEPTH",
            SearchError::GameOver => "SEARCH_GAME_OVER",
            SearchError::SwapPhase => "SEARCH_SWAP_PHASE",
            SearchError::Oracle(err) => err.error_code(),
            SearchError::Execute(err) => err.error_code(),
        }
    }
}

/// Searches `state` to `depth` plies and returns the best action for the
/// team to move. `state` is not modified.
///
/// # Errors
///
/// Returns [`SearchError`] if `depth` is zero, the match is not in play, or
/// an explored action breaks a state invariant.
pub fn best_move(
    env: &GameEnv<'_>,
    state: &GameState,
    depth: u32,
    config: &SearchConfig,
) -> Result<SearchOutcome, SearchError> {
    if depth == 0 {
        return Err(SearchError::InvalidDepth);
    }
    if state.game_over {
        return Err(SearchError::GameOver);
    }
    if state.swap_phase {
        return Err(SearchError::SwapPhase);
    }

    let mut searcher = Searcher::new(env, config);
    let mut outcome = SearchOutcome {
        best: None,
        score: -INFINITY,
        depth: 0,
        nodes: 0,
    };
    for current in 1..=depth {
        outcome.score = searcher.negamax(state, -INFINITY, INFINITY, current)?;
        outcome.best = searcher.root_best.or(outcome.best);
        outcome.depth = current;
    }
    outcome.nodes = searcher.nodes;
    Ok(outcome)
}
