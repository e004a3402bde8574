//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the search itself and match
//! execution so clients can bubble them up with consistent context.

use tactics_core::{ExecuteError, SearchError, Team};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("search worker command channel closed")]
    CommandChannelClosed,

    #[error("search worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("search worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("search task panicked")]
    SearchPanicked,

    #[error("search request {id} was superseded by request {latest}")]
    Superseded { id: u64, latest: u64 },

    #[error("search depth {depth} is outside 1..={max}")]
    InvalidDepth { depth: u32, max: u32 },

    #[error("search failed")]
    Search(#[source] SearchError),

    #[error("{team} move provider not set")]
    ProviderNotSet { team: Team },

    #[error("runtime requires a catalog before building")]
    MissingCatalog,

    #[error("runtime requires an initial game state before building")]
    MissingState,

    #[error("the match is already over")]
    GameOver,

    #[error("action rejected by the engine")]
    Execute(#[source] ExecuteError),
}
