//! Event payloads published on the bus.

use std::time::Duration;

use tactics_core::{Action, ActionOutcome, SearchOutcome, Team};

/// Lifecycle of one background search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Started {
        id: u64,
        depth: u32,
        state_hash: u64,
    },
    Completed {
        id: u64,
        outcome: SearchOutcome,
        elapsed: Duration,
    },
    Failed {
        id: u64,
        reason: String,
    },
}

impl SearchEvent {
    pub fn id(&self) -> u64 {
        match self {
            SearchEvent::Started { id, .. }
            | SearchEvent::Completed { id, .. }
            | SearchEvent::Failed { id, .. } => *id,
        }
    }
}

/// Progress of the authoritative match driven by [`crate::Runtime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    ActionExecuted {
        team: Team,
        action: Action,
        outcome: ActionOutcome,
        state_hash: u64,
    },
    /// `winner` is `None` for a draw.
    GameOver { winner: Option<Team> },
}
