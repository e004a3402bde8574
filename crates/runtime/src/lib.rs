//! Async runtime around the deterministic tactics engine.
//!
//! This crate runs the minimax search off the caller's control flow and
//! drives matches through pluggable move providers. Consumers embed
//! [`Runtime`] to play a match, subscribe to events, and request moves
//! through [`SearchHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides a topic-based event bus
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{EndTurnProvider, MoveProvider, Result, RuntimeError, SearchHandle};
pub use events::{Event, EventBus, MatchEvent, SearchEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::{MetricsSnapshot, SearchCommand, SearchMetrics, SearchRequest};
