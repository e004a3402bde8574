//! Cloneable façade for issuing search requests.
//!
//! [`SearchHandle`] hides channel plumbing and offers async helpers for
//! requesting moves or streaming events from specific topics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use tactics_core::{GameState, SearchOutcome};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{MetricsSnapshot, SearchCommand, SearchMetrics, SearchRequest};

/// Client-facing handle to the background search worker
#[derive(Clone)]
pub struct SearchHandle {
    command_tx: mpsc::Sender<SearchCommand>,
    latest: Arc<AtomicU64>,
    event_bus: EventBus,
    metrics: Arc<SearchMetrics>,
    default_depth: u32,
    max_depth: u32,
}

impl SearchHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<SearchCommand>,
        latest: Arc<AtomicU64>,
        event_bus: EventBus,
        metrics: Arc<SearchMetrics>,
        default_depth: u32,
        max_depth: u32,
    ) -> Self {
        Self {
            command_tx,
            latest,
            event_bus,
            metrics,
            default_depth,
            max_depth,
        }
    }

    /// Searches a copy of `state` to `depth` plies on the worker.
    ///
    /// Every call supersedes the ones issued before it: an older request
    /// resolves to [`RuntimeError::Superseded`] instead of a stale move.
    pub async fn best_move(&self, state: &GameState, depth: u32) -> Result<SearchOutcome> {
        if depth == 0 || depth > self.max_depth {
            return Err(RuntimeError::InvalidDepth {
                depth,
                max: self.max_depth,
            });
        }

        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let request = SearchRequest {
            id,
            state: state.clone(),
            depth,
        };
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(SearchCommand::BestMove {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        let outcome = reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)??;

        let latest = self.latest.load(Ordering::SeqCst);
        if id < latest {
            debug!(id, latest, "discarding superseded search result");
            self.metrics.record_superseded();
            return Err(RuntimeError::Superseded { id, latest });
        }
        Ok(outcome)
    }

    /// [`Self::best_move`] at the configured default depth.
    pub async fn best_move_default(&self, state: &GameState) -> Result<SearchOutcome> {
        self.best_move(state, self.default_depth).await
    }

    pub fn default_depth(&self) -> u32 {
        self.default_depth
    }

    /// Asks the worker to stop after the request it is serving.
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(SearchCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
