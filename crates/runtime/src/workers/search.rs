//! Background search worker.
//!
//! Requests are served one at a time. Each search runs on the blocking pool
//! over the state copy carried by its request; the worker never sees the
//! authoritative match state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use tactics_core::{Catalog, Env, GameConfig, GameState, SearchConfig, SearchOutcome, best_move};

use super::SearchMetrics;
use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, SearchEvent};

/// One best-move request over an owned copy of the state.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub id: u64,
    pub state: GameState,
    pub depth: u32,
}

/// Commands that can be sent to the search worker
pub enum SearchCommand {
    BestMove {
        request: SearchRequest,
        reply: oneshot::Sender<Result<SearchOutcome>>,
    },
    Shutdown,
}

pub struct SearchWorker {
    catalog: Arc<Catalog>,
    game_config: GameConfig,
    search_config: SearchConfig,
    command_rx: mpsc::Receiver<SearchCommand>,
    /// Id of the most recently issued request, shared with every handle.
    latest: Arc<AtomicU64>,
    event_bus: EventBus,
    metrics: Arc<SearchMetrics>,
}

impl SearchWorker {
    pub fn new(
        catalog: Arc<Catalog>,
        game_config: GameConfig,
        search_config: SearchConfig,
        command_rx: mpsc::Receiver<SearchCommand>,
        latest: Arc<AtomicU64>,
        event_bus: EventBus,
        metrics: Arc<SearchMetrics>,
    ) -> Self {
        Self {
            catalog,
            game_config,
            search_config,
            command_rx,
            latest,
            event_bus,
            metrics,
        }
    }

    /// Main worker loop. Ends on [`SearchCommand::Shutdown`] or once every
    /// sender is dropped.
    pub async fn run(mut self) {
        info!("search worker started");
        while let Some(command) = self.command_rx.recv().await {
            match command {
                SearchCommand::BestMove { request, reply } => {
                    let id = request.id;
                    let result = self.search(request).await;
                    if reply.send(result).is_err() {
                        debug!(id, "search reply channel closed");
                    }
                }
                SearchCommand::Shutdown => break,
            }
        }
        info!("search worker stopped");
    }

    async fn search(&self, request: SearchRequest) -> Result<SearchOutcome> {
        let SearchRequest { id, state, depth } = request;

        let latest = self.latest.load(Ordering::SeqCst);
        if id < latest {
            debug!(id, latest, "skipping superseded search request");
            self.metrics.record_superseded();
            return Err(RuntimeError::Superseded { id, latest });
        }

        self.event_bus.publish(Event::Search(SearchEvent::Started {
            id,
            depth,
            state_hash: state.hash(),
        }));

        let catalog = Arc::clone(&self.catalog);
        let game_config = self.game_config.clone();
        let search_config = self.search_config.clone();
        let started = Instant::now();

        let joined = tokio::task::spawn_blocking(move || {
            let env = Env::new(catalog.as_ref(), &game_config).into_game_env();
            best_move(&env, &state, depth, &search_config)
        })
        .await;
        let elapsed = started.elapsed();

        let result = match joined {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(err)) => Err(RuntimeError::Search(err)),
            Err(err) if err.is_panic() => Err(RuntimeError::SearchPanicked),
            Err(err) => Err(RuntimeError::WorkerJoin(err)),
        };

        match &result {
            Ok(outcome) => {
                info!(
                    id,
                    depth = outcome.depth,
                    nodes = outcome.nodes,
                    score = outcome.score,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "search completed"
                );
                self.metrics.record_completed(outcome.nodes, elapsed);
                self.event_bus.publish(Event::Search(SearchEvent::Completed {
                    id,
                    outcome: *outcome,
                    elapsed,
                }));
            }
            Err(err) => {
                warn!(id, error = %err, "search failed");
                self.metrics.record_failed();
                self.event_bus.publish(Event::Search(SearchEvent::Failed {
                    id,
                    reason: err.to_string(),
                }));
            }
        }
        result
    }
}
