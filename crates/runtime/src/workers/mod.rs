//! Worker tasks that back the runtime orchestration.

mod metrics;
mod search;

pub use metrics::{MetricsSnapshot, SearchMetrics};
pub use search::{SearchCommand, SearchRequest, SearchWorker};

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use tactics_core::Catalog;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::SearchHandle;
use crate::events::EventBus;
use crate::runtime::RuntimeConfig;

/// Spawns a search worker and returns the handle that feeds it.
pub(crate) fn spawn_search_worker(
    catalog: Arc<Catalog>,
    config: &RuntimeConfig,
    event_bus: EventBus,
) -> (SearchHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
    let latest = Arc::new(AtomicU64::new(0));
    let metrics = Arc::new(SearchMetrics::new());

    let worker = SearchWorker::new(
        catalog,
        config.game_config.clone(),
        config.search_config.clone(),
        command_rx,
        Arc::clone(&latest),
        event_bus.clone(),
        Arc::clone(&metrics),
    );
    let join = tokio::spawn(worker.run());

    let handle = SearchHandle::new(
        command_tx,
        latest,
        event_bus,
        metrics,
        config.default_depth,
        config.max_depth,
    );
    (handle, join)
}
