//! High-level runtime orchestrator.
//!
//! The runtime owns the authoritative match state and the background search
//! worker, and exposes a builder-based API for clients to drive a match.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use tactics_core::{
    ActionOutcome, Catalog, Env, GameConfig, GameEngine, GameState, OutcomeEvent, SearchConfig,
    Team,
};

use crate::api::{MoveProvider, Result, RuntimeError, SearchHandle};
use crate::events::{Event, EventBus, MatchEvent, Topic};
use crate::workers::{MetricsSnapshot, spawn_search_worker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub search_config: SearchConfig,
    pub command_buffer: usize,
    pub event_buffer: usize,
    /// Depth used when a provider asks for a move without one.
    pub default_depth: u32,
    /// Deepest search a handle accepts.
    pub max_depth: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            search_config: SearchConfig::default(),
            command_buffer: 16,
            event_buffer: 64,
            default_depth: 2,
            max_depth: 6,
        }
    }
}

/// Main runtime that drives one match.
///
/// [`SearchHandle`] provides a cloneable façade to the search worker.
pub struct Runtime {
    handle: SearchHandle,
    catalog: Arc<Catalog>,
    game_config: GameConfig,
    state: GameState,
    providers: [Option<Box<dyn MoveProvider>>; 2],
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to the search worker
    pub fn handle(&self) -> SearchHandle {
        self.handle.clone()
    }

    /// Read-only view of the authoritative match.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.handle.metrics()
    }

    /// Set the move provider of `team`
    pub fn set_provider(&mut self, team: Team, provider: impl MoveProvider + 'static) {
        self.providers[team.index()] = Some(Box::new(provider));
    }

    /// Asks the provider of the team to move for an action and applies it.
    pub async fn step(&mut self) -> Result<ActionOutcome> {
        if self.state.game_over {
            return Err(RuntimeError::GameOver);
        }
        let team = self.state.current_turn;
        let provider = self.providers[team.index()]
            .as_deref()
            .ok_or(RuntimeError::ProviderNotSet { team })?;

        let action = provider.provide_move(&self.state).await?;

        let env = Env::new(self.catalog.as_ref(), &self.game_config).into_game_env();
        let outcome = GameEngine::new(&mut self.state)
            .execute(env, &action)
            .map_err(RuntimeError::Execute)?;
        debug!(%team, ?action, "action executed");

        let bus = self.handle.event_bus();
        bus.publish(Event::Match(MatchEvent::ActionExecuted {
            team,
            action,
            outcome: outcome.clone(),
            state_hash: self.state.hash(),
        }));

        let finished = outcome.events.iter().find_map(|event| match event {
            OutcomeEvent::GameOver { winner } => Some(*winner),
            _ => None,
        });
        if let Some(winner) = finished {
            info!(?winner, turn = self.state.turn_count, "match over");
            bus.publish(Event::Match(MatchEvent::GameOver { winner }));
        }
        Ok(outcome)
    }

    /// Steps until the match ends or `max_steps` actions were applied.
    /// Returns the number of actions applied.
    pub async fn run(&mut self, max_steps: usize) -> Result<usize> {
        let mut steps = 0;
        while steps < max_steps && !self.state.game_over {
            self.step().await?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await?;
        drop(self.providers);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<Catalog>>,
    state: Option<GameState>,
    providers: [Option<Box<dyn MoveProvider>>; 2],
    ai_teams: [bool; 2],
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            state: None,
            providers: [None, None],
            ai_teams: [false, false],
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required ability and hero catalog
    pub fn catalog(mut self, catalog: impl Into<Arc<Catalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Provide the match to drive
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the move provider of `team`
    pub fn provider(mut self, team: Team, provider: impl MoveProvider + 'static) -> Self {
        let slot = team.index();
        self.providers[slot] = Some(Box::new(provider));
        self.ai_teams[slot] = false;
        self
    }

    /// Let the search worker play `team`
    pub fn search_provider(mut self, team: Team) -> Self {
        let slot = team.index();
        self.providers[slot] = None;
        self.ai_teams[slot] = true;
        self
    }

    /// Build the runtime and spawn its search worker
    pub async fn build(self) -> Result<Runtime> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let state = self.state.ok_or(RuntimeError::MissingState)?;

        let event_bus = EventBus::with_capacity(self.config.event_buffer);
        let (handle, worker_handle) =
            spawn_search_worker(Arc::clone(&catalog), &self.config, event_bus);

        let mut providers = self.providers;
        for team in Team::ALL {
            if self.ai_teams[team.index()] {
                providers[team.index()] = Some(Box::new(handle.clone()));
            }
        }

        Ok(Runtime {
            handle,
            catalog,
            game_config: self.config.game_config,
            state,
            providers,
            worker_handle,
        })
    }
}
