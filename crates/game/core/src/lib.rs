//! Deterministic rules of the tactics game.
//!
//! `tactics-core` defines the canonical rules (abilities, effects, ranges,
//! combat, turns) and exposes pure APIs that can be reused by the runtime,
//! content tooling and tests. All state mutation flows through
//! [`engine::GameEngine`]; every other entry point only reads the state it
//! is given.
pub mod ability;
pub mod action;
pub mod build;
pub mod combat;
pub mod config;
pub mod effects;
pub mod engine;
pub mod env;
pub mod error;
pub mod range;
pub mod search;
pub mod state;

pub use ability::{
    AbilityCategory, AbilityDefinition, AbilityKind, Catalog, Effect, HeroDefinition, MoveType,
    Phase, WeaponType,
};
pub use action::{
    Action, ActionTransition, SystemAction, UnitAction, UnitActionKind, generate_actions,
    generate_team_actions, is_valid_action,
};
pub use build::{Build, BuildError};
pub use combat::{CombatError, CombatResult, Hit};
pub use config::{CaptureArea, GameConfig, SearchConfig};
pub use engine::{
    ActionError, ActionOutcome, ExecuteError, GameEngine, OutcomeEvent, TransitionPhase,
    TransitionPhaseError, calculate_combat_result, calculate_movement_range,
    calculate_threat_range, new_game, preview_attack,
};
pub use env::{CatalogError, CatalogOracle, Env, GameEnv, MapDescriptor, OracleError, TerrainKind};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use range::MovementRange;
pub use search::{SearchError, SearchOutcome, best_move};
pub use state::{
    DuelState, GameMode, GameState, MatchResult, Position, Stat, StatLine, StateError, Team, Unit,
    UnitId,
};
