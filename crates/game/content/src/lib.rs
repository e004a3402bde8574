//! Data-driven content and loaders.
//!
//! This crate ships the bundled game data and loads RON/TOML files into
//! `tactics-core` types:
//! - Ability catalog (weapons, assists, specials, passives, captain skills, statuses)
//! - Hero definitions
//! - Map layouts
//! - Named team rosters
//! - Match rules and search tuning
//!
//! Content feeds the catalog oracle and match setup; it never appears in game
//! state beyond the map copy a match owns.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ConfigLoader, ContentConfig, ContentFactory, HeroLoader, LoadResult, MapLoader,
    TeamCatalog, TeamLoader,
};
