//! Content loaders for reading game data from files.
//!
//! Each loader converts one RON or TOML file into `tactics-core` types;
//! [`ContentFactory`] ties them to a data directory.

pub mod ability;
pub mod config;
pub mod factory;
pub mod map;
pub mod team;

pub use ability::{AbilityCatalog, AbilityLoader, HeroCatalog, HeroLoader};
pub use config::{ConfigLoader, ContentConfig};
pub use factory::ContentFactory;
pub use map::MapLoader;
pub use team::{TeamCatalog, TeamLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
