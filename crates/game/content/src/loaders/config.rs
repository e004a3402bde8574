//! Game configuration loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{GameConfig, SearchConfig};

use crate::loaders::{LoadResult, read_file};

/// Match rules and search tuning read from one TOML file.
///
/// Both sections are optional; missing keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub game: GameConfig,
    pub search: SearchConfig,
}

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<ContentConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ContentConfig> {
        let config: ContentConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}
