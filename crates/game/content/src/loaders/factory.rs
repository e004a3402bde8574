//! Content factory for building the catalog and match inputs from data files.

use std::path::{Path, PathBuf};

use tactics_core::{AbilityDefinition, Catalog, HeroDefinition, MapDescriptor};

use crate::loaders::{
    AbilityLoader, ConfigLoader, ContentConfig, HeroLoader, LoadResult, MapLoader, TeamCatalog,
    TeamLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── heroes.ron
/// ├── teams.ron
/// └── maps/
///     ├── duel_field.ron
///     └── river_fort.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load match rules and search tuning from `config.toml`.
    pub fn load_config(&self) -> LoadResult<ContentConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load base ability definitions from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<AbilityDefinition>> {
        let path = self.data_dir.join("abilities.ron");
        AbilityLoader::load(&path)
    }

    /// Load hero definitions from `heroes.ron`.
    pub fn load_heroes(&self) -> LoadResult<Vec<HeroDefinition>> {
        let path = self.data_dir.join("heroes.ron");
        HeroLoader::load(&path)
    }

    /// Load abilities and heroes and build the validated catalog.
    ///
    /// Refined weapons and sacred seals are derived during the build.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let abilities = self.load_abilities()?;
        let heroes = self.load_heroes()?;
        Catalog::build(abilities, heroes)
            .map_err(|e| anyhow::anyhow!("Invalid catalog in {}: {}", self.data_dir.display(), e))
    }

    /// Load named rosters from `teams.ron`.
    pub fn load_teams(&self) -> LoadResult<TeamCatalog> {
        let path = self.data_dir.join("teams.ron");
        TeamLoader::load(&path)
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<MapDescriptor> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Names of every map file under `maps/`, sorted.
    pub fn map_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("maps");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
