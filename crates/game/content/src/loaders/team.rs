//! Named team rosters.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::Build;

use crate::loaders::{LoadResult, read_file};

/// Roster file structure for RON files. The first build of a roster
/// captains it in duel mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamCatalog {
    pub teams: BTreeMap<String, Vec<Build>>,
}

impl TeamCatalog {
    pub fn get(&self, name: &str) -> LoadResult<&[Build]> {
        self.teams
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| anyhow::anyhow!("Unknown team '{}'", name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.teams.keys().map(String::as_str)
    }
}

/// Loader for team rosters from RON files.
pub struct TeamLoader;

impl TeamLoader {
    pub fn load(path: &Path) -> LoadResult<TeamCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TeamCatalog> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse team RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::Stat;
    use tactics_core::build::BUILD_LEVEL;

    #[test]
    fn builds_fill_in_defaults() {
        let catalog = TeamLoader::parse(
            r#"(teams: {
                "pair": [
                    (hero: "ALFONSE", merges: 3, boon: Some(Atk), skills: ["IRON_SWORD"]),
                    (hero: "SHARENA"),
                ],
            })"#,
        )
        .unwrap();

        let pair = catalog.get("pair").unwrap();
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0].level, BUILD_LEVEL);
        assert_eq!(pair[0].merges, 3);
        assert_eq!(pair[0].boon, Some(Stat::Atk));
        assert_eq!(pair[0].bane, None);
        assert_eq!(pair[1].skills, Vec::new());
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["pair"]);
    }

    #[test]
    fn unknown_team_is_an_error() {
        let catalog = TeamCatalog::default();
        let err = catalog.get("ghosts").unwrap_err();
        assert_eq!(err.to_string(), "Unknown team 'ghosts'");
    }
}
