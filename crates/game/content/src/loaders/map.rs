//! Map data loader.
//!
//! Maps are stored as textual layouts, one string per row, using the
//! terrain glyphs understood by [`MapDescriptor::from_layout`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::env::Block;
use tactics_core::{MapDescriptor, Position};

use crate::loaders::{LoadResult, read_file};

/// Map data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    id: String,
    layout: Vec<String>,
    #[serde(default)]
    defensive_tiles: Vec<Position>,
    #[serde(default)]
    blocks: Vec<Block>,
    starting_positions: StartingPositionsRon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StartingPositionsRon {
    blue: Vec<Position>,
    red: Vec<Position>,
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<MapDescriptor> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MapDescriptor> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let starts = [data.starting_positions.blue, data.starting_positions.red];
        MapDescriptor::from_layout(&data.id, &data.layout, data.defensive_tiles, data.blocks, starts)
            .map_err(|e| anyhow::anyhow!("Invalid map '{}': {}", data.id, e))
    }
}
