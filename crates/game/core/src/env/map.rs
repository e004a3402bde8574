use crate::ability::MoveType;
use crate::state::{Position, Team};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }
}

/// Canonical terrain classes for map tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Plains,
    Forest,
    Trench,
    /// Water or mountains: only fliers may enter.
    FlierOnly,
    Wall,
}

impl TerrainKind {
    /// Glyph used in textual map layouts.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(TerrainKind::Plains),
            'T' => Some(TerrainKind::Forest),
            '_' => Some(TerrainKind::Trench),
            '^' => Some(TerrainKind::FlierOnly),
            '#' => Some(TerrainKind::Wall),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Plains => '.',
            TerrainKind::Forest => 'T',
            TerrainKind::Trench => '_',
            TerrainKind::FlierOnly => '^',
            TerrainKind::Wall => '#',
        }
    }

    /// Whether a unit of `move_type` may enter or stop on this terrain.
    pub fn admits(self, move_type: MoveType) -> bool {
        match self {
            TerrainKind::Wall => false,
            TerrainKind::FlierOnly => move_type == MoveType::Flier,
            TerrainKind::Forest => move_type != MoveType::Cavalry,
            TerrainKind::Plains | TerrainKind::Trench => true,
        }
    }

    /// Extra movement spent entering this tile.
    pub fn extra_cost(self, move_type: MoveType) -> i32 {
        match (self, move_type) {
            (TerrainKind::Forest, MoveType::Infantry) => 1,
            (TerrainKind::Trench, MoveType::Cavalry) => 2,
            _ => 0,
        }
    }
}

/// Destructible or permanent obstacle occupying a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub position: Position,
    pub breakable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hp: i32,
}

impl Block {
    /// Intact blocks stop movement, landing and attacks.
    pub fn is_intact(&self) -> bool {
        !self.breakable || self.hp > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map layout is empty")]
    EmptyLayout,
    #[error("row {row} has width {width}, expected {expected}")]
    RaggedRow {
        row: usize,
        width: usize,
        expected: usize,
    },
    #[error("unknown terrain glyph '{glyph}' at {position}")]
    UnknownGlyph { glyph: char, position: Position },
    #[error("{0} lies outside the map")]
    OutOfBounds(Position),
    #[error("team {team} has {found} starting positions, expected at least {required}")]
    NotEnoughStartingPositions {
        team: Team,
        found: usize,
        required: usize,
    },
}

/// Static board description: terrain grid, defensive tiles, blocks and
/// starting positions. Game state owns a copy so block HP can change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDescriptor {
    pub id: String,
    pub dimensions: MapDimensions,
    /// Row-major terrain grid.
    terrain: Vec<TerrainKind>,
    pub defensive_tiles: Vec<Position>,
    pub blocks: Vec<Block>,
    pub starting_positions: [Vec<Position>; 2],
}

impl MapDescriptor {
    /// Builds a map from a textual layout, one string per row.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] for ragged rows, unknown glyphs or references to
    /// tiles outside the layout.
    pub fn from_layout<S: AsRef<str>>(
        id: impl Into<String>,
        rows: &[S],
        defensive_tiles: Vec<Position>,
        blocks: Vec<Block>,
        starting_positions: [Vec<Position>; 2],
    ) -> Result<Self, MapError> {
        let expected = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .filter(|width| *width > 0)
            .ok_or(MapError::EmptyLayout)?;

        let mut terrain = Vec::with_capacity(expected * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let width = row.chars().count();
            if width != expected {
                return Err(MapError::RaggedRow {
                    row: y,
                    width,
                    expected,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let kind = TerrainKind::from_glyph(glyph).ok_or(MapError::UnknownGlyph {
                    glyph,
                    position: Position::new(x as i32, y as i32),
                })?;
                terrain.push(kind);
            }
        }

        let map = Self {
            id: id.into(),
            dimensions: MapDimensions::new(expected as u32, rows.len() as u32),
            terrain,
            defensive_tiles,
            blocks,
            starting_positions,
        };
        map.check_bounds()?;
        Ok(map)
    }

    fn check_bounds(&self) -> Result<(), MapError> {
        let positions = self
            .defensive_tiles
            .iter()
            .chain(self.blocks.iter().map(|block| &block.position))
            .chain(self.starting_positions.iter().flatten());
        for &position in positions {
            if !self.contains(position) {
                return Err(MapError::OutOfBounds(position));
            }
        }
        Ok(())
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    pub fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.dimensions
            .index(position)
            .and_then(|index| self.terrain.get(index).copied())
    }

    pub fn is_defensive(&self, position: Position) -> bool {
        self.defensive_tiles.contains(&position)
    }

    pub fn block_at(&self, position: Position) -> Option<&Block> {
        self.blocks.iter().find(|block| block.position == position)
    }

    pub fn block_at_mut(&mut self, position: Position) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.position == position)
    }

    /// True for tiles holding a block that still stops units.
    pub fn is_blocked(&self, position: Position) -> bool {
        self.block_at(position).is_some_and(Block::is_intact)
    }

    /// Whether a unit of `move_type` may stop on `position` (ignoring units).
    pub fn can_land_on(&self, move_type: MoveType, position: Position) -> bool {
        self.terrain(position)
            .is_some_and(|terrain| terrain.admits(move_type))
            && !self.is_blocked(position)
    }

    /// Whether an attack can target `position`: on the map, not a wall and
    /// not an intact block.
    pub fn is_attackable(&self, position: Position) -> bool {
        self.terrain(position)
            .is_some_and(|terrain| terrain != TerrainKind::Wall)
            && !self.is_blocked(position)
    }

    pub fn starting_positions(&self, team: Team) -> &[Position] {
        &self.starting_positions[team.index()]
    }

    /// Renders the terrain grid back to its textual layout.
    pub fn layout(&self) -> Vec<String> {
        self.terrain
            .chunks(self.dimensions.width as usize)
            .map(|row| row.iter().map(|terrain| terrain.glyph()).collect())
            .collect()
    }
}
