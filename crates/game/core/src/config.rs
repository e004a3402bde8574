/// Rectangular region of the board scored at duel turn boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CaptureArea {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, position: crate::state::Position) -> bool {
        self.distance(position) == 0
    }

    /// Manhattan distance from `position` to the nearest tile of the area.
    pub fn distance(&self, position: crate::state::Position) -> i32 {
        let dx = (self.x - position.x)
            .max(position.x - (self.x + self.width - 1))
            .max(0);
        let dy = (self.y - position.y)
            .max(position.y - (self.y + self.height - 1))
            .max(0);
        dx + dy
    }

    /// Area moved by `dy` rows, kept within `height` rows of the board.
    pub fn shifted(&self, dy: i32, board_height: i32) -> Self {
        let y = (self.y + dy).clamp(0, (board_height - self.height).max(0));
        Self { y, ..*self }
    }
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Duel action budget per team per turn.
    pub actions_per_turn: u32,
    /// Last duel turn; the match is scored when it ends.
    pub final_turn: u32,
    pub ko_points: u32,
    /// Added once per captain involved in a KO (attacker or victim).
    pub captain_ko_bonus: u32,
    pub capture_points: u32,
    /// Occupancy lead needed to score the capture area.
    pub capture_margin: u32,
    pub capture_area: CaptureArea,
    pub zobrist_seed: u64,
    pub follow_up_threshold: i32,
    /// Percentage of the defence stat added on defensive terrain.
    pub defensive_terrain_percent: i32,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const DUEL_TEAM_SIZE: usize = 5;
    pub const MAX_SKILL_SLOTS: usize = 8;
    pub const MAX_MERGES: u8 = 10;
    pub const MAX_STATUSES: usize = 8;
    /// First unit id of each team, indexed by [`Team::index`](crate::state::Team::index).
    pub const TEAM_ID_BASE: [u32; 2] = [101, 201];

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACTIONS_PER_TURN: u32 = 6;
    pub const DEFAULT_FINAL_TURN: u32 = 5;
    pub const DEFAULT_CAPTURE_AREA: CaptureArea = CaptureArea::new(1, 3, 6, 4);
    pub const DEFAULT_ZOBRIST_SEED: u64 = 1_804_289_383;

    pub fn new() -> Self {
        Self {
            actions_per_turn: Self::DEFAULT_ACTIONS_PER_TURN,
            final_turn: Self::DEFAULT_FINAL_TURN,
            ko_points: 2,
            captain_ko_bonus: 1,
            capture_points: 2,
            capture_margin: 2,
            capture_area: Self::DEFAULT_CAPTURE_AREA,
            zobrist_seed: Self::DEFAULT_ZOBRIST_SEED,
            follow_up_threshold: 5,
            defensive_terrain_percent: 30,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tuning knobs for the minimax search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Transposition table entries.
    pub tt_size: usize,
    pub max_ply: usize,
    pub quiescence: bool,
}

impl SearchConfig {
    pub fn new() -> Self {
        Self {
            tt_size: 1 << 16,
            max_ply: 64,
            quiescence: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}
