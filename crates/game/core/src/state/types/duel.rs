use super::UnitId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    #[default]
    Standard,
    Duel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MatchResult {
    Win,
    Lose,
    Draw,
}

/// Per-team bookkeeping for duel mode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelState {
    pub captain: UnitId,
    pub actions_remaining: u32,
    pub ended_turn: bool,
    pub surrendered: bool,
    pub ko_score: u32,
    pub capture_score: u32,
    pub result: Option<MatchResult>,
}

impl DuelState {
    pub fn new(captain: UnitId, actions: u32) -> Self {
        Self {
            captain,
            actions_remaining: actions,
            ended_turn: false,
            surrendered: false,
            ko_score: 0,
            capture_score: 0,
            result: None,
        }
    }

    pub fn total_score(&self) -> u32 {
        self.ko_score + self.capture_score
    }
}
