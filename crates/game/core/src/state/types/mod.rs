mod common;
mod duel;
mod unit;

pub use common::{AbilityId, Position, Stat, StatLine, Team, UnitId};
pub use duel::{DuelState, GameMode, MatchResult};
pub use unit::{PANIC_STATUS, SkillSlots, SpecialCounter, StatusList, Unit};
