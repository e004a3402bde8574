use arrayvec::ArrayVec;

use super::{AbilityId, Position, Stat, StatLine, Team, UnitId};
use crate::ability::{MoveType, WeaponType};
use crate::config::GameConfig;

pub type SkillSlots = ArrayVec<AbilityId, { GameConfig::MAX_SKILL_SLOTS }>;
/// Status whose bearer's buffs count as penalties.
pub const PANIC_STATUS: &str = "PANIC";

pub type StatusList = ArrayVec<AbilityId, { GameConfig::MAX_STATUSES }>;

/// Charge counter of an equipped special.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialCounter {
    pub max: i32,
    pub current: i32,
}

impl SpecialCounter {
    pub const fn new(max: i32) -> Self {
        Self { max, current: max }
    }

    pub const fn is_ready(&self) -> bool {
        self.current == 0
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }

    /// Lowers the counter by `amount` (negative raises it), clamped to `[0, max]`.
    pub fn charge(&mut self, amount: i32) {
        self.current = (self.current - amount).clamp(0, self.max);
    }
}

/// A unit on the board.
///
/// `stats` holds the visible stats after equip effects, with `stats.hp`
/// being current HP. Buffs and debuffs last until the unit's next turn and
/// next action respectively; statuses are ids of catalog status abilities.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub team: Team,
    pub hero: String,
    pub weapon_type: WeaponType,
    pub move_type: MoveType,
    pub position: Position,
    pub stats: StatLine,
    pub max_hp: i32,
    pub phantom: StatLine,
    pub buffs: StatLine,
    pub debuffs: StatLine,
    pub bonuses: StatusList,
    pub penalties: StatusList,
    /// Equipped abilities in slot order.
    pub skills: SkillSlots,
    pub special: Option<SpecialCounter>,
    pub has_action: bool,
    pub combats_in_phase: u32,
}

impl Unit {
    pub fn hp(&self) -> i32 {
        self.stats.hp
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    pub fn missing_hp(&self) -> i32 {
        self.max_hp - self.stats.hp
    }

    pub fn is_panicked(&self) -> bool {
        self.penalties.iter().any(|status| status.as_str() == PANIC_STATUS)
    }

    /// Visible stats: base plus buffs minus debuffs, floored at zero. Panic
    /// turns buffs into penalties.
    pub fn visible_stats(&self) -> StatLine {
        self.visible_stats_with(self.is_panicked())
    }

    /// Visible stats with panic decided by the caller (e.g. an in-combat
    /// panic flag).
    pub fn visible_stats_with(&self, panicked: bool) -> StatLine {
        let mut visible = self.stats;
        for stat in Stat::COMBAT {
            let buff = if panicked {
                -self.buffs[stat]
            } else {
                self.buffs[stat]
            };
            visible[stat] = (visible[stat] + buff - self.debuffs[stat]).max(0);
        }
        visible
    }

    pub fn has_status(&self, id: &str) -> bool {
        self.bonuses
            .iter()
            .chain(self.penalties.iter())
            .any(|status| status.as_str() == id)
    }

    pub fn statuses(&self) -> impl Iterator<Item = &AbilityId> {
        self.bonuses.iter().chain(self.penalties.iter())
    }

    pub fn is_adjacent(&self, other: &Unit) -> bool {
        self.position.distance(other.position) == 1
    }

    /// Sets HP, clamped to `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: i32) {
        self.stats.hp = hp.clamp(0, self.max_hp);
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.stats.hp;
        self.set_hp(before + amount);
        self.stats.hp - before
    }

    /// Adds a status to its list unless already present or the list is full.
    pub fn push_status(list: &mut StatusList, status: AbilityId) -> bool {
        if list.contains(&status) || list.is_full() {
            return false;
        }
        list.push(status);
        true
    }

    /// Clears single-action modifiers after the unit acts.
    pub fn end_action(&mut self) {
        self.debuffs.clear();
        self.penalties.clear();
    }

    /// Clears single-turn modifiers at the start of the unit's turn.
    pub fn start_turn(&mut self) {
        self.buffs.clear();
        self.bonuses.clear();
        self.combats_in_phase = 0;
    }
}
