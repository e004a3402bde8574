//! One side of an engagement.

use super::flags::{CombatFlags, CombatSwitches};
use crate::ability::{AbilityCategory, SpecialKind};
use crate::env::{GameEnv, OracleError};
use crate::state::{GameState, Stat, StatLine, Unit, UnitId};

/// In-combat view of a unit.
///
/// `unit` is a copy of the board unit; HP and special charge change on the
/// copy as hits land and are written back to the board by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub unit: Unit,
    /// In-combat stat modifiers on top of the visible stats.
    pub temp: StatLine,
    pub flags: CombatFlags,
    pub initiator: bool,
    pub start_hp: i32,
    pub defensive_terrain: bool,
    /// Range of the equipped weapon, `0` without one.
    pub range: i32,
    pub special_kind: Option<SpecialKind>,
    /// Weapon-triangle modifier in percent (`±20`, `±40` with adept).
    pub advantage: i32,
    /// Effectiveness modifier in percent (`0` or `50`).
    pub effective: i32,
    pub staff_halved: bool,
    pub can_attack: bool,
    pub can_double: bool,
    pub times_attacked: u32,
    pub first_done: bool,
    pub follow_up_done: bool,
}

impl Combatant {
    /// Builds the combat copy of `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if an equipped ability is missing from the catalog.
    pub fn new(
        env: &GameEnv<'_>,
        state: &GameState,
        unit: &Unit,
        initiator: bool,
    ) -> Result<Self, OracleError> {
        let range = env
            .equipped(unit, AbilityCategory::Weapon)?
            .and_then(|weapon| weapon.weapon())
            .map_or(0, |weapon| weapon.range);
        let special_kind = env
            .equipped(unit, AbilityCategory::Special)?
            .and_then(|special| special.special())
            .map(|special| special.kind.clone());

        Ok(Self {
            unit: unit.clone(),
            temp: StatLine::ZERO,
            flags: CombatFlags::default(),
            initiator,
            start_hp: unit.hp(),
            defensive_terrain: state.map.is_defensive(unit.position),
            range,
            special_kind,
            advantage: 0,
            effective: 0,
            staff_halved: unit.weapon_type.is_staff(),
            can_attack: initiator && range > 0,
            can_double: false,
            times_attacked: 0,
            first_done: false,
            follow_up_done: false,
        })
    }

    pub fn id(&self) -> UnitId {
        self.unit.id
    }

    pub fn is_alive(&self) -> bool {
        self.unit.is_alive()
    }

    /// Panicked by status or by an in-combat flag.
    pub fn is_panicked(&self) -> bool {
        self.unit.is_panicked() || self.flags.has(CombatSwitches::PANIC)
    }

    pub fn visible(&self) -> StatLine {
        self.unit.visible_stats_with(self.is_panicked())
    }

    /// Visible stats plus in-combat modifiers, floored at zero.
    pub fn totals(&self) -> StatLine {
        let mut totals = self.visible();
        for stat in Stat::COMBAT {
            totals[stat] = (totals[stat] + self.temp[stat]).max(0);
        }
        totals
    }

    /// Special charged and of the given family.
    pub fn special_ready(&self, matches: impl Fn(&SpecialKind) -> bool) -> bool {
        self.unit.special.is_some_and(|counter| counter.is_ready())
            && self.special_kind.as_ref().is_some_and(matches)
    }

    /// Whether this combatant has finished its attacks for the engagement.
    pub fn done_attacking(&self) -> bool {
        !self.can_attack
            || if self.can_double {
                self.follow_up_done
            } else {
                self.first_done
            }
    }

    pub fn record_attack(&mut self) {
        let twice = self.flags.has(CombatSwitches::ATTACKS_TWICE);
        self.times_attacked += 1;
        self.first_done = self.times_attacked >= if twice { 2 } else { 1 };
        self.follow_up_done = self.times_attacked >= if twice { 4 } else { 2 };
    }

    /// Removes neutralised bonuses and penalties from the in-combat stats.
    pub(crate) fn neutralize(&mut self) {
        let panicked = self.is_panicked();
        for stat in self.flags.neutralized_bonuses.stats() {
            if !panicked {
                self.temp[stat] -= self.unit.buffs[stat];
            }
        }
        for stat in self.flags.neutralized_penalties.stats() {
            self.temp[stat] += self.unit.debuffs[stat];
            if panicked {
                self.temp[stat] += self.unit.buffs[stat];
            }
        }
    }
}
