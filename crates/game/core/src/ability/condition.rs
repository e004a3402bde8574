//! Boolean predicate tree over battle facts.

use super::{MoveType, WeaponType};
use crate::state::Stat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
        }
    }
}

/// HP threshold expressed as an absolute value or a percentage of max HP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HpThreshold {
    Value(i32),
    Percent(i32),
}

impl HpThreshold {
    /// Compares `hp` against this threshold without floating point:
    /// percentages compare `hp·100` with `max_hp·percent`.
    pub fn compare(self, cmp: Comparison, hp: i32, max_hp: i32) -> bool {
        match self {
            HpThreshold::Value(value) => cmp.holds(hp as i64, value as i64),
            HpThreshold::Percent(percent) => {
                cmp.holds(hp as i64 * 100, max_hp as i64 * percent as i64)
            }
        }
    }
}

/// Which stat line a stat comparison reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatCheck {
    #[default]
    Visible,
    InCombat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),

    TurnIs(u32),
    OddTurn,
    EvenTurn,
    /// Turns 1, 4, 7, ...
    EveryThirdTurn,

    UnitInitiates,
    FoeInitiates,

    UnitHp {
        cmp: Comparison,
        threshold: HpThreshold,
    },
    UnitHpIsMax {
        #[cfg_attr(feature = "serde", serde(default))]
        start_of_combat: bool,
    },
    FoeHp {
        cmp: Comparison,
        threshold: HpThreshold,
    },
    FoeHpIsMax,

    BuffActive,
    DebuffActive,
    BonusActive,
    PenaltyActive,

    WithinSpacesOfAlly {
        spaces: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        move_type: Option<MoveType>,
        #[cfg_attr(feature = "serde", serde(default))]
        weapon_type: Option<WeaponType>,
        #[cfg_attr(feature = "serde", serde(default))]
        count: Option<u32>,
    },
    AdjacentToAlly,
    NotAdjacentToAlly,
    AllyInCombatWithin {
        spaces: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        move_type: Option<MoveType>,
        #[cfg_attr(feature = "serde", serde(default))]
        weapon_type: Option<WeaponType>,
    },
    MovingAllyWithin {
        spaces: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        move_type: Option<MoveType>,
    },

    FoeMoveType(MoveType),
    FoeWeaponType(WeaponType),
    FoeCanCounter,
    FoeRange(i32),
    UnitAttackedDuringCombat,
    FoeCanTriggerUnitSpecial,

    StatCompare {
        unit_stat: Stat,
        foe_stat: Stat,
        cmp: Comparison,
        #[cfg_attr(feature = "serde", serde(default))]
        check: StatCheck,
        #[cfg_attr(feature = "serde", serde(default))]
        unit_modifier: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        foe_modifier: i32,
    },

    FirstCombatInPhase,
    InCaptureArea,
    IsCaptain,
}

impl Condition {
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::And(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Or(conditions.into_iter().collect())
    }

    pub fn unit_hp(cmp: Comparison, percent: i32) -> Self {
        Condition::UnitHp {
            cmp,
            threshold: HpThreshold::Percent(percent),
        }
    }

    /// Visits this node and every nested condition.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Condition)) {
        visit(self);
        match self {
            Condition::And(children) | Condition::Or(children) => {
                children.iter().for_each(|child| child.walk(visit))
            }
            Condition::Not(child) => child.walk(visit),
            _ => {}
        }
    }

    /// True if any node in the tree needs a combat pair to evaluate.
    pub fn needs_combat(&self) -> bool {
        let mut needs = false;
        self.walk(&mut |node| {
            needs |= matches!(
                node,
                Condition::UnitInitiates
                    | Condition::FoeInitiates
                    | Condition::FoeHp { .. }
                    | Condition::FoeHpIsMax
                    | Condition::AllyInCombatWithin { .. }
                    | Condition::FoeMoveType(_)
                    | Condition::FoeWeaponType(_)
                    | Condition::FoeCanCounter
                    | Condition::FoeRange(_)
                    | Condition::UnitAttackedDuringCombat
                    | Condition::StatCompare { .. }
            );
        });
        needs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_threshold_uses_exact_ratio() {
        // 25 / 50 is exactly 50%
        assert!(HpThreshold::Percent(50).compare(Comparison::Le, 25, 50));
        assert!(!HpThreshold::Percent(50).compare(Comparison::Lt, 25, 50));
        // 37 / 50 = 74% ≤ 75%
        assert!(HpThreshold::Percent(75).compare(Comparison::Le, 37, 50));
        assert!(!HpThreshold::Percent(75).compare(Comparison::Le, 38, 50));
    }

    #[test]
    fn detects_combat_only_conditions() {
        let condition = Condition::all([
            Condition::unit_hp(Comparison::Ge, 50),
            Condition::FoeWeaponType(WeaponType::Sword),
        ]);
        assert!(condition.needs_combat());
        assert!(!Condition::TurnIs(2).needs_combat());
    }
}
