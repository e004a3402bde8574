//! Combat flags accumulated on a combatant by in-combat effects.
//!
//! Counting flags from several sources never stack: a flag is either present
//! or not, and percentage flags keep their individual values. This is the
//! single place where competing same-flag effects are resolved.

use crate::ability::{CombatFlag, MoveType, WeaponType};
use crate::state::Stat;

bitflags::bitflags! {
    /// Boolean combat switches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatSwitches: u32 {
        const GUARANTEED_FOLLOW_UP = 1 << 0;
        const CANT_FOLLOW_UP = 1 << 1;
        const NEUTRALIZE_GUARANTEED_FOLLOW_UP = 1 << 2;
        const NEUTRALIZE_CANT_FOLLOW_UP = 1 << 3;
        const ATTACKS_TWICE = 1 << 4;
        const DESPERATION = 1 << 5;
        const VANTAGE = 1 << 6;
        const HARDY_BEARING = 1 << 7;
        const CANT_COUNTERATTACK = 1 << 8;
        const COUNTER_REGARDLESS_OF_RANGE = 1 << 9;
        const CHARGES_PER_ATTACK = 1 << 10;
        const CHARGES_PER_UNIT_ATTACK = 1 << 11;
        const CHARGES_PER_FOE_ATTACK = 1 << 12;
        const NEUTRALIZE_SPECIAL_CHARGES = 1 << 13;
        const GUARD = 1 << 14;
        const NEUTRALIZE_GUARD = 1 << 15;
        const PANIC = 1 << 16;
        const TRIANGLE_ADEPT = 1 << 17;
        const CANCEL_AFFINITY = 1 << 18;
        const WTA_VS_COLOURLESS = 1 << 19;
        const LOWER_OF_DEF_RES = 1 << 20;
        const WRATHFUL = 1 << 21;
    }
}

bitflags::bitflags! {
    /// Set of combat stats, used for stat-specific neutralisation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatMask: u8 {
        const ATK = 1 << 0;
        const SPD = 1 << 1;
        const DEF = 1 << 2;
        const RES = 1 << 3;
    }
}

impl StatMask {
    pub fn of(stat: Stat) -> Self {
        match stat {
            Stat::Atk => StatMask::ATK,
            Stat::Spd => StatMask::SPD,
            Stat::Def => StatMask::DEF,
            Stat::Res => StatMask::RES,
            Stat::Hp => StatMask::empty(),
        }
    }

    /// Stats in the mask, in atk/spd/def/res order.
    pub fn stats(self) -> impl Iterator<Item = Stat> {
        Stat::COMBAT
            .into_iter()
            .filter(move |&stat| self.contains(StatMask::of(stat)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatFlags {
    pub switches: CombatSwitches,
    /// Stats whose bonuses are neutralised on this combatant.
    pub neutralized_bonuses: StatMask,
    /// Stats whose penalties are neutralised on this combatant.
    pub neutralized_penalties: StatMask,
    pub effective_move: Vec<MoveType>,
    pub effective_weapon: Vec<WeaponType>,
    /// Move types whose effectiveness against this combatant is neutralised.
    pub immune_move: Vec<MoveType>,
    pub immune_weapon: Vec<WeaponType>,
    pub consecutive_reductions: Vec<i32>,
    pub first_attack_reductions: Vec<i32>,
    /// Highest healing-on-hit percentage granted.
    pub healing_on_hit: i32,
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}

impl CombatFlags {
    pub fn has(&self, switch: CombatSwitches) -> bool {
        self.switches.contains(switch)
    }

    /// Records `flag`. Setting a switch twice is the same as setting it once.
    pub fn set(&mut self, flag: CombatFlag) {
        let switch = match flag {
            CombatFlag::GuaranteedFollowUp => CombatSwitches::GUARANTEED_FOLLOW_UP,
            CombatFlag::CantFollowUp => CombatSwitches::CANT_FOLLOW_UP,
            CombatFlag::NeutralizeGuaranteedFollowUp => {
                CombatSwitches::NEUTRALIZE_GUARANTEED_FOLLOW_UP
            }
            CombatFlag::NeutralizeCantFollowUp => CombatSwitches::NEUTRALIZE_CANT_FOLLOW_UP,
            CombatFlag::AttacksTwice => CombatSwitches::ATTACKS_TWICE,
            CombatFlag::Desperation => CombatSwitches::DESPERATION,
            CombatFlag::Vantage => CombatSwitches::VANTAGE,
            CombatFlag::HardyBearing => CombatSwitches::HARDY_BEARING,
            CombatFlag::CantCounterattack => CombatSwitches::CANT_COUNTERATTACK,
            CombatFlag::CounterattackRegardlessOfRange => {
                CombatSwitches::COUNTER_REGARDLESS_OF_RANGE
            }
            CombatFlag::SpecialChargesPerAttack => CombatSwitches::CHARGES_PER_ATTACK,
            CombatFlag::SpecialChargesPerUnitAttack => CombatSwitches::CHARGES_PER_UNIT_ATTACK,
            CombatFlag::SpecialChargesPerFoeAttack => CombatSwitches::CHARGES_PER_FOE_ATTACK,
            CombatFlag::NeutralizeSpecialCharges => CombatSwitches::NEUTRALIZE_SPECIAL_CHARGES,
            CombatFlag::Guard => CombatSwitches::GUARD,
            CombatFlag::NeutralizeGuard => CombatSwitches::NEUTRALIZE_GUARD,
            CombatFlag::Panic => CombatSwitches::PANIC,
            CombatFlag::TriangleAdept => CombatSwitches::TRIANGLE_ADEPT,
            CombatFlag::CancelAffinity => CombatSwitches::CANCEL_AFFINITY,
            CombatFlag::WtaVsColourless => CombatSwitches::WTA_VS_COLOURLESS,
            CombatFlag::LowerOfDefRes => CombatSwitches::LOWER_OF_DEF_RES,
            CombatFlag::Wrathful => CombatSwitches::WRATHFUL,
            CombatFlag::NeutralizeBonuses => {
                self.neutralized_bonuses = StatMask::all();
                return;
            }
            CombatFlag::NeutralizePenalties => {
                self.neutralized_penalties = StatMask::all();
                return;
            }
            CombatFlag::NeutralizeSpecificBonuses(stat) => {
                self.neutralized_bonuses |= StatMask::of(stat);
                return;
            }
            CombatFlag::NeutralizeSpecificPenalties(stat) => {
                self.neutralized_penalties |= StatMask::of(stat);
                return;
            }
            CombatFlag::EffectiveAgainstMoveType(move_type) => {
                push_unique(&mut self.effective_move, move_type);
                return;
            }
            CombatFlag::EffectiveAgainstWeaponType(weapon_type) => {
                push_unique(&mut self.effective_weapon, weapon_type);
                return;
            }
            CombatFlag::NeutralizeEffectiveAgainstMoveType(move_type) => {
                push_unique(&mut self.immune_move, move_type);
                return;
            }
            CombatFlag::NeutralizeEffectiveAgainstWeaponType(weapon_type) => {
                push_unique(&mut self.immune_weapon, weapon_type);
                return;
            }
            CombatFlag::ConsecutiveHitDamageReduction(percent) => {
                self.consecutive_reductions.push(percent);
                return;
            }
            CombatFlag::FirstAttackDamageReduction(percent) => {
                self.first_attack_reductions.push(percent);
                return;
            }
            CombatFlag::PercentHealingOnHit(percent) => {
                self.healing_on_hit = self.healing_on_hit.max(percent);
                return;
            }
        };
        self.switches |= switch;
    }

    /// True when every combat stat's bonuses are neutralised.
    pub fn bonuses_neutralized(&self) -> bool {
        self.neutralized_bonuses.is_all()
    }

    /// Whether the follow-up guarantee survives neutralisation.
    pub fn guaranteed_follow_up(&self) -> bool {
        self.has(CombatSwitches::GUARANTEED_FOLLOW_UP)
            && !self.has(CombatSwitches::NEUTRALIZE_GUARANTEED_FOLLOW_UP)
    }

    /// Whether the follow-up prevention survives neutralisation.
    pub fn cant_follow_up(&self) -> bool {
        self.has(CombatSwitches::CANT_FOLLOW_UP)
            && !self.has(CombatSwitches::NEUTRALIZE_CANT_FOLLOW_UP)
    }

    /// Extra special charge per hit this combatant lands.
    pub fn charges_on_attack(&self) -> bool {
        self.switches.intersects(
            CombatSwitches::CHARGES_PER_ATTACK | CombatSwitches::CHARGES_PER_UNIT_ATTACK,
        ) && !self.has(CombatSwitches::NEUTRALIZE_SPECIAL_CHARGES)
    }

    /// Extra special charge per hit this combatant receives.
    pub fn charges_on_defence(&self) -> bool {
        self.switches.intersects(
            CombatSwitches::CHARGES_PER_ATTACK | CombatSwitches::CHARGES_PER_FOE_ATTACK,
        ) && !self.has(CombatSwitches::NEUTRALIZE_SPECIAL_CHARGES)
    }

    /// Guard slows this combatant's charging unless it is neutralised.
    pub fn guarded(&self) -> bool {
        self.has(CombatSwitches::GUARD) && !self.has(CombatSwitches::NEUTRALIZE_GUARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_switches_do_not_stack() {
        let mut flags = CombatFlags::default();
        flags.set(CombatFlag::Guard);
        flags.set(CombatFlag::Guard);
        assert!(flags.guarded());
        assert_eq!(flags.switches, CombatSwitches::GUARD);

        flags.set(CombatFlag::NeutralizeGuard);
        assert!(!flags.guarded());
    }

    #[test]
    fn specific_neutralisation_accumulates_into_mask() {
        let mut flags = CombatFlags::default();
        flags.set(CombatFlag::NeutralizeSpecificBonuses(Stat::Atk));
        flags.set(CombatFlag::NeutralizeSpecificBonuses(Stat::Res));
        assert_eq!(
            flags.neutralized_bonuses.stats().collect::<Vec<_>>(),
            vec![Stat::Atk, Stat::Res]
        );
        assert!(!flags.bonuses_neutralized());

        flags.set(CombatFlag::NeutralizeBonuses);
        assert!(flags.bonuses_neutralized());
    }

    #[test]
    fn percentage_flags_keep_every_value() {
        let mut flags = CombatFlags::default();
        flags.set(CombatFlag::ConsecutiveHitDamageReduction(80));
        flags.set(CombatFlag::ConsecutiveHitDamageReduction(30));
        flags.set(CombatFlag::PercentHealingOnHit(50));
        flags.set(CombatFlag::PercentHealingOnHit(30));
        assert_eq!(flags.consecutive_reductions, vec![80, 30]);
        assert_eq!(flags.healing_on_hit, 50);
    }

    #[test]
    fn neutralised_follow_up_flags_cancel() {
        let mut flags = CombatFlags::default();
        flags.set(CombatFlag::CantFollowUp);
        assert!(flags.cant_follow_up());
        flags.set(CombatFlag::NeutralizeCantFollowUp);
        assert!(!flags.cant_follow_up());
        assert!(!flags.guaranteed_follow_up());
    }
}
