//! Effect actions: the state mutations an effect requests.

use super::{MoveType, Target, WarpRule, WeaponType};
use crate::state::Stat;

/// Amount added to an in-combat stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatAmount {
    Value(i32),
    /// Sum of the target's atk/spd/def/res buffs.
    TotalBonuses,
    AlliesWithin {
        spaces: i32,
        #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
        multiplier: i32,
        #[cfg_attr(feature = "serde", serde(default = "default_max"))]
        max: i32,
    },
}

#[cfg(feature = "serde")]
fn default_multiplier() -> i32 {
    1
}

#[cfg(feature = "serde")]
fn default_max() -> i32 {
    99
}

/// Damage dealt by an effect. Only `Value` is meaningful outside of a special trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageAmount {
    Value(i32),
    /// Percentage of the attacker's in-combat stat.
    PercentOfStat { stat: Stat, percent: i32 },
    /// Percentage of the attacker's missing HP.
    PercentOfMissingHp(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealAmount {
    Value(i32),
    /// Percentage of the damage dealt by the triggering hit.
    PercentOfDamageDealt(i32),
    /// Same amount the triggering heal assist restored.
    HpRestoredToTarget,
}

/// Capabilities toggled during movement calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementFlag {
    Pass,
    RestrictMovement,
}

bitflags::bitflags! {
    /// Movement capabilities collected for one range calculation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MovementFlags: u8 {
        const PASS = 1 << 0;
        const RESTRICT = 1 << 1;
    }
}

impl From<MovementFlag> for MovementFlags {
    fn from(flag: MovementFlag) -> Self {
        match flag {
            MovementFlag::Pass => MovementFlags::PASS,
            MovementFlag::RestrictMovement => MovementFlags::RESTRICT,
        }
    }
}

/// Post-combat displacement kinds shared with movement assists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Displacement {
    Swap,
    Shove,
    Smite,
    DrawBack,
    Reposition,
    Pivot,
    HitAndRun,
}

/// Combat flags set by effects. Counting flags resolve as "present" and never
/// stack; percentage flags accumulate into per-hit reductions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatFlag {
    GuaranteedFollowUp,
    CantFollowUp,
    NeutralizeGuaranteedFollowUp,
    NeutralizeCantFollowUp,
    AttacksTwice,
    Desperation,
    Vantage,
    HardyBearing,
    CantCounterattack,
    CounterattackRegardlessOfRange,
    SpecialChargesPerAttack,
    SpecialChargesPerUnitAttack,
    SpecialChargesPerFoeAttack,
    NeutralizeSpecialCharges,
    Guard,
    NeutralizeGuard,
    Panic,
    NeutralizeBonuses,
    NeutralizePenalties,
    NeutralizeSpecificBonuses(Stat),
    NeutralizeSpecificPenalties(Stat),
    TriangleAdept,
    CancelAffinity,
    WtaVsColourless,
    EffectiveAgainstMoveType(MoveType),
    EffectiveAgainstWeaponType(WeaponType),
    NeutralizeEffectiveAgainstMoveType(MoveType),
    NeutralizeEffectiveAgainstWeaponType(WeaponType),
    LowerOfDefRes,
    Wrathful,
    ConsecutiveHitDamageReduction(i32),
    FirstAttackDamageReduction(i32),
    PercentHealingOnHit(i32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectAction {
    /// Permanent visible stat change applied when the build is equipped.
    EquipStatMod { stat: Stat, value: i32 },
    PhantomStat { stat: Stat, value: i32 },
    MaxSpecialCooldownMod(i32),
    CurrentSpecialCooldownMod {
        value: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    CombatStatMod {
        stat: Stat,
        amount: StatAmount,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    SetCombatFlag {
        flag: CombatFlag,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    DealDamage {
        amount: DamageAmount,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    RestoreHp {
        amount: HealAmount,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    ApplyBuff {
        stat: Stat,
        value: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    ApplyDebuff {
        stat: Stat,
        value: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    ApplyStatus {
        status: crate::state::AbilityId,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    /// Reduces damage from the current hit (special trigger only).
    DamageReduction {
        #[cfg_attr(feature = "serde", serde(default))]
        percent: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        flat: i32,
    },
    ReduceDefResByPercent(i32),
    BaseDamageIncrease(i32),
    MoveExtraSpaces(i32),
    SetMovementFlag(MovementFlag),
    ObstructTiles { spaces: i32 },
    EnableWarp(WarpRule),
    PostCombatMovement {
        movement: Displacement,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Target,
    },
    PullCaptureArea,
}

impl EffectAction {
    /// Target selector carried by the action, if any.
    pub fn target(&self) -> Option<&Target> {
        match self {
            EffectAction::CurrentSpecialCooldownMod { target, .. }
            | EffectAction::CombatStatMod { target, .. }
            | EffectAction::SetCombatFlag { target, .. }
            | EffectAction::DealDamage { target, .. }
            | EffectAction::RestoreHp { target, .. }
            | EffectAction::ApplyBuff { target, .. }
            | EffectAction::ApplyDebuff { target, .. }
            | EffectAction::ApplyStatus { target, .. }
            | EffectAction::PostCombatMovement { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Ordering bucket used when applying in-combat effects:
    /// flags first, then stat mods, then everything else.
    pub fn combat_priority(&self) -> u8 {
        match self {
            EffectAction::SetCombatFlag { .. } => 0,
            EffectAction::CombatStatMod { .. } => 1,
            _ => 2,
        }
    }

    pub fn is_equip(&self) -> bool {
        matches!(
            self,
            EffectAction::EquipStatMod { .. }
                | EffectAction::PhantomStat { .. }
                | EffectAction::MaxSpecialCooldownMod(_)
        )
    }

    pub fn is_combat_only(&self) -> bool {
        matches!(
            self,
            EffectAction::CombatStatMod { .. }
                | EffectAction::SetCombatFlag { .. }
                | EffectAction::DamageReduction { .. }
                | EffectAction::ReduceDefResByPercent(_)
                | EffectAction::BaseDamageIncrease(_)
        )
    }

    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            EffectAction::MoveExtraSpaces(_)
                | EffectAction::SetMovementFlag(_)
                | EffectAction::ObstructTiles { .. }
                | EffectAction::EnableWarp(_)
        )
    }
}
