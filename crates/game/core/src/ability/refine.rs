//! Weapon refinement as a pure catalog-build transform.

use super::{AbilityDefinition, AbilityKind, CombatFlag, Effect, EffectAction, Phase, Target};
use crate::state::{AbilityId, Stat, StatLine};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum RefineKind {
    Eff,
    Atk,
    Spd,
    Def,
    Res,
    Wrathful,
    Dazzle,
}

impl RefineKind {
    /// Visible stat package granted by a stat refine.
    fn stat_package(self, melee: bool) -> StatLine {
        let (hp, bonus) = match (self, melee) {
            (RefineKind::Eff, true) => return StatLine::new(3, 0, 0, 0, 0),
            (RefineKind::Eff, false) => return StatLine::ZERO,
            (RefineKind::Wrathful | RefineKind::Dazzle, _) => return StatLine::ZERO,
            (kind, true) => (5, kind.melee_bonus()),
            (kind, false) => (2, kind.ranged_bonus()),
        };
        let mut stats = StatLine::new(hp, 0, 0, 0, 0);
        if let Some(stat) = self.stat() {
            stats[stat] = bonus;
        }
        stats
    }

    fn stat(self) -> Option<Stat> {
        match self {
            RefineKind::Atk => Some(Stat::Atk),
            RefineKind::Spd => Some(Stat::Spd),
            RefineKind::Def => Some(Stat::Def),
            RefineKind::Res => Some(Stat::Res),
            _ => None,
        }
    }

    fn melee_bonus(self) -> i32 {
        match self {
            RefineKind::Atk => 2,
            RefineKind::Spd => 3,
            _ => 4,
        }
    }

    fn ranged_bonus(self) -> i32 {
        match self {
            RefineKind::Atk => 1,
            RefineKind::Spd => 2,
            _ => 3,
        }
    }
}

/// Refine kinds available for a weapon definition.
pub fn refine_options(base: &AbilityDefinition) -> Vec<RefineKind> {
    let Some(weapon) = base.weapon() else {
        return Vec::new();
    };
    if !weapon.can_be_refined || weapon.refined {
        return Vec::new();
    }

    let mut options = if weapon.weapon_type.is_staff() {
        vec![RefineKind::Wrathful, RefineKind::Dazzle]
    } else {
        vec![
            RefineKind::Atk,
            RefineKind::Spd,
            RefineKind::Def,
            RefineKind::Res,
        ]
    };
    if weapon.effect_refine.is_some() {
        options.push(RefineKind::Eff);
    }
    options
}

/// Produces the refined variant `<BASE>_REFINE_<KIND>` of a weapon.
///
/// Returns `None` when `kind` is not offered for `base`.
pub fn refine_weapon(base: &AbilityDefinition, kind: RefineKind) -> Option<AbilityDefinition> {
    if !refine_options(base).contains(&kind) {
        return None;
    }
    let weapon = base.weapon()?;

    let mut effects = weapon
        .refined_base_upgrade
        .clone()
        .unwrap_or_else(|| base.effects.clone());

    let package = kind.stat_package(weapon.range == 1);
    let equip: Vec<EffectAction> = crate::state::Stat::ALL
        .into_iter()
        .filter(|&stat| package[stat] != 0)
        .map(|stat| EffectAction::EquipStatMod {
            stat,
            value: package[stat],
        })
        .collect();
    if !equip.is_empty() {
        effects.push(Effect::new(Phase::OnEquip, equip));
    }

    match kind {
        RefineKind::Eff => effects.extend(weapon.effect_refine.iter().flatten().cloned()),
        RefineKind::Wrathful => effects.push(self_flag(CombatFlag::Wrathful)),
        RefineKind::Dazzle => effects.push(Effect::new(
            Phase::BeforeCombat,
            vec![EffectAction::SetCombatFlag {
                flag: CombatFlag::CantCounterattack,
                target: Target::Foe,
            }],
        )),
        _ => {}
    }

    let mut params = weapon.clone();
    params.refined = true;
    params.effect_refine = None;
    params.refined_base_upgrade = None;

    Some(AbilityDefinition {
        id: AbilityId::new(format!("{}_REFINE_{}", base.id, kind)),
        name: format!("{} ({})", base.name, kind.as_ref()),
        kind: AbilityKind::Weapon(params),
        effects,
        can_use: base.can_use.clone(),
        available_as_seal: false,
    })
}

fn self_flag(flag: CombatFlag) -> Effect {
    Effect::new(
        Phase::BeforeCombat,
        vec![EffectAction::SetCombatFlag {
            flag,
            target: Target::Unit,
        }],
    )
}
