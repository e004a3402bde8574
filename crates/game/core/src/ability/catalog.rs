//! Immutable ability and hero catalog built once at load time.

use std::collections::BTreeMap;

use super::{
    AbilityCategory, AbilityDefinition, AbilityKind, Condition, DamageAmount, Effect,
    EffectAction, HealAmount, MoveType, Phase, WeaponType, refine_options, refine_weapon,
};
use crate::env::{CatalogError, CatalogOracle};
use crate::state::{AbilityId, Stat, StatLine};

/// Static description of a playable character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroDefinition {
    pub id: String,
    pub name: String,
    pub weapon_type: WeaponType,
    pub move_type: MoveType,
    pub level1: StatLine,
    pub level40: StatLine,
    #[cfg_attr(feature = "serde", serde(default))]
    pub superboons: Vec<Stat>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub superbanes: Vec<Stat>,
}

/// Flat lookup table of every ability (refined and seal variants included)
/// and every hero.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    abilities: BTreeMap<AbilityId, AbilityDefinition>,
    heroes: BTreeMap<String, HeroDefinition>,
}

/// Suffix of the seal variant generated for abilities available as seals.
pub const SEAL_SUFFIX: &str = "_SEAL";

impl Catalog {
    /// Builds the catalog: registers base definitions, expands refines and
    /// seals, then validates every effect.
    ///
    /// # Errors
    ///
    /// Any malformed definition is reported as a [`CatalogError`]; a catalog
    /// that builds successfully never produces catalog errors in battle.
    pub fn build(
        abilities: impl IntoIterator<Item = AbilityDefinition>,
        heroes: impl IntoIterator<Item = HeroDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for hero in heroes {
            if catalog.heroes.contains_key(&hero.id) {
                return Err(CatalogError::DuplicateHero(hero.id));
            }
            catalog.heroes.insert(hero.id.clone(), hero);
        }

        let mut derived = Vec::new();
        for ability in abilities {
            derived.extend(
                refine_options(&ability)
                    .into_iter()
                    .filter_map(|kind| refine_weapon(&ability, kind)),
            );
            if ability.available_as_seal {
                derived.push(seal_of(&ability));
            }
            catalog.insert(ability)?;
        }
        for ability in derived {
            catalog.insert(ability)?;
        }

        for ability in catalog.abilities.values() {
            catalog.validate(ability)?;
        }
        Ok(catalog)
    }

    fn insert(&mut self, ability: AbilityDefinition) -> Result<(), CatalogError> {
        if self.abilities.contains_key(&ability.id) {
            return Err(CatalogError::DuplicateAbility(ability.id));
        }
        self.abilities.insert(ability.id.clone(), ability);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn abilities(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.values()
    }

    pub fn heroes(&self) -> impl Iterator<Item = &HeroDefinition> {
        self.heroes.values()
    }

    fn validate(&self, ability: &AbilityDefinition) -> Result<(), CatalogError> {
        let id = &ability.id;
        match &ability.kind {
            AbilityKind::Weapon(weapon) if !(1..=2).contains(&weapon.range) => {
                return Err(CatalogError::invalid(id, "weapon range must be 1 or 2"));
            }
            AbilityKind::Assist(assist) if assist.range < 1 => {
                return Err(CatalogError::invalid(id, "assist range must be positive"));
            }
            AbilityKind::Special(special) if special.cooldown < 1 => {
                return Err(CatalogError::invalid(id, "special cooldown must be positive"));
            }
            _ => {}
        }

        for effect in &ability.effects {
            self.validate_effect(id, effect)?;
        }
        Ok(())
    }

    fn validate_effect(&self, id: &AbilityId, effect: &Effect) -> Result<(), CatalogError> {
        let phase = effect.phase;
        if let Some(condition) = &effect.condition {
            if condition.needs_combat() && !phase.has_combatants() {
                return Err(CatalogError::phase(id, phase, "condition requires a combat"));
            }
            let mut moving = false;
            condition.walk(&mut |node| moving |= matches!(node, Condition::MovingAllyWithin { .. }));
            if moving && !phase.is_movement() {
                return Err(CatalogError::phase(id, phase, "condition requires a moving unit"));
            }
        }

        for action in &effect.actions {
            if action.is_equip() != (phase == Phase::OnEquip) {
                return Err(CatalogError::phase(id, phase, "equip actions only run on equip"));
            }
            if action.is_combat_only() && !phase.is_in_combat() {
                return Err(CatalogError::phase(id, phase, "combat action outside of combat"));
            }
            if action.is_movement() && !phase.is_movement() {
                return Err(CatalogError::phase(id, phase, "movement action outside of movement"));
            }
            if matches!(
                action,
                EffectAction::DamageReduction { .. }
                    | EffectAction::ReduceDefResByPercent(_)
                    | EffectAction::BaseDamageIncrease(_)
            ) && !phase.is_special_trigger()
            {
                return Err(CatalogError::phase(id, phase, "hit modifier outside of a special trigger"));
            }
            if matches!(
                action,
                EffectAction::ApplyBuff { .. }
                    | EffectAction::ApplyDebuff { .. }
                    | EffectAction::ApplyStatus { .. }
                    | EffectAction::PullCaptureArea
            ) && phase.is_in_combat()
            {
                return Err(CatalogError::phase(id, phase, "board action inside combat"));
            }
            match action {
                EffectAction::DealDamage { amount, .. } => {
                    if phase.is_in_combat() != phase.is_special_trigger() {
                        return Err(CatalogError::phase(id, phase, "damage inside combat outside of a special trigger"));
                    }
                    if !matches!(amount, DamageAmount::Value(_)) && !phase.is_special_trigger() {
                        return Err(CatalogError::phase(id, phase, "scaled damage outside of a special trigger"));
                    }
                }
                EffectAction::RestoreHp { amount, .. } => {
                    if phase.is_in_combat() != phase.is_special_trigger() {
                        return Err(CatalogError::phase(id, phase, "healing inside combat outside of a special trigger"));
                    }
                    if matches!(amount, HealAmount::PercentOfDamageDealt(_)) && !phase.is_special_trigger() {
                        return Err(CatalogError::phase(id, phase, "damage-based healing outside of a special trigger"));
                    }
                    if matches!(amount, HealAmount::HpRestoredToTarget) && phase != Phase::UsedHeal {
                        return Err(CatalogError::phase(id, phase, "restored-hp healing outside of a heal"));
                    }
                }
                _ => {}
            }
            if matches!(action, EffectAction::PostCombatMovement { .. })
                && phase != Phase::AfterCombatDisplacement
            {
                return Err(CatalogError::phase(id, phase, "displacement outside of displacement phase"));
            }
            if let Some(target) = action.target() {
                if target.needs_combat() && !phase.has_combatants() {
                    return Err(CatalogError::phase(id, phase, "target requires a combat"));
                }
                if target.needs_assist() && !phase.is_assist() {
                    return Err(CatalogError::phase(id, phase, "target requires an assist"));
                }
            }
            if let EffectAction::ApplyStatus { status, .. } = action {
                let definition = self.abilities.get(status).ok_or_else(|| {
                    CatalogError::UnknownStatus {
                        ability: id.clone(),
                        status: status.clone(),
                    }
                })?;
                if definition.category() != AbilityCategory::Status {
                    return Err(CatalogError::UnknownStatus {
                        ability: id.clone(),
                        status: status.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl CatalogOracle for Catalog {
    fn ability(&self, id: &str) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }

    fn hero(&self, id: &str) -> Option<&HeroDefinition> {
        self.heroes.get(id)
    }
}

fn seal_of(ability: &AbilityDefinition) -> AbilityDefinition {
    AbilityDefinition {
        id: AbilityId::new(format!("{}{}", ability.id, SEAL_SUFFIX)),
        name: format!("{} (Seal)", ability.name),
        kind: AbilityKind::PassiveS,
        effects: ability.effects.clone(),
        can_use: ability.can_use.clone(),
        available_as_seal: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{CanUse, Polarity, Target};

    fn status(id: &str) -> AbilityDefinition {
        AbilityDefinition {
            id: AbilityId::from(id),
            name: id.into(),
            kind: AbilityKind::Status(Polarity::Negative),
            effects: Vec::new(),
            can_use: CanUse::default(),
            available_as_seal: false,
        }
    }

    fn passive(id: &str, effects: Vec<Effect>) -> AbilityDefinition {
        AbilityDefinition {
            id: AbilityId::from(id),
            name: id.into(),
            kind: AbilityKind::PassiveB,
            effects,
            can_use: CanUse::default(),
            available_as_seal: true,
        }
    }

    #[test]
    fn seals_are_generated() {
        let catalog = Catalog::build([passive("WINDSWEEP_3", Vec::new())], []).unwrap();
        let seal = catalog.ability("WINDSWEEP_3_SEAL").unwrap();
        assert_eq!(seal.category(), AbilityCategory::PassiveS);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let effect = Effect::new(
            Phase::StartOfTurn,
            vec![EffectAction::ApplyStatus {
                status: AbilityId::from("PANIC"),
                target: Target::FoesWithin { spaces: 2 },
            }],
        );
        let err = Catalog::build([passive("PANIC_PLOY", vec![effect.clone()])], []).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownStatus { .. }));

        let catalog = Catalog::build([passive("PANIC_PLOY", vec![effect]), status("PANIC")], []);
        assert!(catalog.is_ok());
    }

    #[test]
    fn combat_targets_outside_combat_are_rejected() {
        let effect = Effect::new(
            Phase::StartOfTurn,
            vec![EffectAction::ApplyDebuff {
                stat: Stat::Atk,
                value: 5,
                target: Target::Foe,
            }],
        );
        let err = Catalog::build([passive("BROKEN", vec![effect])], []).unwrap_err();
        assert!(matches!(err, CatalogError::PhaseMismatch { .. }));
    }

    #[test]
    fn board_actions_inside_combat_are_rejected() {
        let effect = Effect::new(
            Phase::DuringCombat,
            vec![EffectAction::ApplyBuff {
                stat: Stat::Atk,
                value: 6,
                target: Target::Unit,
            }],
        );
        let err = Catalog::build([passive("BROKEN", vec![effect])], []).unwrap_err();
        assert!(matches!(err, CatalogError::PhaseMismatch { .. }));

        let scaled = Effect::new(
            Phase::AfterCombat,
            vec![EffectAction::DealDamage {
                amount: DamageAmount::PercentOfMissingHp(30),
                target: Target::Unit,
            }],
        );
        let err = Catalog::build([passive("BROKEN", vec![scaled])], []).unwrap_err();
        assert!(matches!(err, CatalogError::PhaseMismatch { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Catalog::build([status("GRAVITY"), status("GRAVITY")], []).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateAbility(AbilityId::from("GRAVITY")));
    }
}
