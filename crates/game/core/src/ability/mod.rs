//! Declarative ability model: weapons, assists, specials, passives, captain
//! skills and statuses, together with the effects they carry.
//!
//! Definitions are immutable once a [`Catalog`] has been built. Every rule in
//! the game is expressed as data in this module and interpreted by
//! [`crate::effects`]; nothing here executes game logic.

mod action;
mod catalog;
mod condition;
mod effect;
mod kinds;
mod refine;
mod target;

pub use action::{
    CombatFlag, DamageAmount, Displacement, EffectAction, HealAmount, MovementFlag,
    MovementFlags, StatAmount,
};
pub use catalog::{Catalog, HeroDefinition, SEAL_SUFFIX};
pub use condition::{Comparison, Condition, HpThreshold, StatCheck};
pub use effect::{Effect, Phase};
pub use kinds::{AbilityCategory, Colour, MoveType, WeaponType};
pub use refine::{RefineKind, refine_weapon, refine_options};
pub use target::{StatFilter, Target, WarpRule};

use crate::state::{AbilityId, Position, Stat, StatLine};

/// Restrictions on which heroes may equip an ability.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanUse {
    pub weapon_types: Vec<WeaponType>,
    pub move_types: Vec<MoveType>,
    /// Hero ids allowed to equip the ability; empty means unrestricted.
    pub exclusive_to: Vec<String>,
}

impl CanUse {
    pub fn allows(&self, hero: &HeroDefinition) -> bool {
        (self.weapon_types.is_empty() || self.weapon_types.contains(&hero.weapon_type))
            && (self.move_types.is_empty() || self.move_types.contains(&hero.move_type))
            && (self.exclusive_to.is_empty() || self.exclusive_to.iter().any(|id| *id == hero.id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponParams {
    pub weapon_type: WeaponType,
    pub might: i32,
    pub range: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_be_refined: bool,
    /// Effects appended by the `Eff` refine.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect_refine: Option<Vec<Effect>>,
    /// Replaces the base effects on every refine when present.
    #[cfg_attr(feature = "serde", serde(default))]
    pub refined_base_upgrade: Option<Vec<Effect>>,
    /// Set on catalog entries produced by refinement.
    #[cfg_attr(feature = "serde", serde(default))]
    pub refined: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealCalculation {
    PercentOfStat { stat: Stat, percent: i32 },
    Value(i32),
    /// Percentage of the healed unit's missing HP.
    MissingHp(i32),
    /// `max(0, max_hp - 2 * hp)` of the target.
    LowHpBoost,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealSpec {
    pub calculations: Vec<HealCalculation>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssistKind {
    Movement(Displacement),
    Refresh,
    Heal {
        heal: HealSpec,
        #[cfg_attr(feature = "serde", serde(default))]
        self_heal: Option<HealSpec>,
    },
    Rally(StatLine),
    Sacrifice {
        #[cfg_attr(feature = "serde", serde(default))]
        amount: Option<i32>,
    },
    ReciprocalAid,
    HarshCommand,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssistParams {
    pub range: i32,
    pub kind: AssistKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AoeShape {
    /// Offsets relative to the declared combat target.
    pub tiles: Vec<(i32, i32)>,
    /// Damage multiplier in percent (150 = 1.5x).
    pub multiplier: i32,
}

impl AoeShape {
    pub fn positions(&self, centre: Position) -> impl Iterator<Item = Position> + '_ {
        self.tiles
            .iter()
            .map(move |&(dx, dy)| centre.offset(dx, dy))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialKind {
    Offensive,
    /// Triggers when the attacking foe's range matches `trigger_range`, or always.
    Defensive {
        #[cfg_attr(feature = "serde", serde(default))]
        trigger_range: Option<i32>,
    },
    Healing,
    Galeforce,
    Miracle,
    Aoe(AoeShape),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialParams {
    pub cooldown: i32,
    pub kind: SpecialKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    Positive,
    Negative,
}

/// Category-specific payload of an ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityKind {
    Weapon(WeaponParams),
    Assist(AssistParams),
    Special(SpecialParams),
    PassiveA,
    PassiveB,
    PassiveC,
    PassiveS,
    Captain {
        /// How many units the owner counts as inside the capture area.
        #[cfg_attr(feature = "serde", serde(default = "default_capture_weight"))]
        capture_weight: u32,
    },
    Status(Polarity),
}

#[cfg(feature = "serde")]
fn default_capture_weight() -> u32 {
    1
}

impl AbilityKind {
    pub fn category(&self) -> AbilityCategory {
        match self {
            AbilityKind::Weapon(_) => AbilityCategory::Weapon,
            AbilityKind::Assist(_) => AbilityCategory::Assist,
            AbilityKind::Special(_) => AbilityCategory::Special,
            AbilityKind::PassiveA => AbilityCategory::PassiveA,
            AbilityKind::PassiveB => AbilityCategory::PassiveB,
            AbilityKind::PassiveC => AbilityCategory::PassiveC,
            AbilityKind::PassiveS => AbilityCategory::PassiveS,
            AbilityKind::Captain { .. } => AbilityCategory::Captain,
            AbilityKind::Status(_) => AbilityCategory::Status,
        }
    }
}

/// Immutable, catalog-loaded ability record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    pub kind: AbilityKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub can_use: CanUse,
    #[cfg_attr(feature = "serde", serde(default))]
    pub available_as_seal: bool,
}

impl AbilityDefinition {
    pub fn category(&self) -> AbilityCategory {
        self.kind.category()
    }

    pub fn weapon(&self) -> Option<&WeaponParams> {
        match &self.kind {
            AbilityKind::Weapon(params) => Some(params),
            _ => None,
        }
    }

    pub fn assist(&self) -> Option<&AssistParams> {
        match &self.kind {
            AbilityKind::Assist(params) => Some(params),
            _ => None,
        }
    }

    pub fn special(&self) -> Option<&SpecialParams> {
        match &self.kind {
            AbilityKind::Special(params) => Some(params),
            _ => None,
        }
    }

    pub fn polarity(&self) -> Option<Polarity> {
        match self.kind {
            AbilityKind::Status(polarity) => Some(polarity),
            _ => None,
        }
    }

    pub fn capture_weight(&self) -> u32 {
        match self.kind {
            AbilityKind::Captain { capture_weight } => capture_weight,
            _ => 1,
        }
    }

    /// Effects registered for `phase`, in declaration order.
    pub fn effects_for(&self, phase: Phase) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(move |effect| effect.phase == phase)
    }
}
