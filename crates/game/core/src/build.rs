//! Team builds: validation against hero restrictions and conversion into
//! board units.

use std::collections::BTreeSet;

use crate::ability::{
    AbilityCategory, AbilityDefinition, AssistKind, EffectAction, HeroDefinition, Phase,
    SEAL_SUFFIX,
};
use crate::config::GameConfig;
use crate::env::{CatalogOracle, Env, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    AbilityId, GameMode, Position, SkillSlots, SpecialCounter, Stat, StatLine, StatusList, Team,
    Unit, UnitId,
};

/// Level every build is played at.
pub const BUILD_LEVEL: u32 = 40;

/// A player's configuration of one hero.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Build {
    pub hero: String,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub merges: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boon: Option<Stat>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bane: Option<Stat>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<AbilityId>,
}

#[cfg(feature = "serde")]
fn default_level() -> u32 {
    BUILD_LEVEL
}

impl Build {
    pub fn new(hero: impl Into<String>) -> Self {
        Self {
            hero: hero.into(),
            level: BUILD_LEVEL,
            merges: 0,
            boon: None,
            bane: None,
            skills: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(|id| AbilityId::new(id)).collect();
        self
    }

    #[must_use]
    pub fn with_traits(mut self, boon: Option<Stat>, bane: Option<Stat>) -> Self {
        self.boon = boon;
        self.bane = bane;
        self
    }

    #[must_use]
    pub fn with_merges(mut self, merges: u8) -> Self {
        self.merges = merges;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildError {
    #[error("unknown hero '{0}'")]
    UnknownHero(String),

    #[error("unknown skill '{0}'")]
    UnknownSkill(AbilityId),

    #[error("'{hero}' equips more than one {category} skill")]
    DuplicateCategory {
        hero: String,
        category: AbilityCategory,
    },

    #[error("'{hero}' cannot wield weapon '{skill}'")]
    WeaponTypeMismatch { hero: String, skill: AbilityId },

    #[error("'{hero}' may not learn '{skill}'")]
    Restricted { hero: String, skill: AbilityId },

    #[error("'{0}' is not available as a sacred seal")]
    SealNotAllowed(AbilityId),

    #[error("'{0}' cannot be equipped")]
    InvalidCategory(AbilityId),

    #[error("{merges} merges exceed the maximum of {max}")]
    TooManyMerges { merges: u8, max: u8 },

    #[error("level {0} is not supported")]
    UnsupportedLevel(u32),

    #[error("seal '{0}' is equipped by more than one unit")]
    DuplicateSeal(AbilityId),

    #[error("team has {found} units, expected {expected}")]
    TeamSize { found: usize, expected: usize },

    #[error("hero '{0}' appears more than once")]
    DuplicateHero(String),

    #[error("team has {0} refreshers, at most one is allowed")]
    TooManyRefreshers(usize),

    #[error("team {team} has {available} starting positions for {units} units")]
    NotEnoughStartingPositions {
        team: Team,
        available: usize,
        units: usize,
    },
}

impl From<OracleError> for BuildError {
    fn from(error: OracleError) -> Self {
        match error {
            OracleError::AbilityNotFound(id) => BuildError::UnknownSkill(AbilityId::new(id)),
            OracleError::HeroNotFound(id) => BuildError::UnknownHero(id),
        }
    }
}

impl GameError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            BuildError::UnknownHero(_) => "BUILD_UNKNOWN_HERO",
            BuildError::UnknownSkill(_) => "BUILD_UNKNOWN_SKILL",
            BuildError::DuplicateCategory { .. } => "BUILD_DUPLICATE_CATEGORY",
            BuildError::WeaponTypeMismatch { .. } => "BUILD_WEAPON_TYPE_MISMATCH",
            BuildError::Restricted { .. } => "BUILD_RESTRICTED",
            BuildError::SealNotAllowed(_) => "BUILD_SEAL_NOT_ALLOWED",
            BuildError::InvalidCategory(_) => "BUILD_INVALID_CATEGORY",
            BuildError::TooManyMerges { .. } => "BUILD_TOO_MANY_MERGES",
            BuildError::UnsupportedLevel(_) => "BUILD_UNSUPPORTED_LEVEL",
            BuildError::DuplicateSeal(_) => "BUILD_DUPLICATE_SEAL",
            BuildError::TeamSize { .. } => "BUILD_TEAM_SIZE",
            BuildError::DuplicateHero(_) => "BUILD_DUPLICATE_HERO",
            BuildError::TooManyRefreshers(_) => "BUILD_TOO_MANY_REFRESHERS",
            BuildError::NotEnoughStartingPositions { .. } => "BUILD_NOT_ENOUGH_STARTING_POSITIONS",
        }
    }
}

/// Checks a single build against its hero's restrictions.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_build<'a, C>(env: &Env<'a, C>, build: &Build) -> Result<&'a HeroDefinition, BuildError>
where
    C: CatalogOracle + ?Sized,
{
    let hero = env.hero(&build.hero)?;
    if build.level != BUILD_LEVEL {
        return Err(BuildError::UnsupportedLevel(build.level));
    }
    if build.merges > GameConfig::MAX_MERGES {
        return Err(BuildError::TooManyMerges {
            merges: build.merges,
            max: GameConfig::MAX_MERGES,
        });
    }
    if build.skills.len() > GameConfig::MAX_SKILL_SLOTS {
        return Err(BuildError::InvalidCategory(build.skills[GameConfig::MAX_SKILL_SLOTS].clone()));
    }

    let mut seen = BTreeSet::new();
    for id in &build.skills {
        let skill = match env.ability(id.as_str()) {
            Ok(skill) => skill,
            Err(_) if is_unsealable(env, id) => return Err(BuildError::SealNotAllowed(id.clone())),
            Err(error) => return Err(error.into()),
        };
        let category = skill.category();
        if category == AbilityCategory::Status {
            return Err(BuildError::InvalidCategory(id.clone()));
        }
        if !seen.insert(category) {
            return Err(BuildError::DuplicateCategory {
                hero: hero.id.clone(),
                category,
            });
        }
        if let Some(weapon) = skill.weapon() {
            if weapon.weapon_type != hero.weapon_type {
                return Err(BuildError::WeaponTypeMismatch {
                    hero: hero.id.clone(),
                    skill: id.clone(),
                });
            }
        }
        if !skill.can_use.allows(hero) {
            return Err(BuildError::Restricted {
                hero: hero.id.clone(),
                skill: id.clone(),
            });
        }
    }
    Ok(hero)
}

fn is_unsealable<C>(env: &Env<'_, C>, id: &AbilityId) -> bool
where
    C: CatalogOracle + ?Sized,
{
    id.as_str()
        .strip_suffix(SEAL_SUFFIX)
        .is_some_and(|base| env.catalog().ability(base).is_some())
}

/// Checks team-level rules on top of every build's own validity.
///
/// # Errors
///
/// Returns the first violated rule. Duel teams must field exactly
/// [`GameConfig::DUEL_TEAM_SIZE`] distinct heroes with at most one refresher.
pub fn validate_team<C>(env: &Env<'_, C>, mode: GameMode, builds: &[Build]) -> Result<(), BuildError>
where
    C: CatalogOracle + ?Sized,
{
    let mut seals = BTreeSet::new();
    for build in builds {
        validate_build(env, build)?;
        for id in &build.skills {
            let skill = env.ability(id.as_str())?;
            if skill.category() == AbilityCategory::PassiveS && !seals.insert(id.clone()) {
                return Err(BuildError::DuplicateSeal(id.clone()));
            }
        }
    }

    if mode != GameMode::Duel {
        return Ok(());
    }

    if builds.len() != GameConfig::DUEL_TEAM_SIZE {
        return Err(BuildError::TeamSize {
            found: builds.len(),
            expected: GameConfig::DUEL_TEAM_SIZE,
        });
    }

    let mut heroes = BTreeSet::new();
    for build in builds {
        if !heroes.insert(build.hero.as_str()) {
            return Err(BuildError::DuplicateHero(build.hero.clone()));
        }
    }

    let mut refreshers = 0;
    for build in builds {
        for id in &build.skills {
            let skill = env.ability(id.as_str())?;
            if matches!(skill.assist().map(|assist| &assist.kind), Some(AssistKind::Refresh)) {
                refreshers += 1;
            }
        }
    }
    if refreshers > 1 {
        return Err(BuildError::TooManyRefreshers(refreshers));
    }
    Ok(())
}

fn trait_delta(stat: Stat, strong: &[Stat]) -> i32 {
    if strong.contains(&stat) { 4 } else { 3 }
}

/// Level-40 stats after boon, bane and merges.
///
/// The bane only applies to unmerged builds. Merges raise stats in pairs
/// following the descending order of the level-1 stats, with a neutral
/// build's first merge also raising its top three stats.
pub fn base_stats(hero: &HeroDefinition, boon: Option<Stat>, bane: Option<Stat>, merges: u8) -> StatLine {
    let mut stats = hero.level40;
    let mut level1 = hero.level1;

    if let Some(boon) = boon {
        let delta = trait_delta(boon, &hero.superboons);
        stats[boon] += delta;
        level1[boon] += delta;
    }
    if let Some(bane) = bane.filter(|_| merges == 0) {
        let delta = trait_delta(bane, &hero.superbanes);
        stats[bane] -= delta;
        level1[bane] -= delta;
    }

    // stable sort keeps hp/atk/spd/def/res order on ties
    let mut order = Stat::ALL;
    order.sort_by(|a, b| level1[*b].cmp(&level1[*a]));

    for merge in 1..=merges as usize {
        if merge == 1 && bane.is_none() {
            for &stat in &order[..3] {
                stats[stat] += 1;
            }
        }
        stats[order[(2 * merge - 2) % 5]] += 1;
        stats[order[(2 * merge - 1) % 5]] += 1;
    }
    stats
}

/// Outcome of applying on-equip effects to a fresh unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Equipped {
    stats: StatLine,
    phantom: StatLine,
    special: Option<SpecialCounter>,
}

fn apply_equip_effects<'a>(
    skills: impl Iterator<Item = &'a AbilityDefinition>,
    mut equipped: Equipped,
) -> Equipped {
    for skill in skills {
        for effect in skill.effects_for(Phase::OnEquip) {
            for action in &effect.actions {
                match *action {
                    EffectAction::EquipStatMod { stat, value } => {
                        equipped.stats[stat] = (equipped.stats[stat] + value).max(0);
                    }
                    EffectAction::PhantomStat { stat, value } => equipped.phantom[stat] += value,
                    EffectAction::MaxSpecialCooldownMod(value) => {
                        if let Some(special) = equipped.special.as_mut() {
                            special.max = (special.max + value).max(1);
                            special.current = (special.current + value).max(1);
                        }
                    }
                    _ => {}
                }
            }
        }
    }
    equipped
}

/// Builds the board unit for `build`.
///
/// # Errors
///
/// Returns [`BuildError`] if the build is invalid.
pub fn instantiate<C>(
    env: &Env<'_, C>,
    build: &Build,
    team: Team,
    slot: usize,
    position: Position,
) -> Result<Unit, BuildError>
where
    C: CatalogOracle + ?Sized,
{
    let hero = validate_build(env, build)?;
    let skills = build
        .skills
        .iter()
        .map(|id| env.ability(id.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let special = skills
        .iter()
        .find_map(|skill| skill.special())
        .map(|special| SpecialCounter::new(special.cooldown));

    let equipped = apply_equip_effects(
        skills.iter().copied(),
        Equipped {
            stats: base_stats(hero, build.boon, build.bane, build.merges),
            phantom: StatLine::ZERO,
            special,
        },
    );

    let mut slots = SkillSlots::new();
    slots.extend(build.skills.iter().cloned());

    Ok(Unit {
        id: UnitId::for_slot(team, slot),
        team,
        hero: hero.id.clone(),
        weapon_type: hero.weapon_type,
        move_type: hero.move_type,
        position,
        stats: equipped.stats,
        max_hp: equipped.stats.hp,
        phantom: equipped.phantom,
        buffs: StatLine::ZERO,
        debuffs: StatLine::ZERO,
        bonuses: StatusList::new(),
        penalties: StatusList::new(),
        skills: slots,
        special: equipped.special,
        has_action: true,
        combats_in_phase: 0,
    })
}
