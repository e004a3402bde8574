//! Unit selectors used by effect actions.

use super::{Comparison, MoveType, WeaponType};
use crate::state::Stat;

/// Stat filter comparing the effect owner with each candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatFilter {
    pub unit_stat: Stat,
    pub other_stat: Stat,
    #[cfg_attr(feature = "serde", serde(default = "StatFilter::default_cmp"))]
    pub cmp: Comparison,
}

impl StatFilter {
    pub const fn greater(unit_stat: Stat, other_stat: Stat) -> Self {
        Self {
            unit_stat,
            other_stat,
            cmp: Comparison::Gt,
        }
    }

    #[cfg(feature = "serde")]
    fn default_cmp() -> Comparison {
        Comparison::Gt
    }
}

/// Selects which units an effect action applies to.
///
/// `Unit` is the owner of the ability. "Foe" variants refer to the foe of the
/// combat the owner (or its ally) is part of.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    #[default]
    Unit,
    AllyInCombat,
    Foe,
    FoeInCombat,
    /// The combat foe as it exists on the board after combat, if still alive.
    FoePostCombat,
    FoesWithinSpacesOfFoe {
        spaces: i32,
    },
    FoeAndFoesWithinSpacesOfFoe {
        spaces: i32,
    },
    UnitAndAlliesWithin {
        spaces: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        move_type: Option<MoveType>,
        #[cfg_attr(feature = "serde", serde(default))]
        weapon_type: Option<WeaponType>,
    },
    AlliesWithin {
        spaces: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        move_type: Option<MoveType>,
        #[cfg_attr(feature = "serde", serde(default))]
        weapon_type: Option<WeaponType>,
    },
    FoesWithin {
        spaces: i32,
    },
    FoesInCardinalDirections {
        #[cfg_attr(feature = "serde", serde(default))]
        filter: Option<StatFilter>,
    },
    FoeWithHighestStat(Stat),
    FoeWithLowestStat(Stat),
    AssistUser,
    AssistTarget,
    AllAllies {
        #[cfg_attr(feature = "serde", serde(default))]
        move_type: Option<MoveType>,
        #[cfg_attr(feature = "serde", serde(default))]
        filter: Option<StatFilter>,
    },
    AllFoes,
}

impl Target {
    /// True if the selector can only be resolved while a combat pair exists.
    pub fn needs_combat(&self) -> bool {
        matches!(
            self,
            Target::AllyInCombat
                | Target::Foe
                | Target::FoeInCombat
                | Target::FoePostCombat
                | Target::FoesWithinSpacesOfFoe { .. }
                | Target::FoeAndFoesWithinSpacesOfFoe { .. }
        )
    }

    /// True if the selector only makes sense during an assist.
    pub fn needs_assist(&self) -> bool {
        matches!(self, Target::AssistUser | Target::AssistTarget)
    }
}

/// Extra destinations granted by a warp capability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarpRule {
    /// Tiles within `spaces` of the ability owner.
    SpacesWithinUnit { spaces: i32 },
    /// Tiles within `warp_range` of allies of the owner that are within
    /// `ally_range` of it and match the filters.
    SpacesWithinAllies {
        warp_range: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        ally_range: Option<i32>,
        #[cfg_attr(feature = "serde", serde(default))]
        move_type: Option<MoveType>,
        /// Only allies whose HP percentage is at or below this value qualify.
        #[cfg_attr(feature = "serde", serde(default))]
        hp_threshold: Option<i32>,
    },
}
