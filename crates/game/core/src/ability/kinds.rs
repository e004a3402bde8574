//! Classification enums shared by heroes and abilities.

use crate::state::Stat;

/// Weapon colour for the weapon triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Colour {
    Red,
    Blue,
    Green,
    Colourless,
}

impl Colour {
    /// Returns +1 if `self` beats `other`, −1 if it loses, 0 otherwise.
    pub fn triangle(self, other: Colour) -> i32 {
        use Colour::*;
        match (self, other) {
            (Red, Green) | (Green, Blue) | (Blue, Red) => 1,
            (Green, Red) | (Blue, Green) | (Red, Blue) => -1,
            _ => 0,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponType {
    Sword,
    Lance,
    Axe,
    RedTome,
    BlueTome,
    GreenTome,
    ColourlessTome,
    RedBow,
    BlueBow,
    GreenBow,
    ColourlessBow,
    RedDagger,
    BlueDagger,
    GreenDagger,
    ColourlessDagger,
    RedBreath,
    BlueBreath,
    GreenBreath,
    ColourlessBreath,
    RedBeast,
    BlueBeast,
    GreenBeast,
    ColourlessBeast,
    Staff,
}

impl WeaponType {
    pub fn colour(self) -> Colour {
        use WeaponType::*;
        match self {
            Sword | RedTome | RedBow | RedDagger | RedBreath | RedBeast => Colour::Red,
            Lance | BlueTome | BlueBow | BlueDagger | BlueBreath | BlueBeast => Colour::Blue,
            Axe | GreenTome | GreenBow | GreenDagger | GreenBreath | GreenBeast => Colour::Green,
            ColourlessTome | ColourlessBow | ColourlessDagger | ColourlessBreath
            | ColourlessBeast | Staff => Colour::Colourless,
        }
    }

    /// Attack range in tiles.
    pub fn range(self) -> i32 {
        if self.is_melee() { 1 } else { 2 }
    }

    pub fn is_melee(self) -> bool {
        use WeaponType::*;
        matches!(
            self,
            Sword
                | Lance
                | Axe
                | RedBreath
                | BlueBreath
                | GreenBreath
                | ColourlessBreath
                | RedBeast
                | BlueBeast
                | GreenBeast
                | ColourlessBeast
        )
    }

    /// Stat the defender uses against this weapon.
    pub fn targets(self) -> Stat {
        use WeaponType::*;
        match self {
            RedTome | BlueTome | GreenTome | ColourlessTome | Staff | RedBreath | BlueBreath
            | GreenBreath | ColourlessBreath => Stat::Res,
            _ => Stat::Def,
        }
    }

    pub fn is_staff(self) -> bool {
        matches!(self, WeaponType::Staff)
    }

    pub fn is_dagger(self) -> bool {
        use WeaponType::*;
        matches!(self, RedDagger | BlueDagger | GreenDagger | ColourlessDagger)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveType {
    Infantry,
    Armoured,
    Cavalry,
    Flier,
}

impl MoveType {
    /// Tiles a unit of this class may move without modifiers.
    pub fn base_range(self) -> i32 {
        match self {
            MoveType::Infantry | MoveType::Flier => 2,
            MoveType::Armoured => 1,
            MoveType::Cavalry => 3,
        }
    }
}

/// Slot an ability occupies in a build. At most one ability per category.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityCategory {
    Weapon,
    Assist,
    Special,
    PassiveA,
    PassiveB,
    PassiveC,
    PassiveS,
    Captain,
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_is_cyclic() {
        assert_eq!(Colour::Red.triangle(Colour::Green), 1);
        assert_eq!(Colour::Green.triangle(Colour::Blue), 1);
        assert_eq!(Colour::Blue.triangle(Colour::Red), 1);
        assert_eq!(Colour::Red.triangle(Colour::Blue), -1);
        assert_eq!(Colour::Colourless.triangle(Colour::Red), 0);
    }

    #[test]
    fn magic_targets_resistance() {
        assert_eq!(WeaponType::BlueTome.targets(), Stat::Res);
        assert_eq!(WeaponType::Lance.targets(), Stat::Def);
        assert_eq!(WeaponType::ColourlessBow.range(), 2);
        assert_eq!(WeaponType::RedBreath.range(), 1);
    }
}
