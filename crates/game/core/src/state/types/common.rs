use std::fmt;
use std::ops::{Index, IndexMut};

/// Unique identifier for a unit on the board.
///
/// Team 0 units are numbered from 101, team 1 units from 201, in roster order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    /// Builds the identifier for the `slot`-th unit of `team`.
    pub const fn for_slot(team: Team, slot: usize) -> Self {
        Self(team.id_base() + slot as u32)
    }

    /// Roster slot encoded in the identifier.
    pub const fn slot(self) -> usize {
        (self.0 % 100) as usize - 1
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two sides of a match. Blue deploys on the high rows, Red on the low rows.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Team {
    #[default]
    Blue,
    Red,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Blue, Team::Red];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Team::Blue => 0,
            Team::Red => 1,
        }
    }

    #[inline]
    pub const fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    const fn id_base(self) -> u32 {
        crate::config::GameConfig::TEAM_ID_BASE[self.index()]
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two tiles.
    pub const fn distance(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Four orthogonal neighbours, in up/down/left/right order. May be off the map.
    pub const fn neighbors(self) -> [Position; 4] {
        [
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(-1, 0),
            self.offset(1, 0),
        ]
    }

    /// Reflects `self` through `pivot`: `2·pivot − self`.
    pub const fn mirrored_through(self, pivot: Position) -> Self {
        Self::new(2 * pivot.x - self.x, 2 * pivot.y - self.y)
    }

    /// Tiles within `radius` (manhattan), centre included, row-major order.
    pub fn diamond(self, radius: i32) -> impl Iterator<Item = Position> {
        (-radius..=radius).flat_map(move |dy| {
            (-radius..=radius)
                .filter(move |dx| dx.abs() + dy.abs() <= radius)
                .map(move |dx| self.offset(dx, dy))
        })
    }

    pub const fn shares_line_with(self, other: Position) -> bool {
        self.x == other.x || self.y == other.y
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unit statistic.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Stat {
    Hp,
    Atk,
    Spd,
    Def,
    Res,
}

impl Stat {
    /// Stats that take buffs, debuffs and in-combat modifiers.
    pub const COMBAT: [Stat; 4] = [Stat::Atk, Stat::Spd, Stat::Def, Stat::Res];
    pub const ALL: [Stat; 5] = [Stat::Hp, Stat::Atk, Stat::Spd, Stat::Def, Stat::Res];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A full line of stat values. Also used for buff, debuff and in-combat
/// modifier lines, where the `hp` field stays zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatLine {
    #[cfg_attr(feature = "serde", serde(default))]
    pub hp: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub atk: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spd: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub def: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub res: i32,
}

impl StatLine {
    pub const ZERO: Self = Self::new(0, 0, 0, 0, 0);

    pub const fn new(hp: i32, atk: i32, spd: i32, def: i32, res: i32) -> Self {
        Self {
            hp,
            atk,
            spd,
            def,
            res,
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        self[stat]
    }

    /// Sum of the four combat stats.
    pub fn combat_total(&self) -> i32 {
        self.atk + self.spd + self.def + self.res
    }

    pub fn any_positive(&self) -> bool {
        Stat::COMBAT.iter().any(|&stat| self[stat] > 0)
    }

    pub fn clear(&mut self) {
        *self = Self::ZERO;
    }
}

impl Index<Stat> for StatLine {
    type Output = i32;

    fn index(&self, stat: Stat) -> &i32 {
        match stat {
            Stat::Hp => &self.hp,
            Stat::Atk => &self.atk,
            Stat::Spd => &self.spd,
            Stat::Def => &self.def,
            Stat::Res => &self.res,
        }
    }
}

impl IndexMut<Stat> for StatLine {
    fn index_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Hp => &mut self.hp,
            Stat::Atk => &mut self.atk,
            Stat::Spd => &mut self.spd,
            Stat::Def => &mut self.def,
            Stat::Res => &mut self.res,
        }
    }
}

/// Stable identifier of a catalog ability (weapon, skill, status, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(pub String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AbilityId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::borrow::Borrow<str> for AbilityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ids_follow_team_numbering() {
        assert_eq!(UnitId::for_slot(Team::Blue, 0), UnitId(101));
        assert_eq!(UnitId::for_slot(Team::Red, 4), UnitId(205));
        assert_eq!(UnitId(203).slot(), 2);
    }

    #[test]
    fn diamond_covers_manhattan_ball() {
        let tiles: Vec<_> = Position::new(3, 3).diamond(1).collect();
        assert_eq!(tiles.len(), 5);
        assert!(tiles.contains(&Position::new(3, 3)));
        assert!(tiles.contains(&Position::new(4, 3)));
        assert!(!tiles.contains(&Position::new(4, 4)));
        assert_eq!(Position::new(0, 0).diamond(2).count(), 13);
    }

    #[test]
    fn mirroring_reflects_through_pivot() {
        let unit = Position::new(2, 2);
        let target = Position::new(2, 3);
        assert_eq!(unit.mirrored_through(target), Position::new(2, 4));
        assert_eq!(target.mirrored_through(unit), Position::new(2, 1));
    }
}
