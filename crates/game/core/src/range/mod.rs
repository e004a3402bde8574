//! Movement and threat ranges.
//!
//! Movement is a flood search from the unit's tile bounded by its move
//! allowance. Terrain surcharges apply when entering a tile, never on the
//! starting tile. Foes and intact blocks stop traversal; allies only stop
//! landing. Warp destinations are added after the search without a path.
pub mod displacement;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::ability::{AbilityCategory, MovementFlags};
use crate::effects::movement_modifiers;
use crate::env::{GameEnv, OracleError};
use crate::state::{GameState, Position, Unit};

/// Tiles a unit can end its move on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementRange {
    pub tiles: BTreeSet<Position>,
    /// Path from the starting tile to each reachable tile, both ends
    /// included. Empty unless paths were requested.
    pub paths: BTreeMap<Position, Vec<Position>>,
}

impl MovementRange {
    pub fn contains(&self, position: Position) -> bool {
        self.tiles.contains(&position)
    }

    pub fn path(&self, position: Position) -> Option<&[Position]> {
        self.paths.get(&position).map(Vec::as_slice)
    }
}

/// Tiles at exactly `distance` from `centre`.
pub fn tiles_at(centre: Position, distance: i32) -> impl Iterator<Item = Position> {
    centre
        .diamond(distance)
        .filter(move |tile| tile.distance(centre) == distance)
}

/// Range of the unit's equipped weapon, `None` without a weapon.
///
/// # Errors
///
/// Returns [`OracleError`] if an equipped ability is missing from the catalog.
pub fn weapon_range(env: &GameEnv<'_>, unit: &Unit) -> Result<Option<i32>, OracleError> {
    Ok(env
        .equipped(unit, AbilityCategory::Weapon)?
        .and_then(|weapon| weapon.weapon())
        .map(|weapon| weapon.range))
}

struct Step {
    position: Position,
    remaining: i32,
    path: Vec<Position>,
}

/// Computes the tiles `unit` can move to.
///
/// # Errors
///
/// Returns [`OracleError`] if a unit references an unknown ability.
pub fn movement_range(
    env: &GameEnv<'_>,
    state: &GameState,
    unit: &Unit,
    include_path: bool,
) -> Result<MovementRange, OracleError> {
    let modifiers = movement_modifiers(env, state, unit)?;
    let pass = modifiers.flags.contains(MovementFlags::PASS);
    let allowance = if modifiers.flags.contains(MovementFlags::RESTRICT) {
        1
    } else {
        unit.move_type.base_range() + modifiers.extra_spaces
    };

    let start = unit.position;
    let mut best: BTreeMap<Position, i32> = BTreeMap::new();
    let mut paths = BTreeMap::new();
    let mut queue = VecDeque::from([Step {
        position: start,
        remaining: allowance,
        path: vec![start],
    }]);

    while let Some(Step {
        position,
        mut remaining,
        path,
    }) = queue.pop_front()
    {
        let Some(terrain) = state.map.terrain(position) else {
            continue;
        };
        if !terrain.admits(unit.move_type) || state.map.is_blocked(position) {
            continue;
        }
        if position != start {
            remaining -= terrain.extra_cost(unit.move_type);
            if remaining < 0 {
                continue;
            }
        }
        if !pass
            && state
                .foes_of(unit.team)
                .iter()
                .any(|foe| foe.position == position)
        {
            continue;
        }
        if best.get(&position).is_some_and(|&seen| seen >= remaining) {
            continue;
        }
        best.insert(position, remaining);
        if include_path {
            paths.insert(position, path.clone());
        }

        if !pass && position != start && modifiers.obstructed.contains(&position) {
            continue;
        }
        if remaining > 0 {
            for next in position.neighbors() {
                let mut next_path = Vec::new();
                if include_path {
                    next_path.reserve(path.len() + 1);
                    next_path.extend_from_slice(&path);
                    next_path.push(next);
                }
                queue.push_back(Step {
                    position: next,
                    remaining: remaining - 1,
                    path: next_path,
                });
            }
        }
    }

    for &tile in &modifiers.warp {
        if !best.contains_key(&tile) {
            best.insert(tile, 0);
            if include_path {
                paths.insert(tile, vec![start, tile]);
            }
        }
    }

    let tiles: BTreeSet<Position> = best
        .into_keys()
        .filter(|&tile| !state.is_occupied(tile, Some(unit.id)))
        .collect();
    paths.retain(|tile, _| tiles.contains(tile));
    Ok(MovementRange { tiles, paths })
}

/// Computes the tiles `unit` could attack after moving.
///
/// # Errors
///
/// Returns [`OracleError`] if a unit references an unknown ability.
pub fn threat_range(
    env: &GameEnv<'_>,
    state: &GameState,
    unit: &Unit,
) -> Result<BTreeSet<Position>, OracleError> {
    let Some(range) = weapon_range(env, unit)? else {
        return Ok(BTreeSet::new());
    };
    let movement = movement_range(env, state, unit, false)?;
    Ok(movement
        .tiles
        .iter()
        .flat_map(|&tile| tiles_at(tile, range))
        .filter(|&tile| state.map.is_attackable(tile))
        .collect())
}
