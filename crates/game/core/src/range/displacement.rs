//! Displacement geometry shared by movement assists and post-combat movement.
//!
//! With `u` the user's tile and `t` the target's tile:
//!
//! | kind       | user ends on | target ends on |
//! |------------|--------------|----------------|
//! | Swap       | `t`          | `u`            |
//! | Shove      | `u`          | `2t − u`       |
//! | Smite      | `u`          | `3t − 2u`      |
//! | DrawBack   | `2u − t`     | `u`            |
//! | Reposition | `u`          | `2u − t`       |
//! | Pivot      | `2t − u`     | `t`            |
//! | HitAndRun  | `2u − t`     | `t`            |

use crate::ability::{Displacement, MoveType};
use crate::engine::OutcomeEvent;
use crate::env::TerrainKind;
use crate::state::{GameState, Position, Unit, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destinations {
    pub unit: Position,
    pub target: Position,
}

/// Raw destinations of `kind`, without any validity check.
pub fn destinations(kind: Displacement, user: Position, target: Position) -> Destinations {
    match kind {
        Displacement::Swap => Destinations {
            unit: target,
            target: user,
        },
        Displacement::Shove => Destinations {
            unit: user,
            target: user.mirrored_through(target),
        },
        Displacement::Smite => Destinations {
            unit: user,
            target: target.offset(2 * (target.x - user.x), 2 * (target.y - user.y)),
        },
        Displacement::DrawBack => Destinations {
            unit: target.mirrored_through(user),
            target: user,
        },
        Displacement::Reposition => Destinations {
            unit: user,
            target: target.mirrored_through(user),
        },
        Displacement::Pivot => Destinations {
            unit: user.mirrored_through(target),
            target,
        },
        Displacement::HitAndRun => Destinations {
            unit: target.mirrored_through(user),
            target,
        },
    }
}

/// Whether Smite can carry the target over its first tile.
fn smite_clear(state: &GameState, user: &Unit, over: Position, landing: Position, target_move: MoveType) -> bool {
    state
        .map
        .terrain(over)
        .is_some_and(|terrain| terrain != TerrainKind::Wall)
        && !state.map.is_blocked(over)
        && state.map.can_land_on(target_move, landing)
        && !state.is_occupied(landing, Some(user.id))
}

fn is_valid(
    state: &GameState,
    kind: Displacement,
    user: &Unit,
    target_move: MoveType,
    destinations: Destinations,
) -> bool {
    if !state.map.can_land_on(user.move_type, destinations.unit)
        || !state.map.can_land_on(target_move, destinations.target)
    {
        return false;
    }
    match kind {
        Displacement::Swap => true,
        Displacement::Shove | Displacement::Smite | Displacement::Reposition => {
            !state.is_occupied(destinations.target, Some(user.id))
        }
        Displacement::DrawBack | Displacement::Pivot | Displacement::HitAndRun => {
            !state.is_occupied(destinations.unit, Some(user.id))
        }
    }
}

/// Valid destinations of `kind` applied by `user` to the unit at
/// `target_position`, or `None` if the displacement cannot happen.
///
/// A missing `target` (defeated in combat) lands like a flier. Smite that
/// cannot clear its path falls back to Shove.
pub fn resolve(
    state: &GameState,
    kind: Displacement,
    user: &Unit,
    target_position: Position,
    target: Option<&Unit>,
) -> Option<Destinations> {
    let target_move = target.map_or(MoveType::Flier, |target| target.move_type);
    let mut kind = kind;
    if kind == Displacement::Smite {
        let over = user.position.mirrored_through(target_position);
        let landing = destinations(kind, user.position, target_position).target;
        if !smite_clear(state, user, over, landing, target_move) {
            kind = Displacement::Shove;
        }
    }
    let destinations = destinations(kind, user.position, target_position);
    is_valid(state, kind, user, target_move, destinations).then_some(destinations)
}

/// Moves `user` and `target` to their destinations.
pub fn apply(
    state: &mut GameState,
    user: UnitId,
    target: Option<UnitId>,
    destinations: Destinations,
    events: &mut Vec<OutcomeEvent>,
) {
    let moves = [(Some(user), destinations.unit), (target, destinations.target)];
    let mut planned = Vec::with_capacity(2);
    for (id, to) in moves {
        let Some(id) = id else {
            continue;
        };
        if let Some(unit) = state.unit(id) {
            if unit.position != to {
                planned.push((id, unit.position, to));
            }
        }
    }
    for &(id, from, to) in &planned {
        if let Some(unit) = state.unit_mut(id) {
            unit.position = to;
        }
        events.push(OutcomeEvent::Displaced { unit: id, from, to });
    }
}
