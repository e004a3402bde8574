//! Movement-modifier collection.

use std::collections::BTreeSet;

use super::{Scope, Triggered, collect};
use crate::ability::{EffectAction, MovementFlags, Phase, WarpRule};
use crate::env::{GameEnv, OracleError};
use crate::state::{GameState, Position, Unit};

/// Movement capabilities of one unit for one range calculation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementModifiers {
    pub flags: MovementFlags,
    /// Highest extra-move grant; grants never add up.
    pub extra_spaces: i32,
    /// Tiles the unit may land on but not pass through.
    pub obstructed: BTreeSet<Position>,
    /// Extra destinations reachable without a path.
    pub warp: BTreeSet<Position>,
}

fn warp_tiles(state: &GameState, mover: &Unit, owner: &Unit, rule: &WarpRule, out: &mut BTreeSet<Position>) {
    let mut add_around = |centre: Position, radius: i32| {
        for tile in centre.diamond(radius) {
            if tile != centre
                && state.map.can_land_on(mover.move_type, tile)
                && !state.is_occupied(tile, Some(mover.id))
            {
                out.insert(tile);
            }
        }
    };

    match rule {
        WarpRule::SpacesWithinUnit { spaces } => add_around(owner.position, *spaces),
        WarpRule::SpacesWithinAllies {
            warp_range,
            ally_range,
            move_type,
            hp_threshold,
        } => {
            for ally in state.team(owner.team) {
                if ally.id == owner.id || ally.id == mover.id || !ally.is_alive() {
                    continue;
                }
                if ally_range.is_some_and(|range| ally.position.distance(owner.position) > range) {
                    continue;
                }
                if move_type.is_some_and(|move_type| ally.move_type != move_type) {
                    continue;
                }
                if hp_threshold
                    .is_some_and(|percent| ally.hp() * 100 > ally.max_hp * percent)
                {
                    continue;
                }
                add_around(ally.position, *warp_range);
            }
        }
    }
}

fn apply(state: &GameState, mover: &Unit, triggered: &[Triggered<'_>], modifiers: &mut MovementModifiers) {
    for t in triggered {
        let Some(owner) = state.unit(t.owner) else {
            continue;
        };
        match t.action {
            EffectAction::MoveExtraSpaces(spaces) => {
                modifiers.extra_spaces = modifiers.extra_spaces.max(*spaces);
            }
            EffectAction::SetMovementFlag(flag) => modifiers.flags |= MovementFlags::from(*flag),
            EffectAction::ObstructTiles { spaces } => {
                modifiers.obstructed.extend(
                    owner
                        .position
                        .diamond(*spaces)
                        .filter(|tile| state.map.contains(*tile)),
                );
            }
            EffectAction::EnableWarp(rule) => warp_tiles(state, mover, owner, rule, &mut modifiers.warp),
            _ => {}
        }
    }
}

/// Collects the movement modifiers acting on `unit`: its own movement
/// effects, its allies' ally-movement effects and its foes' enemy-movement
/// effects, in that order.
///
/// # Errors
///
/// Returns [`OracleError`] if a unit references an unknown ability.
pub fn movement_modifiers(
    env: &GameEnv<'_>,
    state: &GameState,
    unit: &Unit,
) -> Result<MovementModifiers, OracleError> {
    let scope = Scope::board(state).with_moving(unit);
    let mut triggered = Vec::new();

    collect(env, Phase::CalculateOwnMovement, unit, &scope, &mut triggered)?;
    for ally in state.allies_of(unit) {
        collect(env, Phase::CalculateAllyMovement, ally, &scope, &mut triggered)?;
    }
    for foe in state.foes_of(unit.team) {
        collect(env, Phase::CalculateEnemyMovement, foe, &scope, &mut triggered)?;
    }

    let mut modifiers = MovementModifiers::default();
    apply(state, unit, &triggered, &mut modifiers);
    Ok(modifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::ability::{Catalog, Condition, Effect, HeroDefinition};
    use crate::effects::testing::{board, equip, passive_b, unit};
    use crate::env::Env;
    use crate::state::{Team, UnitId};

    fn catalog() -> Catalog {
        let own = |spaces| {
            vec![Effect::new(
                Phase::CalculateOwnMovement,
                vec![EffectAction::MoveExtraSpaces(spaces)],
            )]
        };
        let abilities = vec![
            passive_b("STRIDE_1", own(1)),
            passive_b("STRIDE_2", own(2)),
            passive_b(
                "GUIDANCE",
                vec![Effect::new(Phase::CalculateAllyMovement, vec![EffectAction::MoveExtraSpaces(1)])
                    .when(Condition::MovingAllyWithin {
                        spaces: 2,
                        move_type: None,
                    })],
            ),
            passive_b(
                "OBSTRUCT",
                vec![Effect::new(
                    Phase::CalculateEnemyMovement,
                    vec![EffectAction::ObstructTiles { spaces: 1 }],
                )],
            ),
            passive_b(
                "ESCORT",
                vec![Effect::new(
                    Phase::CalculateAllyMovement,
                    vec![EffectAction::EnableWarp(WarpRule::SpacesWithinUnit { spaces: 1 })],
                )],
            ),
        ];
        Catalog::build(abilities, Vec::<HeroDefinition>::new()).unwrap()
    }

    fn modifiers(state: &GameState, unit: &Unit) -> MovementModifiers {
        let catalog = catalog();
        let config = GameConfig::default();
        let env = Env::new(&catalog, &config).into_game_env();
        movement_modifiers(&env, state, unit).unwrap()
    }

    #[test]
    fn extra_movement_grants_do_not_add_up() {
        let mut mover = unit(Team::Blue, 0, 2, 2);
        equip(&mut mover, "STRIDE_1");
        equip(&mut mover, "STRIDE_2");
        let state = board(vec![mover.clone()], vec![unit(Team::Red, 0, 0, 0)]);
        assert_eq!(modifiers(&state, &mover).extra_spaces, 2);
    }

    #[test]
    fn ally_grants_depend_on_the_moving_unit() {
        let mover = unit(Team::Blue, 0, 2, 2);
        let mut guide = unit(Team::Blue, 1, 2, 4);
        equip(&mut guide, "GUIDANCE");
        let mut state = board(vec![mover.clone(), guide], vec![unit(Team::Red, 0, 0, 0)]);
        assert_eq!(modifiers(&state, &mover).extra_spaces, 1);

        state.unit_mut(UnitId::for_slot(Team::Blue, 1)).unwrap().position = Position::new(5, 5);
        assert_eq!(modifiers(&state, &mover).extra_spaces, 0);
    }

    #[test]
    fn foe_obstruction_is_clipped_to_the_board() {
        let mover = unit(Team::Blue, 0, 3, 3);
        let mut wall = unit(Team::Red, 0, 0, 0);
        equip(&mut wall, "OBSTRUCT");
        let state = board(vec![mover.clone()], vec![wall]);

        let expected: BTreeSet<Position> =
            [Position::new(0, 0), Position::new(1, 0), Position::new(0, 1)].into_iter().collect();
        assert_eq!(modifiers(&state, &mover).obstructed, expected);
    }

    #[test]
    fn warp_skips_occupied_tiles_and_the_owner() {
        let mover = unit(Team::Blue, 0, 0, 5);
        let mut escort = unit(Team::Blue, 1, 3, 3);
        equip(&mut escort, "ESCORT");
        let blocker = unit(Team::Red, 0, 3, 4);
        let state = board(vec![mover.clone(), escort], vec![blocker]);

        let expected: BTreeSet<Position> =
            [Position::new(2, 3), Position::new(4, 3), Position::new(3, 2)].into_iter().collect();
        assert_eq!(modifiers(&state, &mover).warp, expected);
    }
}
