//! Condition evaluation.

use super::Scope;
use crate::ability::{Condition, MoveType, SpecialKind, StatCheck, WeaponType};
use crate::combat::Combatant;
use crate::env::{GameEnv, OracleError};
use crate::state::Unit;

fn matches_filters(unit: &Unit, move_type: Option<MoveType>, weapon_type: Option<WeaponType>) -> bool {
    move_type.is_none_or(|move_type| unit.move_type == move_type)
        && weapon_type.is_none_or(|weapon_type| unit.weapon_type == weapon_type)
}

/// Allies of `unit` within `spaces` that pass the filters.
fn allies_within(
    unit: &Unit,
    scope: &Scope<'_>,
    spaces: i32,
    move_type: Option<MoveType>,
    weapon_type: Option<WeaponType>,
) -> usize {
    scope
        .state
        .team(unit.team)
        .iter()
        .filter(|ally| {
            ally.id != unit.id
                && ally.is_alive()
                && ally.position.distance(unit.position) <= spaces
                && matches_filters(ally, move_type, weapon_type)
        })
        .count()
}

/// Whether `foe` can trigger the owner's defensive special with its attacks.
fn can_trigger_special(own: &Combatant, foe: &Combatant) -> bool {
    match &own.special_kind {
        Some(SpecialKind::Defensive { trigger_range }) => {
            trigger_range.is_none_or(|range| range == foe.range)
        }
        Some(SpecialKind::Miracle) => true,
        _ => false,
    }
}

/// Evaluates `condition` for the ability owner `unit`.
///
/// Combat facts read the pair in `scope`; without a combat they are false.
///
/// # Errors
///
/// Returns [`OracleError`] if a catalog lookup fails.
pub fn evaluate(
    env: &GameEnv<'_>,
    condition: &Condition,
    unit: &Unit,
    scope: &Scope<'_>,
) -> Result<bool, OracleError> {
    let state = scope.state;
    let own = || scope.combatant_by_id(unit.id);
    let foe = || scope.foe_of(unit.team);

    let holds = match condition {
        Condition::And(children) => {
            for child in children {
                if !evaluate(env, child, unit, scope)? {
                    return Ok(false);
                }
            }
            true
        }
        Condition::Or(children) => {
            for child in children {
                if evaluate(env, child, unit, scope)? {
                    return Ok(true);
                }
            }
            false
        }
        Condition::Not(child) => !evaluate(env, child, unit, scope)?,

        Condition::TurnIs(turn) => state.turn_count == *turn,
        Condition::OddTurn => state.turn_count % 2 == 1,
        Condition::EvenTurn => state.turn_count % 2 == 0,
        Condition::EveryThirdTurn => state.turn_count % 3 == 1,

        Condition::UnitInitiates => own().is_some_and(|own| own.initiator),
        Condition::FoeInitiates => foe().is_some_and(|foe| foe.initiator),

        Condition::UnitHp { cmp, threshold } => threshold.compare(*cmp, unit.hp(), unit.max_hp),
        Condition::UnitHpIsMax { start_of_combat } => {
            let hp = match own() {
                Some(own) if *start_of_combat => own.start_hp,
                _ => unit.hp(),
            };
            hp == unit.max_hp
        }
        Condition::FoeHp { cmp, threshold } => {
            foe().is_some_and(|foe| threshold.compare(*cmp, foe.unit.hp(), foe.unit.max_hp))
        }
        Condition::FoeHpIsMax => foe().is_some_and(|foe| foe.unit.hp() == foe.unit.max_hp),

        Condition::BuffActive => unit.buffs.any_positive(),
        Condition::DebuffActive => unit.debuffs.any_positive(),
        Condition::BonusActive => !unit.bonuses.is_empty(),
        Condition::PenaltyActive => !unit.penalties.is_empty(),

        Condition::WithinSpacesOfAlly {
            spaces,
            move_type,
            weapon_type,
            count,
        } => {
            let found = allies_within(unit, scope, *spaces, *move_type, *weapon_type);
            match count {
                Some(count) => found >= *count as usize,
                None => found > 0,
            }
        }
        Condition::AdjacentToAlly => allies_within(unit, scope, 1, None, None) > 0,
        Condition::NotAdjacentToAlly => allies_within(unit, scope, 1, None, None) == 0,
        Condition::AllyInCombatWithin {
            spaces,
            move_type,
            weapon_type,
        } => scope.combatant(unit.team).is_some_and(|ally| {
            ally.id() != unit.id
                && ally.unit.position.distance(unit.position) <= *spaces
                && matches_filters(&ally.unit, *move_type, *weapon_type)
        }),
        Condition::MovingAllyWithin { spaces, move_type } => scope.moving.is_some_and(|moving| {
            moving.id != unit.id
                && moving.team == unit.team
                && moving.position.distance(unit.position) <= *spaces
                && matches_filters(moving, *move_type, None)
        }),

        Condition::FoeMoveType(move_type) => foe().is_some_and(|foe| foe.unit.move_type == *move_type),
        Condition::FoeWeaponType(weapon_type) => {
            foe().is_some_and(|foe| foe.unit.weapon_type == *weapon_type)
        }
        Condition::FoeCanCounter => foe().is_some_and(|foe| foe.can_attack),
        Condition::FoeRange(range) => foe().is_some_and(|foe| foe.range == *range),
        Condition::UnitAttackedDuringCombat => own().is_some_and(|own| own.times_attacked > 0),
        Condition::FoeCanTriggerUnitSpecial => match (own(), foe()) {
            (Some(own), Some(foe)) => can_trigger_special(own, foe),
            _ => false,
        },

        Condition::StatCompare {
            unit_stat,
            foe_stat,
            cmp,
            check,
            unit_modifier,
            foe_modifier,
        } => match (own(), foe()) {
            (Some(own), Some(foe)) => {
                let (ours, theirs) = match check {
                    StatCheck::Visible => (own.visible(), foe.visible()),
                    StatCheck::InCombat => (own.totals(), foe.totals()),
                };
                let lhs = ours[*unit_stat] + unit_modifier + own.unit.phantom[*unit_stat];
                let rhs = theirs[*foe_stat] + foe_modifier + foe.unit.phantom[*foe_stat];
                cmp.holds(lhs as i64, rhs as i64)
            }
            _ => false,
        },

        Condition::FirstCombatInPhase => unit.combats_in_phase == 0,
        Condition::InCaptureArea => state.capture_area.contains(unit.position),
        Condition::IsCaptain => state.is_captain(unit),
    };
    Ok(holds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::ability::{Catalog, Comparison, HpThreshold};
    use crate::effects::testing::{board, unit};
    use crate::env::Env;
    use crate::state::{GameState, Team};

    fn holds(state: &GameState, owner: &Unit, condition: Condition) -> bool {
        let catalog = Catalog::default();
        let config = GameConfig::default();
        let env = Env::new(&catalog, &config).into_game_env();
        evaluate(&env, &condition, owner, &Scope::board(state)).unwrap()
    }

    #[test]
    fn hp_thresholds_and_logic_combine() {
        let mut owner = unit(Team::Blue, 0, 2, 2);
        owner.set_hp(20);
        let state = board(vec![owner.clone()], vec![unit(Team::Red, 0, 5, 0)]);

        assert!(holds(&state, &owner, Condition::unit_hp(Comparison::Le, 50)));
        assert!(!holds(&state, &owner, Condition::unit_hp(Comparison::Lt, 50)));
        let flat = Condition::UnitHp {
            cmp: Comparison::Gt,
            threshold: HpThreshold::Value(20),
        };
        assert!(!holds(&state, &owner, flat.clone()));
        assert!(holds(&state, &owner, Condition::Not(Box::new(flat.clone()))));
        let any = Condition::any([
            flat.clone(),
            Condition::UnitHpIsMax { start_of_combat: false },
            Condition::OddTurn,
        ]);
        assert!(holds(&state, &owner, any));
        assert!(!holds(&state, &owner, Condition::all([flat, Condition::OddTurn])));
    }

    #[test]
    fn turn_conditions_follow_the_count() {
        let owner = unit(Team::Blue, 0, 2, 2);
        let mut state = board(vec![owner.clone()], Vec::new());
        state.turn_count = 4;
        assert!(holds(&state, &owner, Condition::EvenTurn));
        assert!(holds(&state, &owner, Condition::EveryThirdTurn));
        assert!(!holds(&state, &owner, Condition::TurnIs(3)));
        state.turn_count = 3;
        assert!(!holds(&state, &owner, Condition::EveryThirdTurn));
    }

    #[test]
    fn ally_counts_respect_filters_and_distance() {
        let owner = unit(Team::Blue, 0, 2, 2);
        let mut rider = unit(Team::Blue, 1, 2, 3);
        rider.move_type = MoveType::Cavalry;
        let far = unit(Team::Blue, 2, 4, 4);
        let foe = unit(Team::Red, 0, 2, 1);
        let state = board(vec![owner.clone(), rider, far], vec![foe]);

        let within = |spaces, move_type, count| Condition::WithinSpacesOfAlly {
            spaces,
            move_type,
            weapon_type: None,
            count,
        };
        assert!(!holds(&state, &owner, within(2, None, Some(2))));
        assert!(holds(&state, &owner, within(4, None, Some(2))));
        assert!(holds(&state, &owner, within(1, Some(MoveType::Cavalry), None)));
        assert!(!holds(&state, &owner, within(3, Some(MoveType::Flier), None)));
        assert!(holds(&state, &owner, Condition::AdjacentToAlly));
        assert!(!holds(&state, &owner, Condition::NotAdjacentToAlly));
    }

    #[test]
    fn combat_facts_are_false_on_the_board() {
        let owner = unit(Team::Blue, 0, 2, 2);
        let state = board(vec![owner.clone()], vec![unit(Team::Red, 0, 2, 1)]);
        assert!(!holds(&state, &owner, Condition::FoeInitiates));
        assert!(!holds(&state, &owner, Condition::FoeCanCounter));
        assert!(!holds(&state, &owner, Condition::FoeRange(1)));
        assert!(holds(&state, &owner, Condition::FirstCombatInPhase));
    }
}
