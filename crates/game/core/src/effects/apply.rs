//! Out-of-combat action application.

use std::collections::BTreeMap;

use super::{AssistScope, Scope, Triggered, target};
use crate::ability::{DamageAmount, EffectAction, HealAmount, Polarity};
use crate::combat::Combatant;
use crate::engine::OutcomeEvent;
use crate::env::{GameEnv, OracleError};
use crate::range::displacement;
use crate::state::{GameState, Team, Unit, UnitId};

fn scope<'s>(
    state: &'s GameState,
    combat: Option<&'s [Combatant; 2]>,
    assist: Option<AssistScope>,
) -> Scope<'s> {
    let mut scope = match combat {
        Some(combatants) => Scope::combat(state, combatants, false),
        None => Scope::board(state),
    };
    scope.assist = assist;
    scope
}

/// Board position of `id`, falling back to its combat copy once it has left the board.
fn last_position(state: &GameState, combat: Option<&[Combatant; 2]>, id: UnitId) -> Option<crate::state::Position> {
    state.unit(id).map(|unit| unit.position).or_else(|| {
        combat.and_then(|pair| pair.iter().find(|c| c.id() == id).map(|c| c.unit.position))
    })
}

/// Applies board-level actions in order.
///
/// Damage and healing are summed per target and applied once at the end,
/// leaving every touched unit with at least 1 HP. All other actions apply
/// immediately. Combat-only and movement actions are ignored here.
///
/// # Errors
///
/// Returns [`OracleError`] if an applied status is missing from the catalog.
pub fn apply_board(
    env: &GameEnv<'_>,
    state: &mut GameState,
    triggered: &[Triggered<'_>],
    combat: Option<&[Combatant; 2]>,
    assist: Option<AssistScope>,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let mut hp_changes: BTreeMap<UnitId, i32> = BTreeMap::new();

    for t in triggered {
        let Some(owner) = state.unit(t.owner).cloned() else {
            continue;
        };
        let targets = match t.action.target() {
            Some(selector) => target::resolve(selector, &owner, &scope(state, combat, assist)),
            None => Vec::new(),
        };

        match t.action {
            EffectAction::DealDamage {
                amount: DamageAmount::Value(value),
                ..
            } => {
                for id in targets {
                    *hp_changes.entry(id).or_default() -= value;
                }
            }
            EffectAction::RestoreHp { amount, .. } => {
                let value = match amount {
                    HealAmount::Value(value) => *value,
                    HealAmount::HpRestoredToTarget => assist.map_or(0, |assist| assist.hp_restored),
                    HealAmount::PercentOfDamageDealt(_) => continue,
                };
                for id in targets {
                    *hp_changes.entry(id).or_default() += value;
                }
            }
            EffectAction::CurrentSpecialCooldownMod { value, .. } => {
                for id in targets {
                    if let Some(special) = state.unit_mut(id).and_then(|unit| unit.special.as_mut()) {
                        if special.current != 0 {
                            special.current = (special.current + value).clamp(0, special.max);
                        }
                    }
                }
            }
            EffectAction::ApplyBuff { stat, value, .. } => {
                for id in targets {
                    if let Some(unit) = state.unit_mut(id) {
                        unit.buffs[*stat] = unit.buffs[*stat].max(*value);
                        events.push(OutcomeEvent::Buffed {
                            unit: id,
                            stat: *stat,
                            value: unit.buffs[*stat],
                        });
                    }
                }
            }
            EffectAction::ApplyDebuff { stat, value, .. } => {
                for id in targets {
                    if let Some(unit) = state.unit_mut(id) {
                        unit.debuffs[*stat] = unit.debuffs[*stat].max(*value);
                        events.push(OutcomeEvent::Debuffed {
                            unit: id,
                            stat: *stat,
                            value: unit.debuffs[*stat],
                        });
                    }
                }
            }
            EffectAction::ApplyStatus { status, .. } => {
                let polarity = env.ability(status.as_str())?.polarity();
                for id in targets {
                    let Some(unit) = state.unit_mut(id) else {
                        continue;
                    };
                    let list = match polarity {
                        Some(Polarity::Positive) => &mut unit.bonuses,
                        _ => &mut unit.penalties,
                    };
                    if Unit::push_status(list, status.clone()) {
                        events.push(OutcomeEvent::StatusApplied {
                            unit: id,
                            status: status.clone(),
                        });
                    }
                }
            }
            EffectAction::PostCombatMovement { movement, .. } => {
                for id in targets {
                    // A self-targeted displacement moves relative to the combat foe.
                    let other = if id == owner.id {
                        combat
                            .and_then(|pair| pair.iter().find(|c| c.unit.team != owner.team))
                            .map(|c| c.id())
                    } else {
                        Some(id)
                    };
                    let Some(other) = other else {
                        continue;
                    };
                    let Some(other_position) = last_position(state, combat, other) else {
                        continue;
                    };
                    let target_unit = state.unit(other).filter(|unit| unit.is_alive()).cloned();
                    let Some(destinations) = displacement::resolve(
                        state,
                        *movement,
                        &owner,
                        other_position,
                        target_unit.as_ref(),
                    ) else {
                        continue;
                    };
                    displacement::apply(state, owner.id, target_unit.map(|unit| unit.id), destinations, events);
                }
            }
            EffectAction::PullCaptureArea => {
                let dy = match owner.team {
                    Team::Blue => 1,
                    Team::Red => -1,
                };
                let height = state.map.dimensions.height as i32;
                state.capture_area = state.capture_area.shifted(dy, height);
                events.push(OutcomeEvent::CaptureAreaMoved(state.capture_area));
            }
            _ => {}
        }
    }

    for (id, delta) in hp_changes {
        if let Some(unit) = state.unit_mut(id) {
            if !unit.is_alive() {
                continue;
            }
            let hp = (unit.hp() + delta).clamp(1, unit.max_hp);
            unit.set_hp(hp);
            events.push(OutcomeEvent::HpChanged { unit: id, hp });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::ability::{AbilityDefinition, AbilityKind, CanUse, Catalog, HeroDefinition, Phase, Target};
    use crate::effects::testing::{board, unit};
    use crate::env::Env;
    use crate::state::{AbilityId, Stat};

    const GRAVITY: &str = "GRAVITY";

    fn catalog() -> Catalog {
        let gravity = AbilityDefinition {
            id: AbilityId::from(GRAVITY),
            name: "gravity".into(),
            kind: AbilityKind::Status(Polarity::Negative),
            effects: Vec::new(),
            can_use: CanUse::default(),
            available_as_seal: false,
        };
        Catalog::build(vec![gravity], Vec::<HeroDefinition>::new()).unwrap()
    }

    fn run(state: &mut GameState, owner: UnitId, actions: &[EffectAction]) -> Vec<OutcomeEvent> {
        let catalog = catalog();
        let config = GameConfig::default();
        let env = Env::new(&catalog, &config).into_game_env();
        let triggered: Vec<_> = actions
            .iter()
            .map(|action| Triggered {
                owner,
                phase: Phase::StartOfTurn,
                action,
            })
            .collect();
        let mut events = Vec::new();
        apply_board(&env, state, &triggered, None, None, &mut events).unwrap();
        events
    }

    #[test]
    fn hp_changes_sum_before_clamping() {
        let mut owner = unit(Team::Blue, 0, 2, 2);
        owner.set_hp(20);
        let foe = unit(Team::Red, 0, 2, 0);
        let mut state = board(vec![owner.clone()], vec![foe.clone()]);

        let hit = EffectAction::DealDamage {
            amount: DamageAmount::Value(30),
            target: Target::AllFoes,
        };
        let events = run(
            &mut state,
            owner.id,
            &[
                hit.clone(),
                hit,
                EffectAction::RestoreHp {
                    amount: HealAmount::Value(10),
                    target: Target::Unit,
                },
                EffectAction::DealDamage {
                    amount: DamageAmount::Value(5),
                    target: Target::Unit,
                },
            ],
        );

        assert_eq!(state.unit(foe.id).unwrap().hp(), 1);
        assert_eq!(state.unit(owner.id).unwrap().hp(), 25);
        assert_eq!(
            events,
            vec![
                OutcomeEvent::HpChanged { unit: owner.id, hp: 25 },
                OutcomeEvent::HpChanged { unit: foe.id, hp: 1 },
            ]
        );
    }

    #[test]
    fn buffs_keep_the_highest_grant() {
        let owner = unit(Team::Blue, 0, 2, 2);
        let ally = unit(Team::Blue, 1, 2, 3);
        let mut state = board(vec![owner.clone(), ally.clone()], vec![unit(Team::Red, 0, 0, 0)]);

        let buff = |value| EffectAction::ApplyBuff {
            stat: Stat::Atk,
            value,
            target: Target::AlliesWithin {
                spaces: 2,
                move_type: None,
                weapon_type: None,
            },
        };
        run(&mut state, owner.id, &[buff(4), buff(6), buff(3)]);

        assert_eq!(state.unit(ally.id).unwrap().buffs[Stat::Atk], 6);
        assert_eq!(state.unit(owner.id).unwrap().buffs[Stat::Atk], 0);
    }

    #[test]
    fn statuses_are_applied_once() {
        let owner = unit(Team::Blue, 0, 2, 2);
        let foe = unit(Team::Red, 0, 2, 4);
        let mut state = board(vec![owner.clone()], vec![foe.clone()]);

        let gravity = EffectAction::ApplyStatus {
            status: AbilityId::from(GRAVITY),
            target: Target::FoesWithin { spaces: 2 },
        };
        let events = run(&mut state, owner.id, &[gravity.clone(), gravity]);

        assert_eq!(state.unit(foe.id).unwrap().penalties.len(), 1);
        assert_eq!(events.len(), 1);
    }
}
