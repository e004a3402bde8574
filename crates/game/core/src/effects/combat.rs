//! In-combat action application.

use super::{Scope, Triggered, target};
use crate::ability::{DamageAmount, EffectAction, HealAmount, StatAmount};
use crate::combat::Combatant;
use crate::state::{GameState, Stat, Unit, UnitId};

/// Per-hit modifiers produced by special triggers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitModifiers {
    /// Percentage applied to base damage (`100` = unchanged).
    pub base_damage_percent: i32,
    /// Added to base damage before the percentage.
    pub damage: i32,
    /// Percentage of the defence stat ignored.
    pub reduce_def_res_percent: i32,
    /// Added after base damage, before staff halving.
    pub fixed_damage: i32,
    pub percent_reductions: Vec<i32>,
    pub flat_reduction: i32,
    /// Percentage of dealt damage healed.
    pub heal_percent: i32,
    pub heal_flat: i32,
}

impl Default for HitModifiers {
    fn default() -> Self {
        Self {
            base_damage_percent: 100,
            damage: 0,
            reduce_def_res_percent: 0,
            fixed_damage: 0,
            percent_reductions: Vec::new(),
            flat_reduction: 0,
            heal_percent: 0,
            heal_flat: 0,
        }
    }
}

fn index_of(combatants: &[Combatant; 2], id: UnitId) -> Option<usize> {
    combatants.iter().position(|c| c.id() == id)
}

fn owner_of(state: &GameState, combatants: &[Combatant; 2], id: UnitId) -> Option<Unit> {
    Scope::combat(state, combatants, true).unit(id).cloned()
}

/// Value of a combat stat modifier for the combatant at `index`.
fn stat_amount(
    amount: StatAmount,
    state: &GameState,
    combatants: &[Combatant; 2],
    index: usize,
    owner: &Unit,
) -> i32 {
    match amount {
        StatAmount::Value(value) => value,
        StatAmount::TotalBonuses => {
            let target = &combatants[index];
            if target.flags.bonuses_neutralized() || target.is_panicked() {
                0
            } else {
                Stat::COMBAT.iter().map(|&stat| target.unit.buffs[stat]).sum()
            }
        }
        StatAmount::AlliesWithin {
            spaces,
            multiplier,
            max,
        } => {
            let allies = state
                .team(owner.team)
                .iter()
                .filter(|ally| {
                    ally.id != owner.id
                        && ally.is_alive()
                        && ally.position.distance(owner.position) <= spaces
                })
                .count() as i32;
            (allies * multiplier).min(max)
        }
    }
}

/// Applies in-combat actions to the combat pair.
///
/// Actions are applied in three stable groups: combat flags, then stat
/// modifiers, then everything else.
pub fn apply_combat(state: &GameState, combatants: &mut [Combatant; 2], triggered: &mut [Triggered<'_>]) {
    triggered.sort_by_key(|t| t.action.combat_priority());

    for t in triggered.iter() {
        let Some(owner) = owner_of(state, combatants, t.owner) else {
            continue;
        };
        let Some(selector) = t.action.target() else {
            continue;
        };
        let targets = {
            let scope = Scope::combat(state, &*combatants, true);
            target::resolve(selector, &owner, &scope)
        };

        match *t.action {
            EffectAction::SetCombatFlag { flag, .. } => {
                for id in &targets {
                    if let Some(index) = index_of(combatants, *id) {
                        combatants[index].flags.set(flag);
                    }
                }
            }
            EffectAction::CombatStatMod { stat, amount, .. } => {
                if let Some(index) = targets.iter().find_map(|id| index_of(combatants, *id)) {
                    let value = stat_amount(amount, state, combatants, index, &owner);
                    combatants[index].temp[stat] += value;
                }
            }
            EffectAction::CurrentSpecialCooldownMod { value, .. } => {
                for id in &targets {
                    if let Some(index) = index_of(combatants, *id) {
                        if let Some(special) = combatants[index].unit.special.as_mut() {
                            if special.current != 0 {
                                special.current = (special.current + value).clamp(0, special.max);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Applies special-trigger actions of the combatant at `owner` to `modifiers`.
///
/// Stat-scaled damage reads the owner's in-combat totals at trigger time.
pub fn apply_trigger(
    state: &GameState,
    combatants: &mut [Combatant; 2],
    owner: usize,
    triggered: &mut [Triggered<'_>],
    modifiers: &mut HitModifiers,
) {
    triggered.sort_by_key(|t| t.action.combat_priority());

    for t in triggered.iter() {
        match *t.action {
            EffectAction::DealDamage { amount, .. } => match amount {
                DamageAmount::Value(value) => modifiers.fixed_damage += value,
                DamageAmount::PercentOfStat { stat, percent } => {
                    let base = combatants[owner].totals()[stat];
                    modifiers.damage += (base * percent).div_euclid(100);
                }
                DamageAmount::PercentOfMissingHp(percent) => {
                    let missing = combatants[owner].unit.missing_hp();
                    modifiers.damage += (missing * percent).div_euclid(100);
                }
            },
            EffectAction::RestoreHp { amount, .. } => match amount {
                HealAmount::Value(value) => modifiers.heal_flat += value,
                HealAmount::PercentOfDamageDealt(percent) => modifiers.heal_percent += percent,
                HealAmount::HpRestoredToTarget => {}
            },
            EffectAction::DamageReduction { percent, flat } => {
                if percent != 0 {
                    modifiers.percent_reductions.push(percent);
                }
                modifiers.flat_reduction += flat;
            }
            EffectAction::ReduceDefResByPercent(percent) => {
                modifiers.reduce_def_res_percent = modifiers.reduce_def_res_percent.max(percent);
            }
            EffectAction::BaseDamageIncrease(percent) => modifiers.base_damage_percent += percent,
            EffectAction::SetCombatFlag { .. }
            | EffectAction::CombatStatMod { .. }
            | EffectAction::CurrentSpecialCooldownMod { .. } => {
                let mut single = *t;
                apply_combat(state, combatants, std::slice::from_mut(&mut single));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::ability::{Catalog, CombatFlag, Phase, Target};
    use crate::effects::testing::{board, unit};
    use crate::env::Env;
    use crate::state::Team;

    fn pair(state: &GameState) -> [Combatant; 2] {
        let catalog = Catalog::default();
        let config = GameConfig::default();
        let env = Env::new(&catalog, &config).into_game_env();
        let blue = state.unit(UnitId::for_slot(Team::Blue, 0)).unwrap();
        let red = state.unit(UnitId::for_slot(Team::Red, 0)).unwrap();
        [
            Combatant::new(&env, state, blue, true).unwrap(),
            Combatant::new(&env, state, red, false).unwrap(),
        ]
    }

    fn batch<'a>(owner: UnitId, actions: &'a [EffectAction]) -> Vec<Triggered<'a>> {
        actions
            .iter()
            .map(|action| Triggered {
                owner,
                phase: Phase::StartOfCombat,
                action,
            })
            .collect()
    }

    fn state() -> GameState {
        let mut owner = unit(Team::Blue, 0, 2, 2);
        owner.buffs.atk = 4;
        owner.buffs.spd = 3;
        board(
            vec![owner, unit(Team::Blue, 1, 2, 3), unit(Team::Blue, 2, 3, 2)],
            vec![unit(Team::Red, 0, 2, 1)],
        )
    }

    #[test]
    fn flags_land_before_stat_modifiers() {
        let state = state();
        let blue = UnitId::for_slot(Team::Blue, 0);
        let red = UnitId::for_slot(Team::Red, 0);
        let own = [
            EffectAction::CombatStatMod {
                stat: Stat::Atk,
                amount: StatAmount::AlliesWithin {
                    spaces: 2,
                    multiplier: 2,
                    max: 3,
                },
                target: Target::Unit,
            },
            EffectAction::CombatStatMod {
                stat: Stat::Spd,
                amount: StatAmount::TotalBonuses,
                target: Target::Unit,
            },
        ];
        let lull = [EffectAction::SetCombatFlag {
            flag: CombatFlag::NeutralizeBonuses,
            target: Target::Foe,
        }];

        let mut combatants = pair(&state);
        apply_combat(&state, &mut combatants, &mut batch(blue, &own));
        assert_eq!(combatants[0].temp.atk, 3);
        assert_eq!(combatants[0].temp.spd, 7);

        let mut combatants = pair(&state);
        let mut triggered = batch(blue, &own);
        triggered.extend(batch(red, &lull));
        apply_combat(&state, &mut combatants, &mut triggered);
        assert_eq!(combatants[0].temp.atk, 3);
        assert_eq!(combatants[0].temp.spd, 0);
        assert!(combatants[0].flags.bonuses_neutralized());
    }

    #[test]
    fn trigger_modifiers_accumulate_per_kind() {
        let state = state();
        let blue = UnitId::for_slot(Team::Blue, 0);
        let actions = [
            EffectAction::DamageReduction { percent: 30, flat: 0 },
            EffectAction::DamageReduction { percent: 50, flat: 5 },
            EffectAction::ReduceDefResByPercent(30),
            EffectAction::ReduceDefResByPercent(50),
            EffectAction::BaseDamageIncrease(50),
            EffectAction::DealDamage {
                amount: DamageAmount::PercentOfStat {
                    stat: Stat::Atk,
                    percent: 50,
                },
                target: Target::Foe,
            },
            EffectAction::DealDamage {
                amount: DamageAmount::Value(7),
                target: Target::Foe,
            },
            EffectAction::RestoreHp {
                amount: HealAmount::PercentOfDamageDealt(30),
                target: Target::Unit,
            },
        ];

        let mut combatants = pair(&state);
        let mut modifiers = HitModifiers::default();
        apply_trigger(&state, &mut combatants, 0, &mut batch(blue, &actions), &mut modifiers);

        // visible atk 40 plus the 4 atk buff
        assert_eq!(
            modifiers,
            HitModifiers {
                base_damage_percent: 150,
                damage: 22,
                reduce_def_res_percent: 50,
                fixed_damage: 7,
                percent_reductions: vec![30, 50],
                flat_reduction: 5,
                heal_percent: 30,
                heal_flat: 0,
            }
        );
    }
}
