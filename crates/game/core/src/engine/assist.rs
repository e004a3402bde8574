//! Assist resolution.

use super::{ActionError, OutcomeEvent};
use crate::ability::{AbilityCategory, AssistKind, HealCalculation, HealSpec, Phase, SpecialKind};
use crate::combat::damage::percent_of;
use crate::effects::{AssistScope, Scope, apply_board, collect};
use crate::env::{GameEnv, OracleError};
use crate::range::displacement;
use crate::state::{GameState, Stat, Unit, UnitId};

/// HP an assist restores.
///
/// # Formula
///
/// ```text
/// amount = Σ calculations, at least `min`
///   PercentOfStat  floor(user.stat × percent / 100)
///   Value          value
///   MissingHp      floor(target.missing_hp × percent / 100)
///   LowHpBoost     max(0, target.max_hp − 2 × target.hp)
/// ```
pub fn heal_amount(user: &Unit, target: &Unit, spec: &HealSpec) -> i32 {
    let total: i32 = spec
        .calculations
        .iter()
        .map(|calculation| match *calculation {
            HealCalculation::PercentOfStat { stat, percent } => percent_of(user.stats[stat], percent),
            HealCalculation::Value(value) => value,
            HealCalculation::MissingHp(percent) => percent_of(target.missing_hp(), percent),
            HealCalculation::LowHpBoost => (target.max_hp - 2 * target.hp()).max(0),
        })
        .sum();
    total.max(spec.min)
}

/// Runs `phase` for `owner` with the assist in scope.
fn run_phase(
    env: &GameEnv<'_>,
    state: &mut GameState,
    phase: Phase,
    owner: UnitId,
    assist: AssistScope,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let mut triggered = Vec::new();
    {
        let scope = Scope::board(state).with_assist(assist);
        if let Some(unit) = state.unit(owner) {
            collect(env, phase, unit, &scope, &mut triggered)?;
        }
    }
    apply_board(env, state, &triggered, None, Some(assist), events)
}

fn hp_changed(state: &GameState, id: UnitId, events: &mut Vec<OutcomeEvent>) {
    if let Some(unit) = state.unit(id) {
        events.push(OutcomeEvent::HpChanged {
            unit: id,
            hp: unit.hp(),
        });
    }
}

/// Performs the equipped assist of `user` on `target`.
pub(crate) fn perform_assist(
    env: &GameEnv<'_>,
    state: &mut GameState,
    user: UnitId,
    target: UnitId,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), ActionError> {
    let user_unit = state.require(user)?.clone();
    let target_unit = state.require(target)?.clone();
    let assist = env
        .equipped(&user_unit, AbilityCategory::Assist)?
        .and_then(|ability| ability.assist())
        .ok_or(ActionError::Illegal { unit: user })?;

    let mut scope = AssistScope {
        user,
        target,
        hp_restored: 0,
    };
    events.push(OutcomeEvent::Assisted { user, target });

    match &assist.kind {
        AssistKind::Movement(kind) => {
            if let Some(destinations) = displacement::resolve(
                state,
                *kind,
                &user_unit,
                target_unit.position,
                Some(&target_unit),
            ) {
                displacement::apply(state, user, Some(target), destinations, events);
            }
            run_phase(env, state, Phase::UsedMovementAssist, user, scope, events)?;
            run_phase(env, state, Phase::TargetedByMovementAssist, target, scope, events)?;
        }
        AssistKind::Refresh => {
            state.require_mut(target)?.has_action = true;
            events.push(OutcomeEvent::Refreshed(target));
            run_phase(env, state, Phase::UsedDance, user, scope, events)?;
        }
        AssistKind::Heal { heal, self_heal } => {
            let amount = heal_amount(&user_unit, &target_unit, heal);
            scope.hp_restored = state.require_mut(target)?.heal(amount);
            hp_changed(state, target, events);

            if let Some(self_heal) = self_heal {
                let amount = heal_amount(&user_unit, &user_unit, self_heal);
                state.require_mut(user)?.heal(amount);
                hp_changed(state, user, events);
            }
            run_phase(env, state, Phase::UsedHeal, user, scope, events)?;
            charge_healing_special(env, state, user, scope, events)?;
        }
        AssistKind::Rally(buffs) => {
            let unit = state.require_mut(target)?;
            for stat in Stat::COMBAT {
                if buffs[stat] > unit.buffs[stat] {
                    unit.buffs[stat] = buffs[stat];
                    events.push(OutcomeEvent::Buffed {
                        unit: target,
                        stat,
                        value: buffs[stat],
                    });
                }
            }
            run_phase(env, state, Phase::UsedRallyAssist, user, scope, events)?;
            run_phase(env, state, Phase::TargetedByRallyAssist, target, scope, events)?;
        }
        AssistKind::Sacrifice { amount } => {
            let amount = amount
                .unwrap_or_else(|| (user_unit.hp() - 1).min(target_unit.missing_hp()));
            state.require_mut(target)?.heal(amount);
            let unit = state.require_mut(user)?;
            let hp = unit.hp() - amount;
            unit.set_hp(hp);
            hp_changed(state, target, events);
            hp_changed(state, user, events);
        }
        AssistKind::ReciprocalAid => {
            state
                .require_mut(user)?
                .set_hp(target_unit.hp().min(user_unit.max_hp));
            state
                .require_mut(target)?
                .set_hp(user_unit.hp().min(target_unit.max_hp));
            hp_changed(state, user, events);
            hp_changed(state, target, events);
        }
        AssistKind::HarshCommand => {
            let unit = state.require_mut(target)?;
            for stat in Stat::COMBAT {
                let penalty = unit.debuffs[stat];
                if penalty > 0 {
                    unit.buffs[stat] = unit.buffs[stat].max(penalty);
                    unit.debuffs[stat] = 0;
                    events.push(OutcomeEvent::Buffed {
                        unit: target,
                        stat,
                        value: unit.buffs[stat],
                    });
                }
            }
        }
    }
    Ok(())
}

/// Healing assists fire a charged healing special, otherwise charge it by one.
fn charge_healing_special(
    env: &GameEnv<'_>,
    state: &mut GameState,
    user: UnitId,
    scope: AssistScope,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), ActionError> {
    let unit = state.require(user)?;
    let Some(counter) = unit.special else {
        return Ok(());
    };
    let healing = env
        .equipped(unit, AbilityCategory::Special)?
        .and_then(|ability| ability.special())
        .is_some_and(|special| special.kind == SpecialKind::Healing);

    if healing && counter.is_ready() {
        run_phase(env, state, Phase::OnHealingSpecialTrigger, user, scope, events)?;
        if let Some(special) = state.require_mut(user)?.special.as_mut() {
            special.reset();
        }
    } else if let Some(special) = state.require_mut(user)?.special.as_mut() {
        special.charge(1);
    }
    Ok(())
}
