//! Applying a resolved engagement to the board.

use super::{ActionError, OutcomeEvent, ScoreKind};
use crate::ability::{AbilityCategory, Phase, SpecialKind};
use crate::combat::{self, CombatResult};
use crate::config::GameConfig;
use crate::effects::{Scope, Triggered, apply_board, collect, collect_team};
use crate::env::{GameEnv, OracleError};
use crate::state::{GameState, UnitId};

/// Resolves `attacker` against `defender` and applies the outcome.
///
/// Order after the blows: area damage on bystanders, after-combat-before-death
/// effects, deaths and KO scoring, after-combat and ally after-combat
/// effects, post-combat displacement, then Galeforce.
pub(crate) fn perform_combat(
    env: &GameEnv<'_>,
    state: &mut GameState,
    attacker: UnitId,
    defender: UnitId,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), ActionError> {
    let result = Box::new(combat::resolve(env, state, attacker, defender)?);
    let at = events.len();

    for combatant in &result.units {
        let unit = state.require_mut(combatant.id())?;
        unit.combats_in_phase += 1;
        unit.set_hp(combatant.unit.hp());
        unit.special = combatant.unit.special;
    }
    for hit in result.aoe_hits().filter(|hit| hit.defender != defender) {
        if let Some(victim) = state.unit_mut(hit.defender) {
            victim.set_hp((victim.hp() - hit.damage).max(1));
        }
    }

    run_after_combat(env, state, &result, Phase::AfterCombatBeforeDeath, events)?;
    handle_deaths(state, &result, env.config(), events);
    run_after_combat_allies(env, state, &result, events)?;
    run_after_combat(env, state, &result, Phase::AfterCombatDisplacement, events)?;
    galeforce(env, state, attacker, events)?;

    events.insert(at, OutcomeEvent::Attacked(result));
    Ok(())
}

/// Runs `phase` for both combatants, attacker first. Units already removed
/// from the board contribute through their combat copy.
fn run_after_combat(
    env: &GameEnv<'_>,
    state: &mut GameState,
    result: &CombatResult,
    phase: Phase,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let mut triggered: Vec<Triggered<'_>> = Vec::new();
    {
        let scope = Scope::combat(state, &result.units, false);
        for combatant in &result.units {
            let owner = state.unit(combatant.id()).unwrap_or(&combatant.unit);
            collect(env, phase, owner, &scope, &mut triggered)?;
        }
    }
    apply_board(env, state, &triggered, Some(&result.units), None, events)
}

/// After-combat effects of surviving combatants, then after-ally-combat
/// effects of their teammates, applied as one batch.
fn run_after_combat_allies(
    env: &GameEnv<'_>,
    state: &mut GameState,
    result: &CombatResult,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let mut triggered: Vec<Triggered<'_>> = Vec::new();
    {
        let scope = Scope::combat(state, &result.units, false);
        for combatant in &result.units {
            if let Some(unit) = state.unit(combatant.id()) {
                collect(env, Phase::AfterCombat, unit, &scope, &mut triggered)?;
            }
        }
        for combatant in &result.units {
            collect_team(
                env,
                Phase::AfterAllyCombat,
                combatant.unit.team,
                Some(combatant.id()),
                &scope,
                &mut triggered,
            )?;
        }
    }
    apply_board(env, state, &triggered, Some(&result.units), None, events)
}

/// Awards duel KO points and moves defeated combatants off the board.
///
/// A KO is worth `ko_points`, plus `captain_ko_bonus` for every captain
/// among the two combatants.
fn handle_deaths(
    state: &mut GameState,
    result: &CombatResult,
    config: &GameConfig,
    events: &mut Vec<OutcomeEvent>,
) {
    if state.is_duel() {
        let captains = result
            .units
            .iter()
            .filter(|combatant| {
                state
                    .duel(combatant.unit.team)
                    .is_some_and(|duel| duel.captain == combatant.id())
            })
            .count() as u32;
        let points = config.ko_points + config.captain_ko_bonus * captains;

        for victim in &result.units {
            let defeated = state
                .unit(victim.id())
                .is_some_and(|unit| !unit.is_alive());
            if !defeated {
                continue;
            }
            let scorer = victim.unit.team.opponent();
            if let Some(duel) = state.duel_mut(scorer) {
                duel.ko_score += points;
                events.push(OutcomeEvent::Scored {
                    team: scorer,
                    kind: ScoreKind::Ko,
                    points,
                });
            }
        }
    }

    for id in state.remove_defeated() {
        let team = result
            .combatant(id)
            .map(|combatant| combatant.unit.team)
            .or_else(|| state.fallen.iter().find(|unit| unit.id == id).map(|unit| unit.team));
        if let Some(team) = team {
            events.push(OutcomeEvent::Defeated { unit: id, team });
        }
    }
}

/// A charged Galeforce grants the attacker another action once per charge.
fn galeforce(
    env: &GameEnv<'_>,
    state: &mut GameState,
    attacker: UnitId,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let Some(unit) = state.unit(attacker) else {
        return Ok(());
    };
    let is_galeforce = env
        .equipped(unit, AbilityCategory::Special)?
        .and_then(|ability| ability.special())
        .is_some_and(|special| special.kind == SpecialKind::Galeforce);
    let ready = unit.special.is_some_and(|counter| counter.is_ready());
    if !is_galeforce || !ready || unit.has_action {
        return Ok(());
    }

    if let Some(unit) = state.unit_mut(attacker) {
        unit.has_action = true;
        if let Some(special) = unit.special.as_mut() {
            special.reset();
        }
        events.push(OutcomeEvent::Refreshed(attacker));
    }
    Ok(())
}

