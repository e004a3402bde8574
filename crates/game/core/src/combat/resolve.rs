//! Engagement resolution.

use super::combatant::Combatant;
use super::damage::{aoe_damage, calculate_damage};
use super::flags::{CombatFlags, CombatSwitches};
use super::result::{CombatResult, Hit};
use super::CombatError;
use crate::ability::{Colour, Phase, SpecialKind};
use crate::effects::{HitModifiers, Scope, apply_combat, apply_trigger, collect, collect_team};
use crate::env::{GameEnv, OracleError};
use crate::state::{GameState, Unit, UnitId};

const ATTACKER: usize = 0;
const DEFENDER: usize = 1;

/// Resolves the engagement of `attacker` against `defender` without touching
/// the board.
///
/// Phases run strictly in order: before-combat flags, area special,
/// start-of-combat (with ally auras) and neutralisation, during-combat
/// (counter eligibility, triangle, effectiveness), the second during-combat
/// pass and follow-up resolution, then the blow sequence.
///
/// # Errors
///
/// Returns [`CombatError`] if either unit is missing, both are on the same
/// team, or an ability lookup fails.
pub fn resolve(
    env: &GameEnv<'_>,
    state: &GameState,
    attacker: UnitId,
    defender: UnitId,
) -> Result<CombatResult, CombatError> {
    let attacking = state.require(attacker)?;
    let defending = state.require(defender)?;
    if attacking.team == defending.team {
        return Err(CombatError::SameTeam(attacker, defender));
    }

    let mut units = [
        Combatant::new(env, state, attacking, true)?,
        Combatant::new(env, state, defending, false)?,
    ];
    // Provisional so foe-can-counter conditions read sensibly before the
    // during-combat phase settles it.
    units[DEFENDER].can_attack =
        units[DEFENDER].range > 0 && units[DEFENDER].range == units[ATTACKER].range;

    let mut sequence = Vec::new();

    run_phase(env, state, &mut units, Phase::BeforeCombat, None)?;
    resolve_aoe(env, state, &mut units, &mut sequence)?;

    run_phase(env, state, &mut units, Phase::StartOfCombat, Some(Phase::StartOfAllyCombat))?;
    units.iter_mut().for_each(Combatant::neutralize);

    run_phase(env, state, &mut units, Phase::DuringCombat, Some(Phase::DuringAllyCombat))?;
    let (mut next, speed) = settle_engagement(&mut units);

    run_phase(env, state, &mut units, Phase::DuringCombat2, None)?;
    settle_follow_ups(&mut units, speed, env.config().follow_up_threshold);

    let mut last = None;
    while units.iter().all(Combatant::is_alive) && !units.iter().all(Combatant::done_attacking) {
        let attacker = next;
        let defender = next ^ 1;
        if !units[attacker].done_attacking() {
            perform_hit(env, state, &mut units, attacker, last == Some(attacker), &mut sequence)?;
            last = Some(attacker);
            if units[attacker].flags.has(CombatSwitches::ATTACKS_TWICE) && units[defender].is_alive() {
                perform_hit(env, state, &mut units, attacker, true, &mut sequence)?;
            }
        }

        let current = &units[attacker];
        if current.can_attack
            && current.can_double
            && !current.follow_up_done
            && current.flags.has(CombatSwitches::DESPERATION)
            && !hardy_bearing(&units)
        {
            next ^= 1;
        }
        next ^= 1;
    }

    Ok(CombatResult {
        units,
        sequence,
        complete: true,
    })
}

fn hardy_bearing(units: &[Combatant; 2]) -> bool {
    units
        .iter()
        .any(|c| c.flags.has(CombatSwitches::HARDY_BEARING))
}

// ============================================================================
// Effect phases
// ============================================================================

/// Collects `phase` for both combatants (and `ally_phase` for their
/// teammates), then applies the batch.
fn run_phase(
    env: &GameEnv<'_>,
    state: &GameState,
    units: &mut [Combatant; 2],
    phase: Phase,
    ally_phase: Option<Phase>,
) -> Result<(), OracleError> {
    let mut triggered = Vec::new();
    {
        let scope = Scope::combat(state, units, true);
        for combatant in units.iter() {
            collect(env, phase, &combatant.unit, &scope, &mut triggered)?;
        }
        if let Some(ally_phase) = ally_phase {
            for combatant in units.iter() {
                collect_team(
                    env,
                    ally_phase,
                    combatant.unit.team,
                    Some(combatant.id()),
                    &scope,
                    &mut triggered,
                )?;
            }
        }
    }
    apply_combat(state, units, &mut triggered);
    Ok(())
}

/// Runs a special-trigger phase for the combatant at `owner`.
fn trigger(
    env: &GameEnv<'_>,
    state: &GameState,
    units: &mut [Combatant; 2],
    owner: usize,
    phase: Phase,
    modifiers: &mut HitModifiers,
) -> Result<(), OracleError> {
    let mut triggered = Vec::new();
    {
        let scope = Scope::combat(state, units, true);
        collect(env, phase, &units[owner].unit, &scope, &mut triggered)?;
    }
    apply_trigger(state, units, owner, &mut triggered, modifiers);
    Ok(())
}

// ============================================================================
// Area special
// ============================================================================

/// Fires the attacker's charged area special before the first blow.
///
/// Every foe in the shape around the defender takes damage computed from
/// visible stats, with its own triangle and effectiveness modifiers; nobody
/// drops below 1 HP. The defender's loss lands on its
/// combat copy and becomes its start-of-combat HP.
fn resolve_aoe(
    env: &GameEnv<'_>,
    state: &GameState,
    units: &mut [Combatant; 2],
    sequence: &mut Vec<Hit>,
) -> Result<(), OracleError> {
    if !units[ATTACKER].special_ready(|kind| matches!(kind, SpecialKind::Aoe(_))) {
        return Ok(());
    }
    let Some(SpecialKind::Aoe(shape)) = units[ATTACKER].special_kind.clone() else {
        return Ok(());
    };

    let mut modifiers = HitModifiers::default();
    trigger(env, state, units, ATTACKER, Phase::OnOffensiveSpecialTrigger, &mut modifiers)?;

    let atk = units[ATTACKER].visible().atk;
    let stat = units[ATTACKER].unit.weapon_type.targets();
    let target = units[DEFENDER].id();
    let bystander = CombatFlags::default();
    for position in shape.positions(units[DEFENDER].unit.position) {
        let Some(victim) = state
            .team(units[DEFENDER].unit.team)
            .iter()
            .find(|unit| unit.position == position)
        else {
            continue;
        };
        // Only the declared target has before-combat flags of its own.
        let victim_flags = if victim.id == target {
            &units[DEFENDER].flags
        } else {
            &bystander
        };
        let attacker = &units[ATTACKER];
        let damage = aoe_damage(
            atk,
            victim.visible_stats()[stat],
            triangle(&attacker.flags, &attacker.unit, victim_flags, victim),
            effectiveness(&attacker.flags, victim_flags, victim),
            shape.multiplier,
            modifiers.fixed_damage,
        );
        let mut defender_hp = (victim.hp() - damage).max(1);
        if victim.id == target {
            let copy = &mut units[DEFENDER];
            defender_hp = (copy.unit.hp() - damage).max(1);
            copy.unit.set_hp(defender_hp);
            copy.start_hp = defender_hp;
        }
        sequence.push(Hit {
            attacker: units[ATTACKER].id(),
            defender: victim.id,
            damage,
            healing: 0,
            attacker_special: true,
            defender_special: false,
            attacker_charge: None,
            defender_charge: None,
            attacker_hp: units[ATTACKER].unit.hp(),
            defender_hp,
            aoe: true,
        });
    }

    if let Some(special) = units[ATTACKER].unit.special.as_mut() {
        special.reset();
    }
    Ok(())
}

// ============================================================================
// Engagement settlement
// ============================================================================

struct Engagement {
    can_attack: bool,
    vantage: bool,
    advantage: i32,
    effective: i32,
}

fn advantage(unit: &Combatant, foe: &Combatant) -> i32 {
    triangle(&unit.flags, &unit.unit, &foe.flags, &foe.unit)
}

/// Weapon-triangle modifier of `unit` against `foe`, in percent.
fn triangle(flags: &CombatFlags, unit: &Unit, foe_flags: &CombatFlags, foe: &Unit) -> i32 {
    let ours = unit.weapon_type.colour();
    let theirs = foe.weapon_type.colour();
    let mut advantage = if flags.has(CombatSwitches::WTA_VS_COLOURLESS)
        && theirs == Colour::Colourless
    {
        20
    } else if foe_flags.has(CombatSwitches::WTA_VS_COLOURLESS) && ours == Colour::Colourless {
        -20
    } else {
        ours.triangle(theirs) * 20
    };

    let adept = flags.has(CombatSwitches::TRIANGLE_ADEPT);
    let foe_adept = foe_flags.has(CombatSwitches::TRIANGLE_ADEPT);
    if adept || foe_adept {
        let cancel = flags.has(CombatSwitches::CANCEL_AFFINITY);
        let foe_cancel = foe_flags.has(CombatSwitches::CANCEL_AFFINITY);
        if (adept && cancel) || (foe_adept && foe_cancel) {
            // Adept cancelled by its own bearer's affinity.
        } else if (adept && foe_cancel) || (foe_adept && cancel) {
            advantage -= 20 * advantage.signum();
        } else {
            advantage += 20 * advantage.signum();
        }
    }
    advantage
}

/// Effectiveness modifier of `flags` against `foe`, in percent.
fn effectiveness(flags: &CombatFlags, foe_flags: &CombatFlags, foe: &Unit) -> i32 {
    let by_move = flags.effective_move.contains(&foe.move_type)
        && !foe_flags.immune_move.contains(&foe.move_type);
    let by_weapon = flags.effective_weapon.contains(&foe.weapon_type)
        && !foe_flags.immune_weapon.contains(&foe.weapon_type);
    if by_move || by_weapon { 50 } else { 0 }
}

fn engagement(unit: &Combatant, foe: &Combatant) -> Engagement {
    let (can_attack, vantage) = if unit.initiator {
        (unit.can_attack, false)
    } else {
        let can_attack = unit.range > 0
            && if unit.flags.has(CombatSwitches::CANT_COUNTERATTACK) {
                false
            } else if unit.flags.has(CombatSwitches::COUNTER_REGARDLESS_OF_RANGE) {
                true
            } else {
                unit.range == foe.range
            };
        let vantage = unit.flags.has(CombatSwitches::VANTAGE)
            && !unit.flags.has(CombatSwitches::HARDY_BEARING)
            && !foe.flags.has(CombatSwitches::HARDY_BEARING);
        (can_attack, vantage)
    };

    Engagement {
        can_attack,
        vantage,
        advantage: advantage(unit, foe),
        effective: effectiveness(&unit.flags, &foe.flags, &foe.unit),
    }
}

/// Settles counter eligibility, triangle and effectiveness for both sides.
///
/// Returns the index of the first attacker and both in-combat speeds, which
/// are fixed here for the follow-up check.
fn settle_engagement(units: &mut [Combatant; 2]) -> (usize, [i32; 2]) {
    let settled = [
        engagement(&units[ATTACKER], &units[DEFENDER]),
        engagement(&units[DEFENDER], &units[ATTACKER]),
    ];
    let mut first = ATTACKER;
    for (unit, engagement) in units.iter_mut().zip(settled) {
        unit.can_attack = engagement.can_attack;
        unit.advantage = engagement.advantage;
        unit.effective = engagement.effective;
        if unit.flags.has(CombatSwitches::WRATHFUL) {
            unit.staff_halved = false;
        }
        if engagement.vantage {
            first = DEFENDER;
        }
    }
    (first, [units[ATTACKER].totals().spd, units[DEFENDER].totals().spd])
}

/// Resolves follow-ups: an unopposed guarantee or prevention decides,
/// otherwise the speed gap does.
fn settle_follow_ups(units: &mut [Combatant; 2], speed: [i32; 2], threshold: i32) {
    for (index, unit) in units.iter_mut().enumerate() {
        let guaranteed = unit.flags.guaranteed_follow_up();
        let prevented = unit.flags.cant_follow_up();
        unit.can_double = match (guaranteed, prevented) {
            (true, false) => true,
            (false, true) => false,
            _ => speed[index] - speed[index ^ 1] >= threshold,
        };
    }
}

// ============================================================================
// Blows
// ============================================================================

fn perform_hit(
    env: &GameEnv<'_>,
    state: &GameState,
    units: &mut [Combatant; 2],
    attacker: usize,
    consecutive: bool,
    sequence: &mut Vec<Hit>,
) -> Result<(), OracleError> {
    let defender = attacker ^ 1;
    let attacker_range = units[attacker].range;

    let attacker_special = units[attacker].special_ready(|kind| matches!(kind, SpecialKind::Offensive));
    let defender_special = units[defender].special_ready(|kind| match kind {
        SpecialKind::Defensive { trigger_range } => {
            trigger_range.is_none_or(|range| range == attacker_range)
        }
        _ => false,
    });

    let mut modifiers = HitModifiers::default();
    if attacker_special {
        trigger(env, state, units, attacker, Phase::OnOffensiveSpecialTrigger, &mut modifiers)?;
    }
    if defender_special {
        trigger(env, state, units, defender, Phase::OnDefensiveSpecialTrigger, &mut modifiers)?;
    }

    let mut reductions = modifiers.percent_reductions.clone();
    if consecutive {
        reductions.extend_from_slice(&units[defender].flags.consecutive_reductions);
    }
    if units[attacker].times_attacked == 0 {
        reductions.extend_from_slice(&units[defender].flags.first_attack_reductions);
    }
    let terrain = if units[defender].defensive_terrain {
        env.config().defensive_terrain_percent
    } else {
        0
    };

    let mut damage = calculate_damage(
        &units[attacker],
        &units[defender],
        &modifiers,
        &reductions,
        terrain,
    );

    let defender_hp = units[defender].unit.hp();
    let miracle = defender_hp > 1
        && damage >= defender_hp
        && units[defender].special_ready(|kind| matches!(kind, SpecialKind::Miracle));
    if miracle {
        damage = defender_hp - 1;
    }
    units[defender].unit.set_hp(defender_hp - damage);

    let heal = (damage * modifiers.heal_percent).div_euclid(100)
        + modifiers.heal_flat
        + (damage * units[attacker].flags.healing_on_hit).div_euclid(100);
    let healing = if heal > 0 {
        units[attacker].unit.heal(heal)
    } else {
        0
    };

    let striker = &mut units[attacker];
    let extra = i32::from(striker.flags.charges_on_attack());
    let guarded = i32::from(striker.flags.guarded());
    if let Some(special) = striker.unit.special.as_mut() {
        if attacker_special {
            special.reset();
        } else {
            special.charge((1 + extra - guarded).max(0));
        }
    }

    let target = &mut units[defender];
    let extra = i32::from(target.flags.charges_on_defence());
    let guarded = i32::from(target.flags.guarded());
    if let Some(special) = target.unit.special.as_mut() {
        if defender_special || miracle {
            special.reset();
        } else {
            special.charge((1 + extra - guarded).max(0));
        }
    }

    sequence.push(Hit {
        attacker: units[attacker].id(),
        defender: units[defender].id(),
        damage,
        healing,
        attacker_special,
        defender_special: defender_special || miracle,
        attacker_charge: units[attacker].unit.special.map(|special| special.current),
        defender_charge: units[defender].unit.special.map(|special| special.current),
        attacker_hp: units[attacker].unit.hp(),
        defender_hp: units[defender].unit.hp(),
        aoe: false,
    });
    units[attacker].record_attack();
    Ok(())
}
