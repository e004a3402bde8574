//! Legal action enumeration.
//!
//! For every tile in a unit's movement range, in range order, the
//! generator emits the bare move, then attacks on foes, then assists on
//! allies, then strikes on breakable blocks. A target must sit at exactly
//! the weapon (or assist) range from the tile.

use super::{Action, ActionTransition, SystemAction, UnitAction};
use crate::ability::{AbilityCategory, AssistKind};
use crate::engine::ActionError;
use crate::env::{GameEnv, OracleError};
use crate::range::{displacement, movement_range, weapon_range};
use crate::state::{GameState, Position, Stat, Team, Unit};

/// Every legal action of `unit`. Empty once the unit has acted.
///
/// # Errors
///
/// Returns [`OracleError`] if a unit references an unknown ability.
pub fn generate_actions(
    env: &GameEnv<'_>,
    state: &GameState,
    unit: &Unit,
) -> Result<Vec<UnitAction>, OracleError> {
    if !unit.has_action {
        return Ok(Vec::new());
    }

    let weapon = weapon_range(env, unit)?;
    let assist = env
        .equipped(unit, AbilityCategory::Assist)?
        .and_then(|ability| ability.assist());
    let movement = movement_range(env, state, unit, false)?;

    let mut actions = Vec::new();
    for &tile in &movement.tiles {
        actions.push(UnitAction::moving(unit.position, tile));

        if let Some(range) = weapon {
            for foe in state.foes_of(unit.team) {
                if tile.distance(foe.position) == range {
                    actions.push(UnitAction::targeting(unit.position, tile, foe.position));
                }
            }
        }

        if let Some(assist) = assist {
            for ally in state.allies_of(unit) {
                if tile.distance(ally.position) == assist.range
                    && can_assist(env, state, unit, tile, ally, &assist.kind)?
                {
                    actions.push(UnitAction::targeting(unit.position, tile, ally.position));
                }
            }
        }

        if let Some(range) = weapon {
            for block in &state.map.blocks {
                if block.is_intact() && block.breakable && tile.distance(block.position) == range {
                    actions.push(UnitAction::targeting(unit.position, tile, block.position));
                }
            }
        }
    }
    Ok(actions)
}

/// Legal actions of every unit of `team`, in roster order.
///
/// # Errors
///
/// Returns [`OracleError`] if a unit references an unknown ability.
pub fn generate_team_actions(
    env: &GameEnv<'_>,
    state: &GameState,
    team: Team,
) -> Result<Vec<UnitAction>, OracleError> {
    let mut actions = Vec::new();
    for unit in state.team(team) {
        actions.extend(generate_actions(env, state, unit)?);
    }
    Ok(actions)
}

/// Whether an assist from `tile` would have any effect on `ally`.
fn can_assist(
    env: &GameEnv<'_>,
    state: &GameState,
    unit: &Unit,
    tile: Position,
    ally: &Unit,
    kind: &AssistKind,
) -> Result<bool, OracleError> {
    let able = match kind {
        AssistKind::Movement(movement) => {
            let mut moved = unit.clone();
            moved.position = tile;
            displacement::resolve(state, *movement, &moved, ally.position, Some(ally)).is_some()
        }
        AssistKind::Refresh => {
            let refresher = env
                .equipped(ally, AbilityCategory::Assist)?
                .and_then(|ability| ability.assist())
                .is_some_and(|assist| assist.kind == AssistKind::Refresh);
            !ally.has_action && !refresher
        }
        AssistKind::Heal { .. } => ally.missing_hp() > 0,
        AssistKind::Rally(buffs) => Stat::COMBAT
            .into_iter()
            .any(|stat| buffs[stat] > 0 && buffs[stat] > ally.buffs[stat]),
        AssistKind::Sacrifice { amount } => {
            ally.missing_hp() > 0 && unit.hp() > amount.unwrap_or(1)
        }
        AssistKind::ReciprocalAid => {
            let unit_gain = ally.hp().min(unit.max_hp) - unit.hp();
            let ally_gain = unit.hp().min(ally.max_hp) - ally.hp();
            unit_gain > 0 || ally_gain > 0
        }
        AssistKind::HarshCommand => ally.debuffs.any_positive(),
    };
    Ok(able)
}

/// Checks a unit action against the current state.
///
/// # Errors
///
/// Returns the reason the action is rejected.
pub fn check_unit_action(
    env: &GameEnv<'_>,
    state: &GameState,
    action: &UnitAction,
) -> Result<(), ActionError> {
    if state.game_over {
        return Err(ActionError::GameOver);
    }
    if state.swap_phase {
        return Err(ActionError::SwapPhase);
    }
    let unit = state
        .unit_at(action.from)
        .ok_or(ActionError::NoUnitAt(action.from))?;
    if unit.team != state.current_turn {
        return Err(ActionError::NotCurrentTeam {
            unit: unit.id,
            team: unit.team,
            current: state.current_turn,
        });
    }
    if !unit.has_action {
        return Err(ActionError::AlreadyActed(unit.id));
    }
    if !generate_actions(env, state, unit)?.contains(action) {
        return Err(ActionError::Illegal { unit: unit.id });
    }
    Ok(())
}

/// Whether `action` may be executed now.
///
/// # Errors
///
/// Returns [`OracleError`] if a unit references an unknown ability.
pub fn is_valid_action(
    env: &GameEnv<'_>,
    state: &GameState,
    action: &Action,
) -> Result<bool, OracleError> {
    let checked = match action {
        Action::Unit(action) => check_unit_action(env, state, action),
        Action::System(SystemAction::EndTurn(action)) => action.pre_validate(state, env),
        Action::System(SystemAction::Surrender(action)) => action.pre_validate(state, env),
        Action::System(SystemAction::EndSwapPhase(action)) => action.pre_validate(state, env),
        Action::System(SystemAction::SwapStartingPositions(action)) => {
            action.pre_validate(state, env)
        }
    };
    match checked {
        Ok(()) => Ok(true),
        Err(ActionError::Oracle(err)) => Err(err),
        Err(_) => Ok(false),
    }
}
