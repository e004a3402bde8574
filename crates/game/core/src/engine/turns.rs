//! Turn ownership, duel action budgets, scoring and win conditions.
//!
//! Standard matches alternate whole turns between the teams. Duel turns are
//! shared: both teams act within the same turn, handing the move back and
//! forth after every action until each has ended its part of the turn.

use super::{OutcomeEvent, ScoreKind};
use crate::ability::{AbilityCategory, Phase};
use crate::effects::{Scope, apply_board, collect, collect_team};
use crate::env::{GameEnv, OracleError};
use crate::state::{GameState, MatchResult, Position, Team};

// ============================================================================
// Turn boundaries
// ============================================================================

/// Spends one duel action and passes the turn when nothing is left to do.
///
/// In duel mode the move alternates between the teams after every action
/// while the opponent has not ended its part of the turn. A team whose
/// budget runs out, or whose units have all acted, ends its part.
pub(crate) fn check_auto_end_turn(
    env: &GameEnv<'_>,
    state: &mut GameState,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let team = state.current_turn;
    let idle = state.team(team).iter().all(|unit| !unit.has_action);

    let Some(duel) = state.duel_mut(team) else {
        if idle {
            end_turn(env, state, events)?;
        }
        return Ok(());
    };
    duel.actions_remaining = duel.actions_remaining.saturating_sub(1);
    let exhausted = duel.actions_remaining == 0;

    if idle || exhausted {
        end_turn(env, state, events)?;
    } else if state
        .duel(team.opponent())
        .is_some_and(|foe| !foe.ended_turn)
    {
        state.current_turn = team.opponent();
    }
    Ok(())
}

/// Ends the current team's turn.
pub(crate) fn end_turn(
    env: &GameEnv<'_>,
    state: &mut GameState,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let team = state.current_turn;
    events.push(OutcomeEvent::TurnEnded(team));

    if !state.is_duel() {
        for unit in state.team_mut(team) {
            unit.has_action = true;
        }
        state.current_turn = team.opponent();
        if state.current_turn == Team::Blue {
            state.turn_count += 1;
        }
        return start_regular_turn(env, state, events);
    }

    if let Some(duel) = state.duel_mut(team) {
        duel.ended_turn = true;
    }
    for unit in state.team_mut(team) {
        unit.has_action = false;
    }

    let both_ended = Team::ALL
        .into_iter()
        .all(|team| state.duel(team).is_some_and(|duel| duel.ended_turn));
    if !both_ended {
        state.current_turn = team.opponent();
        return Ok(());
    }

    score_capture_area(env, state, events)?;
    if state.turn_count >= env.config().final_turn {
        finish_by_score(state, events);
        return Ok(());
    }
    state.turn_count += 1;
    start_duel_turn(env, state, false, events)
}

/// Starts a duel turn.
///
/// The team with strictly more actions left over starts; on a tie the team
/// that did not start the previous turn does. Blue opens the match.
pub(crate) fn start_duel_turn(
    env: &GameEnv<'_>,
    state: &mut GameState,
    first: bool,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let remaining = Team::ALL.map(|team| state.duel(team).map_or(0, |duel| duel.actions_remaining));
    let starter = if first {
        Team::Blue
    } else if remaining[0] > remaining[1] {
        Team::Blue
    } else if remaining[1] > remaining[0] {
        Team::Red
    } else {
        state.last_starting_team.opponent()
    };
    state.current_turn = starter;
    state.last_starting_team = starter;

    let actions = env.config().actions_per_turn;
    for team in Team::ALL {
        if let Some(duel) = state.duel_mut(team) {
            duel.ended_turn = false;
            duel.actions_remaining = actions;
        }
    }
    for unit in state.units_mut() {
        unit.start_turn();
        unit.has_action = true;
    }

    events.push(OutcomeEvent::TurnStarted {
        team: starter,
        turn: state.turn_count,
    });
    run_start_of_turn(env, state, [starter, starter.opponent()].as_slice(), events)
}

/// Starts the current team's turn in a standard match.
pub(crate) fn start_regular_turn(
    env: &GameEnv<'_>,
    state: &mut GameState,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    for unit in state.units_mut() {
        unit.start_turn();
    }
    let team = state.current_turn;
    events.push(OutcomeEvent::TurnStarted {
        team,
        turn: state.turn_count,
    });
    run_start_of_turn(env, state, [team].as_slice(), events)
}

/// Runs the start-of-turn phases as one batch.
///
/// `acting` lists the teams whose turn begins, in order. Start-of-turn
/// effects fire for those teams, enemy-phase effects for the rest (and for
/// every acting team in duels, where each side is also the other's enemy),
/// then player-or-enemy-phase effects for everyone.
fn run_start_of_turn(
    env: &GameEnv<'_>,
    state: &mut GameState,
    acting: &[Team],
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let enemy_phase: Vec<Team> = if acting.len() == Team::ALL.len() {
        acting.to_vec()
    } else {
        Team::ALL
            .into_iter()
            .filter(|team| !acting.contains(team))
            .collect()
    };

    let mut triggered = Vec::new();
    {
        let scope = Scope::board(state);
        for &team in acting {
            collect_team(env, Phase::StartOfTurn, team, None, &scope, &mut triggered)?;
        }
        for &team in &enemy_phase {
            collect_team(env, Phase::StartOfEnemyPhase, team, None, &scope, &mut triggered)?;
        }
        for unit in state.units() {
            collect(env, Phase::StartOfPlayerPhaseOrEnemyPhase, unit, &scope, &mut triggered)?;
        }
    }
    apply_board(env, state, &triggered, None, None, events)
}

// ============================================================================
// Scoring
// ============================================================================

/// Units of `team` standing in the capture area, weighted by captain skills.
pub fn capture_presence(
    env: &GameEnv<'_>,
    state: &GameState,
    team: Team,
) -> Result<u32, OracleError> {
    let mut presence = 0;
    for unit in state.team(team) {
        if !state.capture_area.contains(unit.position) {
            continue;
        }
        presence += env
            .equipped(unit, AbilityCategory::Captain)?
            .map_or(1, |captain| captain.capture_weight());
    }
    Ok(presence)
}

/// Awards capture points to a team that outnumbers the other in the area by
/// at least the configured margin.
fn score_capture_area(
    env: &GameEnv<'_>,
    state: &mut GameState,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    let config = env.config();
    let presence = [
        capture_presence(env, state, Team::Blue)?,
        capture_presence(env, state, Team::Red)?,
    ];
    for team in Team::ALL {
        let ours = presence[team.index()];
        let theirs = presence[team.opponent().index()];
        if ours >= theirs + config.capture_margin {
            if let Some(duel) = state.duel_mut(team) {
                duel.capture_score += config.capture_points;
                events.push(OutcomeEvent::Scored {
                    team,
                    kind: ScoreKind::Capture,
                    points: config.capture_points,
                });
            }
        }
    }
    Ok(())
}

fn declare(state: &mut GameState, winner: Option<Team>, events: &mut Vec<OutcomeEvent>) {
    state.game_over = true;
    for team in Team::ALL {
        let result = match winner {
            Some(winner) if winner == team => MatchResult::Win,
            Some(_) => MatchResult::Lose,
            None => MatchResult::Draw,
        };
        if let Some(duel) = state.duel_mut(team) {
            duel.result = Some(result);
        }
    }
    events.push(OutcomeEvent::GameOver { winner });
}

/// Ends a duel after its final turn: the higher total score wins.
fn finish_by_score(state: &mut GameState, events: &mut Vec<OutcomeEvent>) {
    let totals = Team::ALL.map(|team| state.duel(team).map_or(0, |duel| duel.total_score()));
    let winner = match totals[0].cmp(&totals[1]) {
        std::cmp::Ordering::Greater => Some(Team::Blue),
        std::cmp::Ordering::Less => Some(Team::Red),
        std::cmp::Ordering::Equal => None,
    };
    declare(state, winner, events);
}

// ============================================================================
// Win conditions
// ============================================================================

/// Ends the match once a team has no units left.
pub(crate) fn check_game_over(state: &mut GameState, events: &mut Vec<OutcomeEvent>) {
    if state.game_over {
        return;
    }
    let wiped = Team::ALL.map(|team| state.team(team).is_empty());
    match wiped {
        [true, true] => declare(state, None, events),
        [true, false] => declare(state, Some(Team::Red), events),
        [false, true] => declare(state, Some(Team::Blue), events),
        [false, false] => {}
    }
}

/// Concedes the match for `team`.
pub(crate) fn surrender(state: &mut GameState, team: Team, events: &mut Vec<OutcomeEvent>) {
    if let Some(duel) = state.duel_mut(team) {
        duel.surrendered = true;
    }
    declare(state, Some(team.opponent()), events);
}

// ============================================================================
// Swap phase
// ============================================================================

/// Leaves the swap phase and starts turn one.
pub(crate) fn end_swap_phase(
    env: &GameEnv<'_>,
    state: &mut GameState,
    events: &mut Vec<OutcomeEvent>,
) -> Result<(), OracleError> {
    state.swap_phase = false;
    if state.is_duel() {
        start_duel_turn(env, state, true, events)
    } else {
        start_regular_turn(env, state, events)
    }
}

/// Exchanges the units on two starting positions of `team`, or moves a
/// lone unit onto the empty one.
pub(crate) fn swap_starting_positions(
    state: &mut GameState,
    team: Team,
    a: Position,
    b: Position,
    events: &mut Vec<OutcomeEvent>,
) {
    let at = |state: &GameState, position: Position| {
        state
            .team(team)
            .iter()
            .find(|unit| unit.position == position)
            .map(|unit| unit.id)
    };
    let moves = [(at(state, a), a, b), (at(state, b), b, a)];
    for (id, from, to) in moves {
        let Some(id) = id else {
            continue;
        };
        if let Some(unit) = state.unit_mut(id) {
            unit.position = to;
            events.push(OutcomeEvent::Displaced { unit: id, from, to });
        }
    }
}
