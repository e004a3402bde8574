//! Static evaluation.

use crate::state::{GameState, Team};

/// Weight of one duel point.
pub const SCORE_WEIGHT: i32 = 100;
/// Bonus for standing inside the capture area.
pub const CAPTURE_BONUS: i32 = 20;
/// Bonus lost per tile away from the capture area.
pub const DISTANCE_PENALTY: i32 = 5;
/// Weight of one remaining hit point.
pub const HP_WEIGHT: i32 = 1;

/// Scores `state` from the point of view of the team to move.
///
/// ```text
/// blue = 100 × (blue score − red score)
///      + Σ blue units (20 − 5 × distance to capture area)
///      − Σ red units  (20 − 5 × distance to capture area)
///      + Σ blue hp − Σ red hp
/// ```
///
/// The result is negated when red is to move.
pub fn evaluate(state: &GameState) -> i32 {
    let score = |team: Team| state.duel(team).map_or(0, |duel| duel.total_score() as i32);
    let mut blue = SCORE_WEIGHT * (score(Team::Blue) - score(Team::Red));

    for team in Team::ALL {
        let sign = if team == Team::Blue { 1 } else { -1 };
        for unit in state.team(team) {
            let distance = state.capture_area.distance(unit.position);
            blue += sign * (CAPTURE_BONUS - DISTANCE_PENALTY * distance);
            blue += sign * HP_WEIGHT * unit.hp();
        }
    }

    match state.current_turn {
        Team::Blue => blue,
        Team::Red => -blue,
    }
}
