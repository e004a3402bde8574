use std::cmp::Reverse;
use std::collections::HashMap;

use crate::action::{Action, UnitAction, UnitActionKind};
use crate::state::GameState;

pub const PV_SCORE: i32 = 2000;
pub const ATTACK_SCORE: i32 = 1000;
pub const KILLER_SCORES: [i32; 2] = [900, 800];
pub const ASSIST_SCORE: i32 = 700;

/// Quiet moves that caused a cutoff, two per ply, newest first.
#[derive(Clone, Debug)]
pub struct Killers {
    slots: Vec<[Option<Action>; 2]>,
}

impl Killers {
    pub fn new(max_ply: usize) -> Self {
        Self {
            slots: vec![[None; 2]; max_ply + 1],
        }
    }

    pub fn at(&self, ply: usize) -> [Option<Action>; 2] {
        self.slots.get(ply).copied().unwrap_or([None; 2])
    }

    pub fn record(&mut self, ply: usize, action: Action) {
        if let Some(slot) = self.slots.get_mut(ply) {
            if slot[0] != Some(action) {
                slot[1] = slot[0];
                slot[0] = Some(action);
            }
        }
    }
}

/// Cutoff credit of quiet unit actions, keyed by tiles.
#[derive(Clone, Debug, Default)]
pub struct History {
    scores: HashMap<UnitAction, i32>,
}

impl History {
    pub fn score(&self, action: &UnitAction) -> i32 {
        self.scores.get(action).copied().unwrap_or(0)
    }

    pub fn reward(&mut self, action: UnitAction, depth: u32) {
        let depth = depth as i32;
        *self.scores.entry(action).or_insert(0) += depth * depth;
    }
}

/// Ordering score of `action`: the table move, then attacks, killers,
/// assists and finally quiet moves by history. Ending the turn comes last.
pub fn score(
    state: &GameState,
    action: &Action,
    pv: Option<Action>,
    killers: [Option<Action>; 2],
    history: &History,
) -> i32 {
    if pv == Some(*action) {
        return PV_SCORE;
    }
    let Action::Unit(unit_action) = action else {
        return 0;
    };
    let kind = unit_action.kind(state).ok();
    if matches!(kind, Some(UnitActionKind::Attack(_))) {
        return ATTACK_SCORE;
    }
    if let Some(slot) = killers.iter().position(|killer| *killer == Some(*action)) {
        return KILLER_SCORES[slot];
    }
    if matches!(kind, Some(UnitActionKind::Assist(_))) {
        return ASSIST_SCORE;
    }
    history.score(unit_action)
}

/// Sorts `actions` best first. Ties keep generation order.
pub fn order(
    state: &GameState,
    actions: &mut [Action],
    pv: Option<Action>,
    killers: [Option<Action>; 2],
    history: &History,
) {
    actions.sort_by_cached_key(|action| Reverse(score(state, action, pv, killers, history)));
}
