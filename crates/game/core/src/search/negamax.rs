//! Alpha-beta negamax over cloned states.
//!
//! The score of a node is always from the point of view of the team to
//! move. In duels a team may keep the move after acting, in which case the
//! child is searched with the same window and its score is not negated.

use super::ordering::{self, History, Killers};
use super::table::{Bound, TableEntry, TranspositionTable};
use super::{DRAW, SearchError, WIN, evaluate};
use crate::action::{Action, UnitActionKind, generate_team_actions};
use crate::config::SearchConfig;
use crate::engine::{GameEngine, TransitionPhase};
use crate::env::GameEnv;
use crate::state::{GameState, MatchResult, Team};

pub(super) struct Searcher<'e, 'c> {
    env: &'e GameEnv<'c>,
    config: &'e SearchConfig,
    table: TranspositionTable,
    killers: Killers,
    history: History,
    ply: usize,
    pub(super) nodes: u64,
    pub(super) root_best: Option<Action>,
}

impl<'e, 'c> Searcher<'e, 'c> {
    pub(super) fn new(env: &'e GameEnv<'c>, config: &'e SearchConfig) -> Self {
        Self {
            env,
            config,
            table: TranspositionTable::new(config.tt_size),
            killers: Killers::new(config.max_ply),
            history: History::default(),
            ply: 0,
            nodes: 0,
            root_best: None,
        }
    }

    /// Score of a finished match for the team to move. Nearer wins score higher.
    fn terminal(&self, state: &GameState) -> i32 {
        let team = state.current_turn;
        let result = state.result(team).unwrap_or_else(|| {
            match (state.team(team).is_empty(), state.team(team.opponent()).is_empty()) {
                (false, true) => MatchResult::Win,
                (true, false) => MatchResult::Lose,
                _ => MatchResult::Draw,
            }
        });
        let mate = WIN - self.ply as i32;
        match result {
            MatchResult::Win => mate,
            MatchResult::Lose => -mate,
            MatchResult::Draw => DRAW,
        }
    }

    /// Applies `action` to a copy of `state`. `None` if the engine rejects it.
    fn play(&self, state: &GameState, action: &Action) -> Result<Option<GameState>, SearchError> {
        let mut child = state.clone();
        match GameEngine::new(&mut child).execute(*self.env, action) {
            Ok(_) => Ok(Some(child)),
            Err(err) if err.phase() == TransitionPhase::PreValidate => Ok(None),
            Err(err) => Err(SearchError::Execute(Box::new(err))),
        }
    }

    fn child_score(
        &mut self,
        parent: Team,
        child: &GameState,
        alpha: i32,
        beta: i32,
        depth: u32,
        quiescence: bool,
    ) -> Result<i32, SearchError> {
        self.ply += 1;
        let score = match (child.current_turn == parent, quiescence) {
            (true, false) => self.negamax(child, alpha, beta, depth),
            (false, false) => self.negamax(child, -beta, -alpha, depth).map(|score| -score),
            (true, true) => self.quiescence(child, alpha, beta),
            (false, true) => self.quiescence(child, -beta, -alpha).map(|score| -score),
        };
        self.ply -= 1;
        score
    }

    pub(super) fn negamax(
        &mut self,
        state: &GameState,
        mut alpha: i32,
        beta: i32,
        depth: u32,
    ) -> Result<i32, SearchError> {
        if state.game_over {
            return Ok(self.terminal(state));
        }
        if depth == 0 || self.ply >= self.config.max_ply {
            return self.quiescence(state, alpha, beta);
        }
        self.nodes += 1;

        let hash = state.hash();
        if self.ply > 0 {
            if let Some(score) = self.table.lookup(hash, alpha, beta, depth, self.ply) {
                return Ok(score);
            }
        }

        let team = state.current_turn;
        let mut actions: Vec<Action> = generate_team_actions(self.env, state, team)?
            .into_iter()
            .map(Action::Unit)
            .collect();
        actions.push(Action::end_turn());
        ordering::order(
            state,
            &mut actions,
            self.table.best_move(hash),
            self.killers.at(self.ply),
            &self.history,
        );

        let old_alpha = alpha;
        let mut best = None;
        for action in actions {
            let Some(child) = self.play(state, &action)? else {
                continue;
            };
            let score = self.child_score(team, &child, alpha, beta, depth - 1, false)?;
            if score <= alpha {
                continue;
            }

            let quiet = match action {
                Action::Unit(unit_action) => {
                    let attack = matches!(unit_action.kind(state), Ok(kind) if kind.is_attack());
                    (!attack).then_some(unit_action)
                }
                Action::System(_) => None,
            };
            if score >= beta {
                if quiet.is_some() {
                    self.killers.record(self.ply, action);
                }
                let entry = TableEntry {
                    hash,
                    best: Some(action),
                    score: beta,
                    bound: Bound::Beta,
                    depth,
                };
                self.table.store(entry, self.ply);
                return Ok(beta);
            }
            if let Some(unit_action) = quiet {
                self.history.reward(unit_action, depth);
            }
            alpha = score;
            best = Some(action);
            if self.ply == 0 {
                self.root_best = best;
            }
        }

        let bound = if alpha != old_alpha { Bound::Exact } else { Bound::Alpha };
        let entry = TableEntry {
            hash,
            best,
            score: alpha,
            bound,
            depth,
        };
        self.table.store(entry, self.ply);
        Ok(alpha)
    }

    /// Extends the search through attacks until the position is quiet.
    fn quiescence(&mut self, state: &GameState, mut alpha: i32, beta: i32) -> Result<i32, SearchError> {
        if state.game_over {
            return Ok(self.terminal(state));
        }
        self.nodes += 1;

        let stand_pat = evaluate(state);
        if !self.config.quiescence || self.ply >= self.config.max_ply {
            return Ok(stand_pat);
        }
        if stand_pat >= beta {
            return Ok(beta);
        }
        alpha = alpha.max(stand_pat);

        let team = state.current_turn;
        let mut attacks: Vec<Action> = generate_team_actions(self.env, state, team)?
            .into_iter()
            .filter(|action| matches!(action.kind(state), Ok(UnitActionKind::Attack(_))))
            .map(Action::Unit)
            .collect();
        let hash = state.hash();
        ordering::order(
            state,
            &mut attacks,
            self.table.best_move(hash),
            self.killers.at(self.ply),
            &self.history,
        );

        for action in attacks {
            let Some(child) = self.play(state, &action)? else {
                continue;
            };
            let score = self.child_score(team, &child, alpha, beta, 0, true)?;
            if score >= beta {
                return Ok(beta);
            }
            alpha = alpha.max(score);
        }
        Ok(alpha)
    }
}
