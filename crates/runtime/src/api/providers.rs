//! Asynchronous abstraction for sourcing team moves.
//!
//! Runtime users plug in [`MoveProvider`] implementations so a match can run
//! with human input, scripted fixtures, or the search AI.

use async_trait::async_trait;
use tactics_core::{Action, GameState};

use super::errors::Result;
use super::handle::SearchHandle;

/// Trait for choosing the next action of the team to move.
#[async_trait]
pub trait MoveProvider: Send + Sync {
    /// Provide an action for `state.current_turn` based on a read-only view
    /// of the match.
    async fn provide_move(&self, state: &GameState) -> Result<Action>;
}

/// Provider that ends the swap phase and then every turn without acting.
pub struct EndTurnProvider;

#[async_trait]
impl MoveProvider for EndTurnProvider {
    async fn provide_move(&self, state: &GameState) -> Result<Action> {
        if state.swap_phase {
            Ok(Action::end_swap_phase())
        } else {
            Ok(Action::end_turn())
        }
    }
}

/// The search AI: ends the swap phase as is, then plays the best move at
/// the handle's default depth, ending the turn when nothing is worth doing.
#[async_trait]
impl MoveProvider for SearchHandle {
    async fn provide_move(&self, state: &GameState) -> Result<Action> {
        if state.swap_phase {
            return Ok(Action::end_swap_phase());
        }
        let outcome = self.best_move_default(state).await?;
        Ok(outcome.best.unwrap_or_else(Action::end_turn))
    }
}
