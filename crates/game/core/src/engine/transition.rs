//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionTransition, SystemAction};
use crate::env::GameEnv;
use crate::error::ErrorContext;
use crate::state::GameState;

use super::ActionOutcome;
use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
pub(super) fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
    context: ErrorContext,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    let fail = |phase, error| TransitionPhaseError::new(phase, error).with_context(context.clone());

    transition
        .pre_validate(state, env)
        .map_err(|error| fail(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state, env)
        .map_err(|error| fail(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| fail(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes each action to its transition.
pub(super) fn execute_transition(
    action: &Action,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<ActionOutcome, ExecuteError> {
    let context = ErrorContext::new(state.turn_count);
    match action {
        Action::Unit(transition) => {
            let mut context = context.with_position(transition.from);
            if let Some(unit) = state.unit_at(transition.from) {
                context = context.with_unit(unit.id);
            }
            drive_transition(transition, state, env, context).map_err(ExecuteError::Unit)
        }
        Action::System(kind) => match kind {
            SystemAction::EndTurn(transition) => {
                drive_transition(transition, state, env, context).map_err(ExecuteError::EndTurn)
            }
            SystemAction::Surrender(transition) => {
                drive_transition(transition, state, env, context).map_err(ExecuteError::Surrender)
            }
            SystemAction::EndSwapPhase(transition) => {
                drive_transition(transition, state, env, context).map_err(ExecuteError::EndSwapPhase)
            }
            SystemAction::SwapStartingPositions(transition) => {
                drive_transition(transition, state, env, context)
                    .map_err(ExecuteError::SwapStartingPositions)
            }
        },
    }
}
