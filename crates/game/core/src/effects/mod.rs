//! Effect interpreter.
//!
//! Collects the effects a unit's abilities and statuses register for a
//! [`Phase`], evaluates their conditions against a read-only [`Scope`] and
//! hands the triggered actions to one of the appliers:
//!
//! - [`apply_combat`] for in-combat phases (flags, then stat mods, then the rest)
//! - [`apply_trigger`] for special triggers, accumulating [`HitModifiers`]
//! - [`apply_board`] for every other phase, with HP changes summed per target
//! - [`movement_modifiers`] for the movement calculation phases
//!
//! Conditions for a batch are evaluated before any action of the batch
//! applies, so every effect of a phase sees the same snapshot.
mod apply;
mod combat;
mod condition;
mod movement;
mod target;
#[cfg(test)]
mod testing;

pub use apply::apply_board;
pub use combat::{HitModifiers, apply_combat, apply_trigger};
pub use condition::evaluate;
pub use movement::{MovementModifiers, movement_modifiers};
pub use target::resolve as resolve_targets;

use crate::ability::{EffectAction, Phase};
use crate::combat::Combatant;
use crate::env::{GameEnv, OracleError};
use crate::state::{GameState, Team, Unit, UnitId};

/// Combat pair visible to conditions and targets.
#[derive(Clone, Copy, Debug)]
pub struct CombatScope<'s> {
    /// Attacker first.
    pub combatants: &'s [Combatant; 2],
    /// While the engagement is being resolved the combat copies are the
    /// authoritative units; afterwards the board is.
    pub live: bool,
}

/// Participants of the assist being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssistScope {
    pub user: UnitId,
    pub target: UnitId,
    /// HP the assist restored to its target.
    pub hp_restored: i32,
}

/// Read-only snapshot an effect is evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct Scope<'s> {
    pub state: &'s GameState,
    pub combat: Option<CombatScope<'s>>,
    /// Unit whose movement range is being calculated.
    pub moving: Option<&'s Unit>,
    pub assist: Option<AssistScope>,
}

impl<'s> Scope<'s> {
    pub fn board(state: &'s GameState) -> Self {
        Self {
            state,
            combat: None,
            moving: None,
            assist: None,
        }
    }

    pub fn combat(state: &'s GameState, combatants: &'s [Combatant; 2], live: bool) -> Self {
        Self {
            combat: Some(CombatScope { combatants, live }),
            ..Self::board(state)
        }
    }

    #[must_use]
    pub fn with_moving(mut self, unit: &'s Unit) -> Self {
        self.moving = Some(unit);
        self
    }

    #[must_use]
    pub fn with_assist(mut self, assist: AssistScope) -> Self {
        self.assist = Some(assist);
        self
    }

    /// Looks a unit up, preferring its combat copy during a live combat.
    pub fn unit(&self, id: UnitId) -> Option<&'s Unit> {
        if let Some(combat) = self.combat.filter(|combat| combat.live) {
            if let Some(combatant) = combat.combatants.iter().find(|c| c.id() == id) {
                return Some(&combatant.unit);
            }
        }
        self.state.unit(id)
    }

    /// The combatant fighting for `team`.
    pub fn combatant(&self, team: Team) -> Option<&'s Combatant> {
        self.combat
            .and_then(|combat| combat.combatants.iter().find(|c| c.unit.team == team))
    }

    pub fn combatant_by_id(&self, id: UnitId) -> Option<&'s Combatant> {
        self.combat
            .and_then(|combat| combat.combatants.iter().find(|c| c.id() == id))
    }

    /// The combatant opposing `team`.
    pub fn foe_of(&self, team: Team) -> Option<&'s Combatant> {
        self.combatant(team.opponent())
    }
}

/// An action whose effect condition held, tagged with the ability owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triggered<'e> {
    pub owner: UnitId,
    pub phase: Phase,
    pub action: &'e EffectAction,
}

/// Appends the actions `owner` triggers in `phase` to `out`, in registration
/// order: equipped skills by slot, then positive statuses, then negative ones.
///
/// # Errors
///
/// Returns [`OracleError`] if the unit references an unknown ability.
pub fn collect<'e>(
    env: &GameEnv<'e>,
    phase: Phase,
    owner: &Unit,
    scope: &Scope<'_>,
    out: &mut Vec<Triggered<'e>>,
) -> Result<(), OracleError> {
    for source in env.effect_sources(owner) {
        let ability = source?;
        for effect in ability.effects_for(phase) {
            let holds = match &effect.condition {
                Some(condition) => evaluate(env, condition, owner, scope)?,
                None => true,
            };
            if holds {
                out.extend(effect.actions.iter().map(|action| Triggered {
                    owner: owner.id,
                    phase,
                    action,
                }));
            }
        }
    }
    Ok(())
}

/// Collects `phase` for every living unit of `team` except `skip`, in roster order.
///
/// # Errors
///
/// Returns [`OracleError`] if a unit references an unknown ability.
pub fn collect_team<'e>(
    env: &GameEnv<'e>,
    phase: Phase,
    team: Team,
    skip: Option<UnitId>,
    scope: &Scope<'_>,
    out: &mut Vec<Triggered<'e>>,
) -> Result<(), OracleError> {
    for unit in scope.state.team(team) {
        if Some(unit.id) == skip || !unit.is_alive() {
            continue;
        }
        collect(env, phase, unit, scope, out)?;
    }
    Ok(())
}
