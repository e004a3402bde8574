//! Declarative effects: a phase, an optional condition, ordered actions.

use super::{Condition, EffectAction};

/// Point in the game flow at which an effect is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    OnEquip,
    BeforeCombat,
    StartOfCombat,
    StartOfAllyCombat,
    DuringCombat,
    DuringAllyCombat,
    DuringCombat2,
    OnOffensiveSpecialTrigger,
    OnDefensiveSpecialTrigger,
    OnHealingSpecialTrigger,
    AfterCombatBeforeDeath,
    AfterCombat,
    AfterAllyCombat,
    AfterCombatDisplacement,
    StartOfTurn,
    StartOfEnemyPhase,
    StartOfPlayerPhaseOrEnemyPhase,
    CalculateOwnMovement,
    CalculateAllyMovement,
    CalculateEnemyMovement,
    UsedMovementAssist,
    TargetedByMovementAssist,
    UsedDance,
    UsedHeal,
    UsedRallyAssist,
    TargetedByRallyAssist,
}

impl Phase {
    /// Phases evaluated while a combat is being resolved.
    pub fn is_in_combat(self) -> bool {
        use Phase::*;
        matches!(
            self,
            BeforeCombat
                | StartOfCombat
                | StartOfAllyCombat
                | DuringCombat
                | DuringAllyCombat
                | DuringCombat2
                | OnOffensiveSpecialTrigger
                | OnDefensiveSpecialTrigger
        )
    }

    /// Phases that have a pair of combatants in scope (in or right after combat).
    pub fn has_combatants(self) -> bool {
        use Phase::*;
        self.is_in_combat()
            || matches!(
                self,
                AfterCombatBeforeDeath | AfterCombat | AfterAllyCombat | AfterCombatDisplacement
            )
    }

    pub fn is_special_trigger(self) -> bool {
        matches!(
            self,
            Phase::OnOffensiveSpecialTrigger | Phase::OnDefensiveSpecialTrigger
        )
    }

    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Phase::CalculateOwnMovement | Phase::CalculateAllyMovement | Phase::CalculateEnemyMovement
        )
    }

    pub fn is_assist(self) -> bool {
        use Phase::*;
        matches!(
            self,
            UsedMovementAssist
                | TargetedByMovementAssist
                | UsedDance
                | UsedHeal
                | UsedRallyAssist
                | TargetedByRallyAssist
                | OnHealingSpecialTrigger
        )
    }
}

/// A single declarative rule attached to an ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub phase: Phase,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Option<Condition>,
    pub actions: Vec<EffectAction>,
}

impl Effect {
    pub fn new(phase: Phase, actions: Vec<EffectAction>) -> Self {
        Self {
            phase,
            condition: None,
            actions,
        }
    }

    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}
