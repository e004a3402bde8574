//! Animation-oriented description of what a transition did.

use crate::combat::CombatResult;
use crate::config::CaptureArea;
use crate::state::{AbilityId, Position, Stat, Team, UnitId};

/// Why a team scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ScoreKind {
    Ko,
    Capture,
}

/// One sub-event of a transition, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeEvent {
    Moved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    Attacked(Box<CombatResult>),
    Assisted {
        user: UnitId,
        target: UnitId,
    },
    /// Moved by an assist or a post-combat effect.
    Displaced {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    BlockDamaged {
        position: Position,
        hp: i32,
    },
    StatusApplied {
        unit: UnitId,
        status: AbilityId,
    },
    Buffed {
        unit: UnitId,
        stat: Stat,
        value: i32,
    },
    Debuffed {
        unit: UnitId,
        stat: Stat,
        value: i32,
    },
    HpChanged {
        unit: UnitId,
        hp: i32,
    },
    /// The unit may act again (refresh assist or Galeforce).
    Refreshed(UnitId),
    CaptureAreaMoved(CaptureArea),
    Defeated {
        unit: UnitId,
        team: Team,
    },
    Scored {
        team: Team,
        kind: ScoreKind,
        points: u32,
    },
    TurnEnded(Team),
    TurnStarted {
        team: Team,
        turn: u32,
    },
    /// `winner` is `None` for a draw or a standard match decided by
    /// elimination of both sides.
    GameOver {
        winner: Option<Team>,
    },
}

/// Ordered events produced by one mutating entry point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub events: Vec<OutcomeEvent>,
}

impl ActionOutcome {
    pub fn new(events: Vec<OutcomeEvent>) -> Self {
        Self { events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The combat of this outcome, if it contained one.
    pub fn combat(&self) -> Option<&CombatResult> {
        self.events.iter().find_map(|event| match event {
            OutcomeEvent::Attacked(result) => Some(result.as_ref()),
            _ => None,
        })
    }

    pub fn defeated(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.events.iter().filter_map(|event| match event {
            OutcomeEvent::Defeated { unit, .. } => Some(*unit),
            _ => None,
        })
    }

    pub fn ended_game(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, OutcomeEvent::GameOver { .. }))
    }
}
