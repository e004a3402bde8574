//! Authoritative game state representation.
//!
//! [`GameState`] is the root aggregate of a match: the board (with mutable
//! block HP), both rosters, turn bookkeeping, duel scoring and a content
//! hash. Runtime layers clone or query this state but mutate it exclusively
//! through [`crate::engine::GameEngine`].
mod error;
mod hash;
pub mod types;

pub use error::StateError;
pub use types::{
    AbilityId, DuelState, GameMode, MatchResult, PANIC_STATUS, Position, SkillSlots,
    SpecialCounter, Stat, StatLine, StatusList, Team, Unit, UnitId,
};

use std::collections::BTreeSet;

use crate::config::{CaptureArea, GameConfig};
use crate::env::MapDescriptor;

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub mode: GameMode,
    /// Board copy owned by the match; block HP changes as blocks are hit.
    pub map: MapDescriptor,
    /// Living units per team, indexed by [`Team::index`].
    pub teams: [Vec<Unit>; 2],
    /// Defeated units, in order of defeat. Kept for scoring and history.
    pub fallen: Vec<Unit>,
    pub turn_count: u32,
    pub current_turn: Team,
    pub swap_phase: bool,
    /// Per-team duel bookkeeping; `None` in standard mode.
    pub duel: Option<[DuelState; 2]>,
    pub capture_area: CaptureArea,
    pub last_starting_team: Team,
    pub game_over: bool,
    /// Seed of the content hash, fixed for the whole match.
    zobrist_seed: u64,
    hash: u64,
}

impl GameState {
    /// Creates the state of a match in its swap phase.
    ///
    /// In duel mode the first unit of each roster is its captain and both
    /// teams start with the full action budget.
    pub fn new(mode: GameMode, map: MapDescriptor, teams: [Vec<Unit>; 2], config: &GameConfig) -> Self {
        let duel = (mode == GameMode::Duel).then(|| {
            Team::ALL.map(|team| {
                let captain = teams[team.index()]
                    .first()
                    .map(|unit| unit.id)
                    .unwrap_or(UnitId::for_slot(team, 0));
                DuelState::new(captain, config.actions_per_turn)
            })
        });

        let mut state = Self {
            mode,
            map,
            teams,
            fallen: Vec::new(),
            turn_count: 1,
            current_turn: Team::Blue,
            swap_phase: true,
            duel,
            capture_area: config.capture_area,
            last_starting_team: Team::Blue,
            game_over: false,
            zobrist_seed: config.zobrist_seed,
            hash: 0,
        };
        state.rehash();
        state
    }

    pub fn is_duel(&self) -> bool {
        self.mode == GameMode::Duel
    }

    // ===== rosters =====

    pub fn team(&self, team: Team) -> &[Unit] {
        &self.teams[team.index()]
    }

    pub fn team_mut(&mut self, team: Team) -> &mut Vec<Unit> {
        &mut self.teams[team.index()]
    }

    /// Every living unit, Blue first, in roster order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.teams.iter().flatten()
    }

    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.teams.iter_mut().flatten()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units().find(|unit| unit.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units_mut().find(|unit| unit.id == id)
    }

    /// Looks up a unit, reporting a missing one as a state error.
    pub fn require(&self, id: UnitId) -> Result<&Unit, StateError> {
        self.unit(id).ok_or(StateError::UnitNotFound(id))
    }

    pub fn require_mut(&mut self, id: UnitId) -> Result<&mut Unit, StateError> {
        self.unit_mut(id).ok_or(StateError::UnitNotFound(id))
    }

    pub fn unit_at(&self, position: Position) -> Option<&Unit> {
        self.units().find(|unit| unit.position == position)
    }

    /// True if a living unit other than `except` stands on `position`.
    pub fn is_occupied(&self, position: Position, except: Option<UnitId>) -> bool {
        self.units()
            .any(|unit| unit.position == position && Some(unit.id) != except)
    }

    /// Teammates of `unit`, excluding itself.
    pub fn allies_of<'s>(&'s self, unit: &'s Unit) -> impl Iterator<Item = &'s Unit> + 's {
        self.team(unit.team)
            .iter()
            .filter(move |ally| ally.id != unit.id)
    }

    pub fn foes_of(&self, team: Team) -> &[Unit] {
        self.team(team.opponent())
    }

    // ===== duel bookkeeping =====

    pub fn duel(&self, team: Team) -> Option<&DuelState> {
        self.duel.as_ref().map(|duel| &duel[team.index()])
    }

    pub fn duel_mut(&mut self, team: Team) -> Option<&mut DuelState> {
        self.duel.as_mut().map(|duel| &mut duel[team.index()])
    }

    pub fn is_captain(&self, unit: &Unit) -> bool {
        self.duel(unit.team)
            .is_some_and(|duel| duel.captain == unit.id)
    }

    /// Result recorded for `team`, if the match is decided.
    pub fn result(&self, team: Team) -> Option<MatchResult> {
        self.duel(team).and_then(|duel| duel.result)
    }

    /// Moves every unit with no HP left from its roster to `fallen` and
    /// returns their ids.
    pub fn remove_defeated(&mut self) -> Vec<UnitId> {
        let mut defeated = Vec::new();
        for roster in &mut self.teams {
            let (alive, dead): (Vec<Unit>, Vec<Unit>) =
                roster.drain(..).partition(Unit::is_alive);
            *roster = alive;
            defeated.extend(dead.iter().map(|unit| unit.id));
            self.fallen.extend(dead);
        }
        defeated
    }

    // ===== hashing =====

    /// Current content hash. Structurally identical states share a hash.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn zobrist_seed(&self) -> u64 {
        self.zobrist_seed
    }

    /// Recomputes the content hash after a mutation.
    pub fn rehash(&mut self) {
        self.hash = hash::zobrist(self, self.zobrist_seed);
    }

    /// SHA-256 over the bincode encoding of the state.
    ///
    /// Used for sync and replay equality checks where a 64-bit hash is not
    /// enough.
    ///
    /// # Errors
    ///
    /// Returns the bincode error if the state fails to encode.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }

    // ===== invariants =====

    /// Checks the structural invariants every transition must preserve.
    ///
    /// # Errors
    ///
    /// Returns the first [`StateError`] found.
    pub fn validate(&self) -> Result<(), StateError> {
        let mut ids = BTreeSet::new();
        let mut tiles: Vec<(Position, UnitId)> = Vec::with_capacity(10);

        for unit in self.units() {
            if !ids.insert(unit.id) {
                return Err(StateError::DuplicateUnitId(unit.id));
            }
            if unit.stats.hp < 0 || unit.stats.hp > unit.max_hp {
                return Err(StateError::HpOutOfRange {
                    unit: unit.id,
                    hp: unit.stats.hp,
                    max: unit.max_hp,
                });
            }
            if !unit.is_alive() {
                return Err(StateError::DefeatedOnBoard(unit.id));
            }
            if !self.map.contains(unit.position) {
                return Err(StateError::OffMap {
                    unit: unit.id,
                    position: unit.position,
                });
            }
            if let Some(&(position, first)) =
                tiles.iter().find(|(position, _)| *position == unit.position)
            {
                return Err(StateError::SharedTile {
                    position,
                    first,
                    second: unit.id,
                });
            }
            tiles.push((unit.position, unit.id));
        }

        for unit in &self.fallen {
            if !ids.insert(unit.id) {
                return Err(StateError::DuplicateUnitId(unit.id));
            }
        }
        Ok(())
    }
}
