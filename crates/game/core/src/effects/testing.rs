//! Small boards for the interpreter's unit tests.

use crate::GameConfig;
use crate::ability::{AbilityDefinition, AbilityKind, CanUse, Effect, MoveType, WeaponType};
use crate::env::MapDescriptor;
use crate::state::{
    AbilityId, GameMode, GameState, Position, SkillSlots, StatLine, StatusList, Team, Unit, UnitId,
};

pub(crate) fn unit(team: Team, slot: usize, x: i32, y: i32) -> Unit {
    Unit {
        id: UnitId::for_slot(team, slot),
        team,
        hero: "DUMMY".into(),
        weapon_type: WeaponType::Sword,
        move_type: MoveType::Infantry,
        position: Position::new(x, y),
        stats: StatLine::new(40, 40, 30, 30, 20),
        max_hp: 40,
        phantom: StatLine::ZERO,
        buffs: StatLine::ZERO,
        debuffs: StatLine::ZERO,
        bonuses: StatusList::new(),
        penalties: StatusList::new(),
        skills: SkillSlots::new(),
        special: None,
        has_action: true,
        combats_in_phase: 0,
    }
}

/// Open 6×6 board in standard mode.
pub(crate) fn board(blue: Vec<Unit>, red: Vec<Unit>) -> GameState {
    let map = MapDescriptor::from_layout(
        "effects",
        &["......"; 6],
        Vec::new(),
        Vec::new(),
        [vec![Position::new(0, 5)], vec![Position::new(0, 0)]],
    )
    .expect("layout is valid");
    GameState::new(GameMode::Standard, map, [blue, red], &GameConfig::default())
}

pub(crate) fn passive_b(id: &str, effects: Vec<Effect>) -> AbilityDefinition {
    AbilityDefinition {
        id: AbilityId::from(id),
        name: id.to_lowercase(),
        kind: AbilityKind::PassiveB,
        effects,
        can_use: CanUse::default(),
        available_as_seal: false,
    }
}

pub(crate) fn equip(unit: &mut Unit, id: &str) {
    unit.skills.push(AbilityId::from(id));
}
