//! In-code catalog, map and helpers shared by the integration tests.
#![allow(dead_code)]

use tactics_core::ability::{
    AbilityDefinition, AbilityKind, AoeShape, AssistKind, AssistParams, CanUse, Catalog,
    CombatFlag, Comparison, Condition, Displacement, Effect, EffectAction, HealCalculation,
    HealSpec, HeroDefinition, MoveType, MovementFlag, Phase, SpecialKind, SpecialParams,
    StatAmount, Target, WarpRule, WeaponParams, WeaponType,
};
use tactics_core::build::Build;
use tactics_core::engine::{GameEngine, new_game};
use tactics_core::env::{Env, GameEnv, MapDescriptor};
use tactics_core::state::{AbilityId, GameMode, GameState, Position, Stat, StatLine, Team, UnitId};
use tactics_core::GameConfig;

pub const SWORD: &str = "IRON_SWORD";
pub const LANCE: &str = "IRON_LANCE";
pub const BOW: &str = "IRON_BOW";
pub const SWAP: &str = "SWAP";
pub const DANCE: &str = "DANCE";
pub const MEND: &str = "MEND";
pub const AXE: &str = "IRON_AXE";
pub const BRAVE_SWORD: &str = "BRAVE_SWORD";
pub const CHARGE_SWORD: &str = "CHARGE_SWORD";

pub const HARDY_BEARING: &str = "HARDY_BEARING";
pub const ACCELERATE: &str = "ACCELERATE";
pub const SWIFT_START: &str = "SWIFT_START";
pub const LATE_SWIFT: &str = "LATE_SWIFT";

pub const DEFLECT: &str = "DEFLECT";
pub const VANTAGE: &str = "VANTAGE";
pub const DESPERATION: &str = "DESPERATION";
pub const GUARD: &str = "GUARD";
pub const LULL_ATK: &str = "LULL_ATK";
pub const PASS: &str = "PASS";
pub const OBSTRUCT: &str = "OBSTRUCT";
pub const WINGS: &str = "WINGS_OF_MERCY";

pub const MOONBOW: &str = "MOONBOW";
pub const MIRACLE: &str = "MIRACLE";
pub const GALEFORCE: &str = "GALEFORCE";
pub const BLAST: &str = "BLAST";

pub const MIGHT: i32 = 16;

/// hp / atk / spd / def / res before the weapon.
pub const MIRROR_STATS: StatLine = StatLine::new(40, 27, 30, 25, 20);

fn weapon(id: &str, weapon_type: WeaponType, range: i32) -> AbilityDefinition {
    AbilityDefinition {
        id: AbilityId::from(id),
        name: id.to_lowercase(),
        kind: AbilityKind::Weapon(WeaponParams {
            weapon_type,
            might: MIGHT,
            range,
            can_be_refined: false,
            effect_refine: None,
            refined_base_upgrade: None,
            refined: false,
        }),
        effects: vec![Effect::new(
            Phase::OnEquip,
            vec![EffectAction::EquipStatMod {
                stat: Stat::Atk,
                value: MIGHT,
            }],
        )],
        can_use: CanUse::default(),
        available_as_seal: false,
    }
}

fn with_effects(mut ability: AbilityDefinition, effects: Vec<Effect>) -> AbilityDefinition {
    ability.effects.extend(effects);
    ability
}

fn passive(id: &str, kind: AbilityKind, effects: Vec<Effect>) -> AbilityDefinition {
    AbilityDefinition {
        id: AbilityId::from(id),
        name: id.to_lowercase(),
        kind,
        effects,
        can_use: CanUse::default(),
        available_as_seal: false,
    }
}

fn special(id: &str, cooldown: i32, kind: SpecialKind, effects: Vec<Effect>) -> AbilityDefinition {
    passive(id, AbilityKind::Special(SpecialParams { cooldown, kind }), effects)
}

fn flag(phase: Phase, flag: CombatFlag) -> Effect {
    Effect::new(
        phase,
        vec![EffectAction::SetCombatFlag {
            flag,
            target: Target::Unit,
        }],
    )
}

fn spd(phase: Phase, value: i32) -> Effect {
    Effect::new(
        phase,
        vec![EffectAction::CombatStatMod {
            stat: Stat::Spd,
            amount: StatAmount::Value(value),
            target: Target::Unit,
        }],
    )
}

fn assist(id: &str, range: i32, kind: AssistKind) -> AbilityDefinition {
    AbilityDefinition {
        id: AbilityId::from(id),
        name: id.to_lowercase(),
        kind: AbilityKind::Assist(AssistParams { range, kind }),
        effects: Vec::new(),
        can_use: CanUse::default(),
        available_as_seal: false,
    }
}

fn hero(id: &str, weapon_type: WeaponType, move_type: MoveType, level40: StatLine) -> HeroDefinition {
    HeroDefinition {
        id: id.into(),
        name: id.to_lowercase(),
        weapon_type,
        move_type,
        level1: StatLine::new(18, 8, 7, 6, 5),
        level40,
        superboons: Vec::new(),
        superbanes: Vec::new(),
    }
}

pub fn catalog() -> Catalog {
    let abilities = vec![
        weapon(SWORD, WeaponType::Sword, 1),
        weapon(LANCE, WeaponType::Lance, 1),
        with_effects(
            weapon(BOW, WeaponType::ColourlessBow, 2),
            vec![flag(Phase::BeforeCombat, CombatFlag::EffectiveAgainstMoveType(MoveType::Flier))],
        ),
        weapon(AXE, WeaponType::Axe, 1),
        with_effects(
            weapon(BRAVE_SWORD, WeaponType::Sword, 1),
            vec![flag(Phase::BeforeCombat, CombatFlag::AttacksTwice).when(Condition::UnitInitiates)],
        ),
        with_effects(
            weapon(CHARGE_SWORD, WeaponType::Sword, 1),
            vec![flag(Phase::DuringCombat, CombatFlag::SpecialChargesPerAttack)],
        ),
        assist(SWAP, 1, AssistKind::Movement(Displacement::Swap)),
        assist(DANCE, 1, AssistKind::Refresh),
        assist(
            MEND,
            1,
            AssistKind::Heal {
                heal: HealSpec {
                    calculations: vec![HealCalculation::Value(10)],
                    min: 0,
                },
                self_heal: None,
            },
        ),
        passive(
            HARDY_BEARING,
            AbilityKind::PassiveA,
            vec![flag(Phase::BeforeCombat, CombatFlag::HardyBearing)],
        ),
        passive(
            ACCELERATE,
            AbilityKind::PassiveA,
            vec![flag(Phase::DuringCombat, CombatFlag::SpecialChargesPerUnitAttack)],
        ),
        passive(SWIFT_START, AbilityKind::PassiveA, vec![spd(Phase::DuringCombat, 5)]),
        passive(LATE_SWIFT, AbilityKind::PassiveA, vec![spd(Phase::DuringCombat2, 5)]),
        passive(
            DEFLECT,
            AbilityKind::PassiveB,
            vec![flag(Phase::DuringCombat, CombatFlag::ConsecutiveHitDamageReduction(80))],
        ),
        passive(
            VANTAGE,
            AbilityKind::PassiveB,
            vec![flag(Phase::DuringCombat, CombatFlag::Vantage)
                .when(Condition::unit_hp(Comparison::Le, 75))],
        ),
        passive(
            DESPERATION,
            AbilityKind::PassiveB,
            vec![flag(Phase::DuringCombat, CombatFlag::Desperation).when(Condition::all([
                Condition::UnitInitiates,
                Condition::unit_hp(Comparison::Le, 75),
            ]))],
        ),
        passive(
            GUARD,
            AbilityKind::PassiveB,
            vec![Effect::new(
                Phase::DuringCombat,
                vec![EffectAction::SetCombatFlag {
                    flag: CombatFlag::Guard,
                    target: Target::Foe,
                }],
            )],
        ),
        passive(
            LULL_ATK,
            AbilityKind::PassiveB,
            vec![Effect::new(
                Phase::StartOfCombat,
                vec![EffectAction::SetCombatFlag {
                    flag: CombatFlag::NeutralizeSpecificBonuses(Stat::Atk),
                    target: Target::Foe,
                }],
            )],
        ),
        passive(
            PASS,
            AbilityKind::PassiveB,
            vec![Effect::new(
                Phase::CalculateOwnMovement,
                vec![EffectAction::SetMovementFlag(MovementFlag::Pass)],
            )],
        ),
        passive(
            OBSTRUCT,
            AbilityKind::PassiveB,
            vec![Effect::new(
                Phase::CalculateEnemyMovement,
                vec![EffectAction::ObstructTiles { spaces: 1 }],
            )],
        ),
        passive(
            WINGS,
            AbilityKind::PassiveB,
            vec![Effect::new(
                Phase::CalculateOwnMovement,
                vec![EffectAction::EnableWarp(WarpRule::SpacesWithinAllies {
                    warp_range: 1,
                    ally_range: None,
                    move_type: None,
                    hp_threshold: Some(50),
                })],
            )],
        ),
        special(
            MOONBOW,
            4,
            SpecialKind::Offensive,
            vec![Effect::new(
                Phase::OnOffensiveSpecialTrigger,
                vec![EffectAction::ReduceDefResByPercent(30)],
            )],
        ),
        special(MIRACLE, 5, SpecialKind::Miracle, Vec::new()),
        special(GALEFORCE, 1, SpecialKind::Galeforce, Vec::new()),
        special(
            BLAST,
            3,
            SpecialKind::Aoe(AoeShape {
                tiles: vec![(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)],
                multiplier: 150,
            }),
            Vec::new(),
        ),
    ];

    let mut heroes = vec![
        hero("MIRROR", WeaponType::Sword, MoveType::Infantry, MIRROR_STATS),
        hero("SPEEDY", WeaponType::Sword, MoveType::Infantry, StatLine::new(40, 27, 35, 25, 20)),
        hero("LANCER", WeaponType::Lance, MoveType::Infantry, MIRROR_STATS),
        hero("ARCHER", WeaponType::ColourlessBow, MoveType::Infantry, MIRROR_STATS),
        hero("RIDER", WeaponType::Sword, MoveType::Cavalry, MIRROR_STATS),
        hero("FIGHTER", WeaponType::Axe, MoveType::Infantry, MIRROR_STATS),
        hero("PEGASUS", WeaponType::Sword, MoveType::Flier, MIRROR_STATS),
    ];
    for slot in 1..=5 {
        heroes.push(hero(
            &format!("SQUAD_{slot}"),
            WeaponType::Sword,
            MoveType::Infantry,
            MIRROR_STATS,
        ));
    }

    Catalog::build(abilities, heroes).expect("fixture catalog is valid")
}

/// Open 8×10 plains board. Blue deploys on row 8, Red on row 1.
pub fn map() -> MapDescriptor {
    let rows = vec!["........"; 10];
    let row = |y: i32| (1..=6).map(|x| Position::new(x, y)).collect::<Vec<_>>();
    MapDescriptor::from_layout("fixture", &rows, Vec::new(), Vec::new(), [row(8), row(1)])
        .expect("fixture map is valid")
}

pub fn sword(hero: &str) -> Build {
    Build::new(hero).with_skills([SWORD])
}

/// `hero` with the iron sword and `skills`.
pub fn sword_with(hero: &str, skills: &[&str]) -> Build {
    Build::new(hero).with_skills(std::iter::once(SWORD).chain(skills.iter().copied()))
}

pub fn env<'a>(catalog: &'a Catalog, config: &'a GameConfig) -> GameEnv<'a> {
    Env::new(catalog, config).into_game_env()
}

/// Starts a match past its swap phase.
pub fn start(env: GameEnv<'_>, blue: &[Build], red: &[Build], mode: GameMode) -> GameState {
    let mut state = new_game(&env, map(), [blue, red], mode).expect("fixture builds are valid");
    GameEngine::new(&mut state)
        .end_swap_phase(env)
        .expect("swap phase ends");
    state
}

pub fn duel_squad() -> Vec<Build> {
    (1..=5).map(|slot| sword(&format!("SQUAD_{slot}"))).collect()
}

/// Moves a unit without going through the engine, as a test setup step.
pub fn place(state: &mut GameState, id: UnitId, position: Position) {
    state.unit_mut(id).expect("unit on board").position = position;
    state.rehash();
}

pub fn set_hp(state: &mut GameState, id: UnitId, hp: i32) {
    state.unit_mut(id).expect("unit on board").set_hp(hp);
    state.rehash();
}

pub fn blue(slot: usize) -> UnitId {
    UnitId::for_slot(Team::Blue, slot)
}

pub fn red(slot: usize) -> UnitId {
    UnitId::for_slot(Team::Red, slot)
}

/// Fully charges the unit's special.
pub fn charge(state: &mut GameState, id: UnitId) {
    if let Some(special) = state.unit_mut(id).expect("unit on board").special.as_mut() {
        special.current = 0;
    }
    state.rehash();
}
