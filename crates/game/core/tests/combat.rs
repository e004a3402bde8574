mod common;

use common::*;
use tactics_core::GameConfig;
use tactics_core::action::{Action, UnitAction};
use tactics_core::build::Build;
use tactics_core::engine::{GameEngine, OutcomeEvent, calculate_combat_result, preview_attack};
use tactics_core::env::MapDescriptor;
use tactics_core::state::{GameMode, GameState, Position, Stat, Team, UnitId};

fn face_off(state: &mut GameState) {
    place(state, blue(0), Position::new(3, 5));
    place(state, red(0), Position::new(3, 4));
}

fn order(env: &tactics_core::env::GameEnv<'_>, state: &GameState) -> Vec<UnitId> {
    calculate_combat_result(env, state, blue(0), red(0))
        .unwrap()
        .blows()
        .map(|hit| hit.attacker)
        .collect()
}

#[test]
fn mirror_units_trade_atk_minus_def() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &[sword("MIRROR")], &[sword("MIRROR")], GameMode::Standard);
    place(&mut state, blue(0), Position::new(3, 5));
    place(&mut state, red(0), Position::new(3, 4));

    let result = calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    let expected = MIRROR_STATS.atk + MIGHT - MIRROR_STATS.def;

    let blows: Vec<_> = result.blows().collect();
    assert_eq!(blows.len(), 2);
    assert_eq!(blows[0].attacker, blue(0));
    assert_eq!(blows[1].attacker, red(0));
    assert!(blows.iter().all(|hit| hit.damage == expected));
    assert_eq!(result.attacker().unit.hp(), MIRROR_STATS.hp - expected);
    assert_eq!(result.defender().unit.hp(), MIRROR_STATS.hp - expected);
    assert_eq!(result.damage_dealt(blue(0)), result.damage_dealt(red(0)));
}

#[test]
fn resolving_combat_leaves_the_board_untouched() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &[sword("MIRROR")], &[sword("MIRROR")], GameMode::Standard);
    place(&mut state, blue(0), Position::new(3, 5));
    place(&mut state, red(0), Position::new(3, 4));
    let before = state.clone();

    calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    assert_eq!(state, before);
}

#[test]
fn five_speed_lead_doubles_and_foe_cannot() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &[sword("SPEEDY")], &[sword("MIRROR")], GameMode::Standard);
    place(&mut state, blue(0), Position::new(3, 5));
    place(&mut state, red(0), Position::new(3, 4));

    let attackers: Vec<_> = calculate_combat_result(&env, &state, blue(0), red(0))
        .unwrap()
        .blows()
        .map(|hit| hit.attacker)
        .collect();
    assert_eq!(attackers, vec![blue(0), red(0), blue(0)]);

    // reversed roles: the slower initiator still gets exactly one blow
    let attackers: Vec<_> = calculate_combat_result(&env, &state, red(0), blue(0))
        .unwrap()
        .blows()
        .map(|hit| hit.attacker)
        .collect();
    assert_eq!(attackers, vec![red(0), blue(0), blue(0)]);
}

#[test]
fn weapon_triangle_adds_twenty_percent() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let lancer = tactics_core::build::Build::new("LANCER").with_skills([LANCE]);
    let mut state = start(env, &[sword("MIRROR")], &[lancer], GameMode::Standard);
    place(&mut state, blue(0), Position::new(3, 5));
    place(&mut state, red(0), Position::new(3, 4));

    let result = calculate_combat_result(&env, &state, red(0), blue(0)).unwrap();
    let atk = MIRROR_STATS.atk + MIGHT;
    let blows: Vec<_> = result.blows().collect();
    // lance beats sword: 43 + floor(43 × 0.2) − 25, sword loses: 43 − floor(43 × 0.2) − 25
    assert_eq!(blows[0].damage, atk + atk * 20 / 100 - MIRROR_STATS.def);
    assert_eq!(blows[1].damage, atk - (atk * 20 + 99) / 100 - MIRROR_STATS.def);
}

#[test]
fn defensive_terrain_raises_defence() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &[sword("MIRROR")], &[sword("MIRROR")], GameMode::Standard);

    let rows = vec!["........"; 10];
    let starts = [
        (1..=6).map(|x| Position::new(x, 8)).collect(),
        (1..=6).map(|x| Position::new(x, 1)).collect(),
    ];
    state.map = MapDescriptor::from_layout("fort", &rows, vec![Position::new(3, 4)], Vec::new(), starts).unwrap();
    place(&mut state, blue(0), Position::new(3, 5));
    place(&mut state, red(0), Position::new(3, 4));

    let result = calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    let def = MIRROR_STATS.def;
    let blows: Vec<_> = result.blows().collect();
    assert_eq!(blows[0].damage, MIRROR_STATS.atk + MIGHT - def - def * 30 / 100);
    assert_eq!(blows[1].damage, MIRROR_STATS.atk + MIGHT - def);
}

#[test]
fn ranged_attacker_is_not_countered_by_melee() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let archer = tactics_core::build::Build::new("ARCHER").with_skills([BOW]);
    let mut state = start(env, &[archer], &[sword("MIRROR")], GameMode::Standard);
    place(&mut state, blue(0), Position::new(3, 6));
    place(&mut state, red(0), Position::new(3, 4));

    let result = calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    assert!(result.blows().all(|hit| hit.attacker == blue(0)));
    assert!(!result.attacked(red(0)));
}

#[test]
fn preview_moves_the_attacker_first() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &[sword("MIRROR")], &[sword("MIRROR")], GameMode::Standard);
    place(&mut state, blue(0), Position::new(3, 6));
    place(&mut state, red(0), Position::new(3, 4));

    let action = UnitAction::targeting(Position::new(3, 6), Position::new(3, 5), Position::new(3, 4));
    let result = preview_attack(&env, &state, &action).unwrap();
    assert_eq!(result.attacker().unit.position, Position::new(3, 5));
    assert_eq!(result.blows().count(), 2);
    assert_eq!(state.unit(blue(0)).unwrap().position, Position::new(3, 6));
}

// ============================================================================
// Blow order
// ============================================================================

#[test]
fn brave_hits_twice_and_deflect_softens_the_second() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let brave = Build::new("MIRROR").with_skills([BRAVE_SWORD]);
    let mut state = start(env, &[brave.clone()], &[sword("MIRROR")], GameMode::Standard);
    face_off(&mut state);

    let blows = |state: &GameState| -> Vec<(UnitId, i32)> {
        calculate_combat_result(&env, state, blue(0), red(0))
            .unwrap()
            .blows()
            .map(|hit| (hit.attacker, hit.damage))
            .collect()
    };
    assert_eq!(blows(&state), vec![(blue(0), 18), (blue(0), 18), (red(0), 18)]);

    let mut state = start(env, &[brave], &[sword_with("MIRROR", &[DEFLECT])], GameMode::Standard);
    face_off(&mut state);
    // 80% off the consecutive hit: ceil(18 × 0.2)
    assert_eq!(blows(&state), vec![(blue(0), 18), (blue(0), 4), (red(0), 18)]);
}

#[test]
fn vantage_counters_first_unless_hardy_bearing() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &[sword("MIRROR")], &[sword_with("MIRROR", &[VANTAGE])], GameMode::Standard);
    face_off(&mut state);
    assert_eq!(order(&env, &state), vec![blue(0), red(0)]);

    set_hp(&mut state, red(0), 30);
    assert_eq!(order(&env, &state), vec![red(0), blue(0)]);

    let mut state = start(
        env,
        &[sword_with("MIRROR", &[HARDY_BEARING])],
        &[sword_with("MIRROR", &[VANTAGE])],
        GameMode::Standard,
    );
    face_off(&mut state);
    set_hp(&mut state, red(0), 30);
    assert_eq!(order(&env, &state), vec![blue(0), red(0)]);
}

#[test]
fn desperation_follows_up_before_the_counter() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let speedy = sword_with("SPEEDY", &[DESPERATION]);
    let mut state = start(env, &[speedy.clone()], &[sword("MIRROR")], GameMode::Standard);
    face_off(&mut state);
    assert_eq!(order(&env, &state), vec![blue(0), red(0), blue(0)]);

    set_hp(&mut state, blue(0), 20);
    assert_eq!(order(&env, &state), vec![blue(0), blue(0), red(0)]);

    let mut state = start(env, &[speedy], &[sword_with("MIRROR", &[HARDY_BEARING])], GameMode::Standard);
    face_off(&mut state);
    set_hp(&mut state, blue(0), 20);
    assert_eq!(order(&env, &state), vec![blue(0), red(0), blue(0)]);
}

#[test]
fn follow_ups_use_speed_from_the_first_during_combat_pass() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);

    let mut state = start(env, &[sword_with("MIRROR", &[LATE_SWIFT])], &[sword("MIRROR")], GameMode::Standard);
    face_off(&mut state);
    assert_eq!(order(&env, &state), vec![blue(0), red(0)]);

    let mut state = start(env, &[sword_with("MIRROR", &[SWIFT_START])], &[sword("MIRROR")], GameMode::Standard);
    face_off(&mut state);
    assert_eq!(order(&env, &state), vec![blue(0), red(0), blue(0)]);
}

// ============================================================================
// Specials
// ============================================================================

#[test]
fn miracle_leaves_one_hp_and_resets() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &[sword("MIRROR")], &[sword_with("MIRROR", &[MIRACLE])], GameMode::Standard);
    face_off(&mut state);
    set_hp(&mut state, red(0), 10);
    charge(&mut state, red(0));

    let result = calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    let first = result.blows().next().unwrap();
    assert_eq!(first.damage, 9);
    assert_eq!(first.defender_hp, 1);
    assert!(first.defender_special);
    assert_eq!(first.defender_charge, Some(5));
    assert!(result.defender().is_alive());
}

#[test]
fn charge_rate_takes_the_best_bonus_once_and_guard_slows_it() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let first_charge = |blue_build: Build, red_build: Build| {
        let mut state = start(env, &[blue_build], &[red_build], GameMode::Standard);
        face_off(&mut state);
        calculate_combat_result(&env, &state, blue(0), red(0))
            .unwrap()
            .blows()
            .next()
            .unwrap()
            .attacker_charge
    };
    let accelerated = || Build::new("MIRROR").with_skills([CHARGE_SWORD, ACCELERATE, MOONBOW]);

    assert_eq!(first_charge(sword_with("MIRROR", &[MOONBOW]), sword("MIRROR")), Some(3));
    assert_eq!(first_charge(accelerated(), sword("MIRROR")), Some(2));
    assert_eq!(first_charge(accelerated(), sword_with("MIRROR", &[GUARD])), Some(3));
}

#[test]
fn galeforce_refreshes_the_attacker_after_combat() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(
        env,
        &[sword_with("MIRROR", &[GALEFORCE]), sword("SQUAD_1")],
        &[sword("MIRROR")],
        GameMode::Standard,
    );
    place(&mut state, blue(0), Position::new(3, 6));
    place(&mut state, red(0), Position::new(3, 4));

    let mut engine = GameEngine::new(&mut state);
    let outcome = engine
        .execute(
            env,
            &Action::Unit(UnitAction::targeting(
                Position::new(3, 6),
                Position::new(3, 5),
                Position::new(3, 4),
            )),
        )
        .unwrap();
    assert!(outcome.events.contains(&OutcomeEvent::Refreshed(blue(0))));
    let attacker = engine.state().unit(blue(0)).unwrap();
    assert!(attacker.has_action);
    assert_eq!(attacker.special.map(|special| special.current), Some(1));
    assert_eq!(engine.state().current_turn, Team::Blue);
}

// ============================================================================
// Neutralisation
// ============================================================================

#[test]
fn lull_strips_the_foes_atk_buff() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let buffed = |state: &mut GameState| {
        state.unit_mut(blue(0)).unwrap().buffs[Stat::Atk] = 6;
        state.rehash();
    };

    let mut state = start(env, &[sword("MIRROR")], &[sword("MIRROR")], GameMode::Standard);
    face_off(&mut state);
    buffed(&mut state);
    let result = calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    assert_eq!(result.blows().next().unwrap().damage, 24);

    let mut state = start(env, &[sword("MIRROR")], &[sword_with("MIRROR", &[LULL_ATK])], GameMode::Standard);
    face_off(&mut state);
    buffed(&mut state);
    let result = calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    assert_eq!(result.blows().next().unwrap().damage, 18);
}

// ============================================================================
// Area specials
// ============================================================================

#[test]
fn area_damage_uses_each_victims_own_triangle() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(
        env,
        &[sword_with("MIRROR", &[BLAST])],
        &[
            sword("MIRROR"),
            Build::new("FIGHTER").with_skills([AXE]),
            Build::new("LANCER").with_skills([LANCE]),
        ],
        GameMode::Standard,
    );
    face_off(&mut state);
    place(&mut state, red(1), Position::new(2, 4));
    place(&mut state, red(2), Position::new(4, 4));
    charge(&mut state, blue(0));

    let result = calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    let hits: Vec<_> = result.aoe_hits().map(|hit| (hit.defender, hit.damage)).collect();
    // neutral 1.5 × 18, lance 43 → 34, axe 43 → 51
    assert_eq!(hits, vec![(red(0), 27), (red(2), 13), (red(1), 39)]);
}

#[test]
fn area_damage_is_effective_against_bystanders() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let archer = Build::new("ARCHER").with_skills([BOW, BLAST]);
    let mut state = start(
        env,
        &[archer],
        &[sword("MIRROR"), sword("PEGASUS")],
        GameMode::Standard,
    );
    place(&mut state, blue(0), Position::new(3, 6));
    place(&mut state, red(0), Position::new(3, 4));
    place(&mut state, red(1), Position::new(4, 4));
    charge(&mut state, blue(0));

    let result = calculate_combat_result(&env, &state, blue(0), red(0)).unwrap();
    let hits: Vec<_> = result.aoe_hits().collect();
    assert_eq!(hits.len(), 2);
    assert_eq!((hits[0].defender, hits[0].damage), (red(0), 27));
    // 43 → 64 effective: 1.5 × 39
    assert_eq!((hits[1].defender, hits[1].damage), (red(1), 58));
    assert_eq!(hits[1].defender_hp, 1);
}
