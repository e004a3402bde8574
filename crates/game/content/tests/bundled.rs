//! The bundled data must build a valid catalog and playable matches.

use tactics_content::ContentFactory;
use tactics_core::ability::{AbilityKind, CombatFlag, EffectAction, SpecialKind, Target};
use tactics_core::engine::{GameEngine, new_game};
use tactics_core::{AbilityCategory, Action, CatalogOracle, Env, GameMode, Team};

#[test]
fn bundled_catalog_builds_with_derived_variants() {
    let catalog = ContentFactory::bundled().load_catalog().unwrap();
    let refined = catalog.ability("FOLKVANGR_REFINE_EFF").unwrap();
    assert!(refined.weapon().is_some_and(|weapon| weapon.refined));
    assert!(catalog.ability("GRAVITY_PLUS_REFINE_WRATHFUL").is_some());
    assert!(catalog.ability("GRAVITY_PLUS_REFINE_ATK").is_none());

    let seal = catalog.ability("DEATH_BLOW_3_SEAL").unwrap();
    assert_eq!(seal.category(), AbilityCategory::PassiveS);
    assert!(catalog.ability("STURDY_STANCE_2_SEAL").is_none());

    let rising_flame = catalog.ability("RISING_FLAME").unwrap();
    assert!(matches!(
        rising_flame.kind,
        AbilityKind::Special(ref special) if matches!(special.kind, SpecialKind::Aoe(_))
    ));
    assert!(catalog.hero("CAMILLA").is_some());
}

#[test]
fn bundled_passives_include_deflect_and_obstruct() {
    let catalog = ContentFactory::bundled().load_catalog().unwrap();
    let actions = |id: &str| -> Vec<EffectAction> {
        catalog
            .ability(id)
            .unwrap_or_else(|| panic!("{id} is bundled"))
            .effects
            .iter()
            .flat_map(|effect| effect.actions.iter().cloned())
            .collect()
    };

    for id in ["DEFLECT_MELEE_3", "DEFLECT_MISSILE_3", "DEFLECT_MAGIC_3"] {
        assert_eq!(catalog.ability(id).unwrap().category(), AbilityCategory::PassiveS);
        assert!(actions(id).contains(&EffectAction::SetCombatFlag {
            flag: CombatFlag::ConsecutiveHitDamageReduction(80),
            target: Target::Unit,
        }));
    }
    for id in ["OBSTRUCT_3", "OBSTRUCT_3_SEAL"] {
        assert!(actions(id).contains(&EffectAction::ObstructTiles { spaces: 1 }));
    }
    assert!(catalog.ability("GUARD_3_SEAL").is_some());
    assert!(catalog.ability("SEAL_RES_3").is_some());
}

#[test]
fn every_bundled_map_loads() {
    let factory = ContentFactory::bundled();
    let names = factory.map_names().unwrap();
    assert_eq!(names, vec!["duel_field".to_string(), "river_fort".to_string()]);

    for name in names {
        let map = factory.load_map(&name).unwrap();
        assert_eq!(map.id, name);
        assert_eq!((map.dimensions.width, map.dimensions.height), (8, 10));
        for team in Team::ALL {
            assert!(map.starting_positions(team).len() >= 5);
        }
    }
}

#[test]
fn bundled_duel_teams_start_a_match() {
    let factory = ContentFactory::bundled();
    let catalog = factory.load_catalog().unwrap();
    let config = factory.load_config().unwrap();
    let teams = factory.load_teams().unwrap();
    let env = Env::new(&catalog, &config.game).into_game_env();

    for map_name in ["duel_field", "river_fort"] {
        let map = factory.load_map(map_name).unwrap();
        let mut state = new_game(
            &env,
            map,
            [teams.get("askr").unwrap(), teams.get("nohr").unwrap()],
            GameMode::Duel,
        )
        .unwrap();

        assert_eq!(state.team(Team::Blue).len(), 5);
        assert_eq!(state.team(Team::Red).len(), 5);
        GameEngine::new(&mut state)
            .execute(env, &Action::end_swap_phase())
            .unwrap();
        assert!(!state.game_over);
    }
}

#[test]
fn skirmish_roster_is_standard_only() {
    let factory = ContentFactory::bundled();
    let catalog = factory.load_catalog().unwrap();
    let config = factory.load_config().unwrap();
    let teams = factory.load_teams().unwrap();
    let env = Env::new(&catalog, &config.game).into_game_env();
    let map = factory.load_map("duel_field").unwrap();
    let skirmish = teams.get("skirmish").unwrap();

    assert!(new_game(&env, map.clone(), [skirmish, teams.get("nohr").unwrap()], GameMode::Standard).is_ok());
    assert!(new_game(&env, map, [skirmish, teams.get("nohr").unwrap()], GameMode::Duel).is_err());
}

#[test]
fn state_digest_tracks_content() {
    let factory = ContentFactory::bundled();
    let catalog = factory.load_catalog().unwrap();
    let config = factory.load_config().unwrap();
    let teams = factory.load_teams().unwrap();
    let env = Env::new(&catalog, &config.game).into_game_env();
    let map = factory.load_map("duel_field").unwrap();
    let rosters = [teams.get("askr").unwrap(), teams.get("nohr").unwrap()];

    let mut state = new_game(&env, map.clone(), rosters, GameMode::Duel).unwrap();
    let replay = new_game(&env, map, rosters, GameMode::Duel).unwrap();
    let opening = state.digest().unwrap();
    assert_eq!(opening, replay.digest().unwrap());
    assert_eq!(hex::encode(opening).len(), 64);

    GameEngine::new(&mut state)
        .execute(env, &Action::end_swap_phase())
        .unwrap();
    assert_ne!(hex::encode(state.digest().unwrap()), hex::encode(opening));
}
