mod common;

use common::*;
use tactics_core::action::{Action, UnitAction};
use tactics_core::engine::{GameEngine, new_game};
use tactics_core::search::{SearchError, WIN, best_move, evaluate};
use tactics_core::state::{GameMode, GameState, Position, Team};
use tactics_core::{GameConfig, GameError, SearchConfig};

/// Blue at (3, 6) facing a red unit on 1 HP two tiles north.
fn finishing_blow(env: tactics_core::GameEnv<'_>) -> GameState {
    let mut state = start(env, &[sword("MIRROR")], &[sword("MIRROR")], GameMode::Standard);
    place(&mut state, blue(0), Position::new(3, 6));
    place(&mut state, red(0), Position::new(3, 4));
    set_hp(&mut state, red(0), 1);
    state
}

#[test]
fn takes_the_winning_attack() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let state = finishing_blow(env);

    for depth in 1..=2 {
        let outcome = best_move(&env, &state, depth, &SearchConfig::default()).unwrap();
        assert_eq!(
            outcome.best,
            Some(Action::Unit(UnitAction::targeting(
                Position::new(3, 6),
                Position::new(3, 5),
                Position::new(3, 4),
            )))
        );
        assert_eq!(outcome.score, WIN - 1);
        assert_eq!(outcome.depth, depth);
    }
}

#[test]
fn search_is_deterministic_and_read_only() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &duel_squad(), &duel_squad(), GameMode::Duel);
    place(&mut state, red(2), Position::new(3, 6));
    let before = state.clone();

    let first = best_move(&env, &state, 2, &SearchConfig::default()).unwrap();
    let second = best_move(&env, &state, 2, &SearchConfig::default()).unwrap();
    assert_eq!(first, second);
    assert!(first.best.is_some());
    assert!(first.nodes > 0);
    assert_eq!(state, before);
}

#[test]
fn best_move_is_playable() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = start(env, &duel_squad(), &duel_squad(), GameMode::Duel);

    for _ in 0..4 {
        let outcome = best_move(&env, &state, 1, &SearchConfig::default()).unwrap();
        let action = outcome.best.unwrap_or_else(Action::end_turn);
        GameEngine::new(&mut state).execute(env, &action).unwrap();
    }
    assert!(!state.game_over);
}

#[test]
fn quiescence_can_be_disabled() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let state = finishing_blow(env);
    let search = SearchConfig {
        quiescence: false,
        ..SearchConfig::default()
    };

    let outcome = best_move(&env, &state, 1, &search).unwrap();
    assert_eq!(outcome.score, WIN - 1);
}

#[test]
fn rejects_unsearchable_positions() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let search = SearchConfig::default();

    let state = finishing_blow(env);
    let err = best_move(&env, &state, 0, &search).unwrap_err();
    assert_eq!(err, SearchError::InvalidDepth);
    assert_eq!(err.error_code(), "SEARCH_INVALID_DEPTH");

    let swapping = new_game(&env, map(), [&[sword("MIRROR")], &[sword("MIRROR")]], GameMode::Standard).unwrap();
    assert_eq!(best_move(&env, &swapping, 1, &search).unwrap_err(), SearchError::SwapPhase);

    let mut finished = state.clone();
    GameEngine::new(&mut finished).surrender(env, Team::Red).unwrap();
    assert_eq!(best_move(&env, &finished, 1, &search).unwrap_err(), SearchError::GameOver);
}

#[test]
fn evaluation_is_symmetric_between_sides() {
    let catalog = catalog();
    let config = GameConfig::default();
    let env = env(&catalog, &config);
    let mut state = finishing_blow(env);

    let blue_view = evaluate(&state);
    // red: 1 hp at distance 0, blue: 40 hp at distance 0 from the capture area
    assert_eq!(blue_view, (20 + MIRROR_STATS.hp) - (20 + 1));

    state.current_turn = Team::Red;
    assert_eq!(evaluate(&state), -blue_view);
}
