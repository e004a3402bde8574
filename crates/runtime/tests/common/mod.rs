#![allow(dead_code)]

use tactics_content::ContentFactory;
use tactics_core::{Action, Catalog, Env, GameConfig, GameEngine, GameMode, GameState, new_game};
use tactics_runtime::{Runtime, RuntimeConfig};

pub struct Fixture {
    pub catalog: Catalog,
    pub config: GameConfig,
    pub state: GameState,
}

/// Routes worker logs to the test output; set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A match between two bundled rosters, still in its swap phase.
pub fn fixture(blue: &str, red: &str, mode: GameMode) -> Fixture {
    init_tracing();
    let factory = ContentFactory::bundled();
    let catalog = factory.load_catalog().unwrap();
    let config = factory.load_config().unwrap().game;
    let teams = factory.load_teams().unwrap();
    let map = factory.load_map("duel_field").unwrap();
    let env = Env::new(&catalog, &config).into_game_env();
    let state = new_game(
        &env,
        map,
        [teams.get(blue).unwrap(), teams.get(red).unwrap()],
        mode,
    )
    .unwrap();
    Fixture {
        catalog,
        config,
        state,
    }
}

/// Askr against Nohr in a duel, with the first turn under way.
pub fn duel_in_play() -> Fixture {
    let mut fixture = fixture("askr", "nohr", GameMode::Duel);
    let env = Env::new(&fixture.catalog, &fixture.config).into_game_env();
    GameEngine::new(&mut fixture.state)
        .execute(env, &Action::end_swap_phase())
        .unwrap();
    fixture
}

pub fn runtime_config(game_config: GameConfig) -> RuntimeConfig {
    RuntimeConfig {
        game_config,
        default_depth: 1,
        ..RuntimeConfig::default()
    }
}

pub async fn runtime(fixture: Fixture) -> Runtime {
    Runtime::builder()
        .config(runtime_config(fixture.config))
        .catalog(fixture.catalog)
        .initial_state(fixture.state)
        .build()
        .await
        .unwrap()
}
