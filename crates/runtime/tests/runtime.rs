//! Matches driven by move providers.

mod common;

use async_trait::async_trait;
use common::*;
use tactics_core::{Action, GameMode, GameState, OutcomeEvent, Team};
use tactics_runtime::{EndTurnProvider, Event, MatchEvent, MoveProvider, Runtime, RuntimeError, Topic};

/// Concedes on behalf of whoever is to move.
struct Surrender;

#[async_trait]
impl MoveProvider for Surrender {
    async fn provide_move(&self, state: &GameState) -> tactics_runtime::Result<Action> {
        Ok(Action::surrender(state.current_turn))
    }
}

#[tokio::test]
async fn build_requires_catalog_and_state() {
    let err = Runtime::builder().build().await.err().unwrap();
    assert!(matches!(err, RuntimeError::MissingCatalog));

    let fixture = fixture("askr", "nohr", GameMode::Duel);
    let err = Runtime::builder().catalog(fixture.catalog).build().await.err().unwrap();
    assert!(matches!(err, RuntimeError::MissingState));
}

#[tokio::test]
async fn step_needs_a_provider_for_the_team_to_move() {
    let runtime_fixture = fixture("askr", "nohr", GameMode::Duel);
    let mut runtime = runtime(runtime_fixture).await;

    let err = runtime.step().await.unwrap_err();
    assert!(matches!(err, RuntimeError::ProviderNotSet { team: Team::Blue }));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn passive_players_trade_turns() {
    let fixture = fixture("skirmish", "nohr", GameMode::Standard);
    let mut runtime = Runtime::builder()
        .config(runtime_config(fixture.config))
        .catalog(fixture.catalog)
        .initial_state(fixture.state)
        .provider(Team::Blue, EndTurnProvider)
        .provider(Team::Red, EndTurnProvider)
        .build()
        .await
        .unwrap();
    let mut events = runtime.subscribe(Topic::Match);

    assert_eq!(runtime.run(5).await.unwrap(), 5);

    let state = runtime.state();
    assert!(!state.swap_phase);
    assert!(!state.game_over);
    assert_eq!(state.turn_count, 3);
    assert_eq!(state.current_turn, Team::Blue);

    let mut executed = Vec::new();
    while let Ok(Event::Match(MatchEvent::ActionExecuted { team, action, .. })) = events.try_recv() {
        executed.push((team, action));
    }
    assert_eq!(
        executed,
        vec![
            (Team::Blue, Action::end_swap_phase()),
            (Team::Blue, Action::end_turn()),
            (Team::Red, Action::end_turn()),
            (Team::Blue, Action::end_turn()),
            (Team::Red, Action::end_turn()),
        ]
    );
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn finished_match_refuses_further_steps() {
    let fixture = fixture("askr", "nohr", GameMode::Duel);
    let mut runtime = runtime(fixture).await;
    runtime.set_provider(Team::Blue, Surrender);
    let mut events = runtime.subscribe(Topic::Match);

    let outcome = runtime.step().await.unwrap();
    assert!(outcome.ended_game());
    assert!(runtime.state().game_over);

    let Ok(Event::Match(MatchEvent::ActionExecuted { team: Team::Blue, .. })) = events.try_recv() else {
        panic!("expected the surrender to be published");
    };
    let Ok(Event::Match(MatchEvent::GameOver { winner })) = events.try_recv() else {
        panic!("expected the match result to be published");
    };
    assert_eq!(winner, Some(Team::Red));

    assert!(matches!(runtime.step().await, Err(RuntimeError::GameOver)));
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn search_players_finish_a_short_duel() {
    let mut fixture = fixture("askr", "nohr", GameMode::Duel);
    fixture.config.final_turn = 1;
    fixture.config.actions_per_turn = 2;
    let mut runtime = Runtime::builder()
        .config(runtime_config(fixture.config))
        .catalog(fixture.catalog)
        .initial_state(fixture.state)
        .search_provider(Team::Blue)
        .search_provider(Team::Red)
        .build()
        .await
        .unwrap();
    let mut events = runtime.subscribe(Topic::Match);

    let steps = runtime.run(50).await.unwrap();
    assert!(steps > 1);
    assert!(runtime.state().game_over);
    assert!(runtime.metrics().completed >= 1);

    let mut over = false;
    while let Ok(Event::Match(event)) = events.try_recv() {
        if let MatchEvent::ActionExecuted { outcome, .. } = &event {
            over |= outcome
                .events
                .iter()
                .any(|event| matches!(event, OutcomeEvent::GameOver { .. }));
        }
        over |= matches!(event, MatchEvent::GameOver { .. });
    }
    assert!(over);
    runtime.shutdown().await.unwrap();
}
