//! Headless tests for the [`GameState`] machine and its [`MenuFlow`] mirror.
//!
//! These tests use [`MinimalPlugins`] (no window, no renderer) so they run
//! fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `Intro`.
//! 2. A flow change is mirrored into `GameState` on the next frame.
//! 3. A whole intro → playing → game over → intro round.
//! 4. A quit request ends the app from any screen.
//! 5. `insert_state` can force-start directly in `Playing`.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use gameophagy::config::Difficulty;
use gameophagy::menu::{sync_game_state, GameState, MenuEvent, MenuFlow};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with the state, the flow resource and the
/// system that mirrors one into the other.
fn app_with_flow() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app.init_resource::<MenuFlow>();
    app.add_systems(Update, sync_game_state);
    app
}

fn send(app: &mut App, event: MenuEvent) {
    let mut flow = app.world_mut().resource_mut::<MenuFlow>();
    *flow = flow.advance(event);
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_state_is_intro() {
    let mut app = app_with_flow();
    app.update();
    assert_eq!(state(&app), GameState::Intro, "initial state must be Intro");
}

/// `sync_game_state` queues the transition in `Update`; `StateTransition`
/// applies it on the following frame.
#[test]
fn play_is_mirrored_on_the_next_frame() {
    let mut app = app_with_flow();
    app.update();

    send(&mut app, MenuEvent::Play);
    app.update();
    app.update();

    assert_eq!(state(&app), GameState::Playing);
}

#[test]
fn full_round_returns_to_intro_with_same_difficulty() {
    let mut app = app_with_flow();
    app.update();

    send(&mut app, MenuEvent::SelectDifficulty(Difficulty::Hard));
    send(&mut app, MenuEvent::Play);
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::Playing);

    send(&mut app, MenuEvent::SessionFinished { score: 700 });
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::GameOver);
    assert_eq!(app.world().resource::<MenuFlow>().final_score, Some(700));

    send(&mut app, MenuEvent::PlayAgain);
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::Intro);
    assert_eq!(
        app.world().resource::<MenuFlow>().difficulty,
        Difficulty::Hard
    );
}

/// The state stays put across frames when the flow does not change.
#[test]
fn state_is_stable_without_new_events() {
    let mut app = app_with_flow();
    app.update();
    send(&mut app, MenuEvent::Play);
    for _ in 0..6 {
        app.update();
    }
    assert_eq!(state(&app), GameState::Playing);
}

#[test]
fn quit_request_exits_the_app() {
    let mut app = app_with_flow();
    app.update();
    assert!(app.should_exit().is_none());

    send(&mut app, MenuEvent::Quit);
    app.update();

    assert_eq!(app.should_exit(), Some(AppExit::Success));
}

/// `insert_state` can force the initial state to `Playing` directly.
#[test]
fn insert_state_starts_in_playing() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_state(GameState::Playing);
    app.update();

    assert_eq!(state(&app), GameState::Playing);
}
