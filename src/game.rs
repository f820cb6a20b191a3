//! Gameplay plugin: owns the running [`Session`] and feeds it input.
//!
//! ## Systems (registered by `GamePlugin`)
//!
//! | System              | Schedule                        | Purpose                               |
//! |---------------------|---------------------------------|---------------------------------------|
//! | `start_session`     | `OnEnter(Playing)`              | Build `SessionConfig`, spawn cargo    |
//! | `build_asset_cache` | `OnEnter(Playing)`              | Resolve images for this session       |
//! | `sample_input`      | `Update / in Playing`           | Latch mouse and keys into `PendingInput` |
//! | `tick_session`      | `FixedUpdate / in Playing`      | Advance the session one 60 Hz tick    |
//! | `end_session`       | `OnExit(Playing)`               | Drop the session and its entities     |
//!
//! The session is advanced only from `FixedUpdate`, so gameplay speed is
//! independent of the display's refresh rate.  Input is sampled every frame
//! and consumed by the next fixed tick.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::assets::{build_asset_cache, AssetCache};
use crate::config::{SessionConfig, Tuning};
use crate::menu::{GameState, MenuEvent, MenuFlow};
use crate::session::{FrameInput, Session, SessionEvent};

/// The session being played.  Present only while in [`GameState::Playing`].
#[derive(Resource)]
pub struct ActiveSession(pub Session);

/// Input gathered since the last fixed tick.
#[derive(Resource, Debug, Default)]
pub struct PendingInput(pub FrameInput);

/// Tags every entity that belongs to the current session; all of them are
/// despawned on `OnExit(Playing)`.
#[derive(Component)]
pub struct SessionEntity;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingInput>()
            .add_systems(
                OnEnter(GameState::Playing),
                (start_session, build_asset_cache).chain(),
            )
            .add_systems(OnExit(GameState::Playing), end_session)
            .add_systems(
                Update,
                sample_input.run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                FixedUpdate,
                tick_session
                    .run_if(in_state(GameState::Playing).and(resource_exists::<ActiveSession>)),
            );
    }
}

/// Create the session for the difficulty picked on the intro screen.
pub fn start_session(
    mut commands: Commands,
    tuning: Res<Tuning>,
    flow: Res<MenuFlow>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut fixed: ResMut<Time<Fixed>>,
    mut input: ResMut<PendingInput>,
) {
    let width = windows
        .single()
        .map(|window| window.width())
        .unwrap_or(tuning.window_width as f32);
    let config = SessionConfig::new(width, flow.difficulty, &tuning);
    fixed.set_timestep_hz(f64::from(config.tick_rate));
    *input = PendingInput::default();

    let seed: u64 = rand::thread_rng().gen();
    debug!("Session seed {seed}");
    commands.insert_resource(ActiveSession(Session::new(config, seed)));
}

/// Latch this frame's input for the next fixed tick.
///
/// Pointer and button state are overwritten every frame; the forfeit key is
/// sticky until a tick consumes it.  A fresh sample clears `repeat`.
pub fn sample_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut input: ResMut<PendingInput>,
) {
    input.0.pressed = mouse.pressed(MouseButton::Left);
    input.0.repeat = false;
    if let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) {
        input.0.pointer = cursor;
    }
    if keys.just_pressed(KeyCode::KeyQ) {
        input.0.forfeit = true;
    }
}

/// Advance the session one tick and hand a finished session to the menu.
///
/// `FixedUpdate` may run several times per frame; every tick after the first
/// sees the input marked as a repeat.
pub fn tick_session(
    mut session: ResMut<ActiveSession>,
    mut input: ResMut<PendingInput>,
    mut flow: ResMut<MenuFlow>,
) {
    let report = session.0.tick(&input.0);
    input.0.forfeit = false;
    input.0.repeat = true;

    for event in &report.events {
        log_event(event);
        if let SessionEvent::Finished { score } = event {
            *flow = flow.advance(MenuEvent::SessionFinished { score: *score });
        }
    }
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::PhagophoreStarted { anchor } => {
            debug!("Phagophore started at ({:.0}, {:.0})", anchor.x, anchor.y);
        }
        SessionEvent::Missed { penalty } => info!("Missed the PAS: -{penalty}"),
        SessionEvent::TimeoutPenalty { pill } => info!("Phagophore timed out: pill {:?}", pill),
        SessionEvent::Discarded { area } => debug!("Loop too small ({area:.0} px²)"),
        SessionEvent::ApFormed { trapped, .. } => {
            info!("Autophagosome formed around {} cargo", trapped.len());
        }
        SessionEvent::ApReleased {
            removed,
            score_delta,
        } => info!("Autophagosome released {} cargo: {:+}", removed.len(), score_delta),
        SessionEvent::Fission { parent, .. } => debug!("Mitochondrion {:?} divided", parent),
        SessionEvent::Forfeited => info!("Session forfeited"),
        SessionEvent::Finished { score } => info!("Final score {score}"),
    }
}

/// Drop the session, its asset cache and everything drawn for it.
pub fn end_session(mut commands: Commands, query: Query<Entity, With<SessionEntity>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<ActiveSession>();
    commands.remove_resource::<AssetCache>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::state::app::StatesPlugin;

    use crate::config::Difficulty;

    fn app_with_session(input: FrameInput) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.insert_state(GameState::Playing);
        app.insert_resource(MenuFlow {
            screen: GameState::Playing,
            ..Default::default()
        });
        app.insert_resource(PendingInput(input));
        let config = SessionConfig::reference(Difficulty::Easy);
        app.insert_resource(ActiveSession(Session::new(config, 5)));
        app.add_systems(Update, tick_session);
        app
    }

    #[test]
    fn tick_consumes_forfeit_and_finishes_the_round() {
        let mut app = app_with_session(FrameInput {
            forfeit: true,
            ..Default::default()
        });
        app.update();

        let world = app.world();
        assert!(!world.resource::<PendingInput>().0.forfeit);
        assert!(world.resource::<ActiveSession>().0.is_finished());
        let flow = world.resource::<MenuFlow>();
        assert_eq!(flow.screen, GameState::GameOver);
        assert_eq!(flow.final_score, Some(0));
    }

    #[test]
    fn second_tick_in_a_frame_sees_a_repeat() {
        let mut app = app_with_session(FrameInput {
            pointer: Vec2::new(10.0, 10.0),
            ..Default::default()
        });
        assert!(!app.world().resource::<PendingInput>().0.repeat);
        app.world_mut().run_system_once(tick_session).unwrap();
        assert!(app.world().resource::<PendingInput>().0.repeat);
        app.world_mut().run_system_once(tick_session).unwrap();

        let world = app.world();
        assert!(world.resource::<PendingInput>().0.repeat);
        assert_eq!(world.resource::<ActiveSession>().0.ticks(), 2);
    }

    #[test]
    fn ordinary_tick_keeps_playing() {
        let mut app = app_with_session(FrameInput {
            pointer: Vec2::new(10.0, 10.0),
            ..Default::default()
        });
        app.update();
        app.update();

        let world = app.world();
        assert_eq!(world.resource::<ActiveSession>().0.ticks(), 2);
        assert_eq!(world.resource::<MenuFlow>().screen, GameState::Playing);
    }
}
