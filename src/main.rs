use bevy::prelude::*;
use bevy::window::WindowResolution;

use gameophagy::config::{self, Tuning};
use gameophagy::constants::{DEFAULT_WINDOW_WIDTH, TICK_RATE};
use gameophagy::geometry::screen_height;
use gameophagy::{game, graphics, menu, particles, rendering};

fn main() {
    let height = screen_height(DEFAULT_WINDOW_WIDTH as f32) as u32;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Gameophagy".into(),
                resolution: WindowResolution::new(DEFAULT_WINDOW_WIDTH, height),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(graphics::background_color()))
        // Compiled defaults; load_tuning overwrites them from
        // assets/tuning.toml (if present) in the Startup schedule.
        .insert_resource(Tuning::default())
        .insert_resource(Time::<Fixed>::from_hz(f64::from(TICK_RATE)))
        // MenuPlugin registers GameState, so it goes before anything that
        // runs under in_state(..).
        .add_plugins(menu::MenuPlugin)
        .add_plugins((
            game::GamePlugin,
            rendering::RenderingPlugin,
            particles::ParticlesPlugin,
        ))
        .add_systems(
            Startup,
            (
                config::load_tuning,
                config::apply_window_size.after(config::load_tuning),
                graphics::setup_camera.after(config::load_tuning),
            ),
        )
        .run();
}
