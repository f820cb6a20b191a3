use bevy::prelude::*;

/// Cytoplasm tint shown behind the cargo when no background image exists.
pub fn background_color() -> Color {
    Color::srgb(0.70, 0.78, 0.74)
}

/// Setup camera for 2D rendering.
///
/// The default orthographic projection maps one world unit to one logical
/// pixel, which is what [`crate::geometry::screen_to_world`] assumes.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    eprintln!("[SETUP] Camera spawned");
}
