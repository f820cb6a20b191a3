//! Rendering systems: cargo and membrane sprites, the phagophore stroke, HUD
//! and the timeout flash.
//!
//! ## Layer Model
//!
//! | Layer            | Technology   | z    | Source                               |
//! |------------------|--------------|------|--------------------------------------|
//! | Background       | `Sprite`     | 0.0  | `images/full_background.png` if any  |
//! | Cargo            | `Sprite`     | 1.0  | image per kind, else coloured quad   |
//! | Autophagosome    | `Sprite`/`Mesh2d` | 1.5 | `images/AP.png`, else a disc     |
//! | Trapped cargo    | `Sprite`     | 1.75 | drawn over the membrane              |
//! | Release bursts   | `Mesh2d`     | 0.9  | [`crate::particles`]                 |
//! | Stroke + PAS     | Gizmos       | -    | gesture trace and anchor             |
//! | Score / attempts | Bevy UI      | -    | top-left / top-right                 |
//! | PAS label        | Bevy UI      | -    | beside the anchor                    |
//! | Timeout flash    | Bevy UI      | -    | full-screen red overlay              |
//!
//! The session is the single source of truth.  Every system here reads
//! [`ActiveSession`] and reconciles entities against it by id; nothing is
//! written back.
//!
//! ## System Responsibilities
//!
//! | System                 | Schedule            | Purpose                                  |
//! |------------------------|---------------------|------------------------------------------|
//! | `init_membrane_mesh`   | Startup             | Shared unit-disc mesh + material         |
//! | `setup_playfield`      | `OnEnter(Playing)`  | Background, HUD, PAS label, flash        |
//! | `sync_cargo_sprites`   | Update              | Spawn/move/despawn cargo sprites         |
//! | `sync_membrane`        | Update              | Spawn/move/despawn the AP                |
//! | `draw_phagophore`      | Update              | Dual-tone stroke ribbon and hit circle   |
//! | `update_hud`           | Update              | Score, attempts, PAS label position      |
//! | `update_flash_overlay` | Update              | Show the red flash while it lasts        |

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::assets::{build_asset_cache, AssetCache};
use crate::cargo::{Cargo, CargoId};
use crate::game::{ActiveSession, SessionEntity};
use crate::geometry::screen_to_world;
use crate::menu::GameState;
use crate::particles::circle_mesh;

const CARGO_Z: f32 = 1.0;
const MEMBRANE_Z: f32 = 1.5;
const TRAPPED_CARGO_Z: f32 = 1.75;

fn membrane_color() -> Color {
    Color::srgba(0.88, 0.95, 0.55, 0.45)
}
fn stroke_dark() -> Color {
    Color::srgb(0.16, 0.40, 0.18)
}
fn stroke_light() -> Color {
    Color::srgb(0.80, 0.95, 0.60)
}
fn pas_color() -> Color {
    Color::srgba(1.0, 1.0, 1.0, 0.55)
}
fn hud_color() -> Color {
    Color::srgb(0.95, 0.95, 0.90)
}
fn flash_color() -> Color {
    Color::srgba(0.85, 0.05, 0.05, 0.35)
}

// ── Resources & markers ───────────────────────────────────────────────────────

/// Unit disc used for the membrane when no image is available.
#[derive(Resource)]
pub struct MembraneMesh {
    pub mesh: Handle<Mesh>,
    pub material: Handle<ColorMaterial>,
}

/// Sprite drawing the cargo with this id.
#[derive(Component)]
pub struct CargoSprite(pub CargoId);

/// The autophagosome's membrane.
#[derive(Component)]
pub struct MembraneVisual;

#[derive(Component)]
pub struct HudScore;

#[derive(Component)]
pub struct HudAttempts;

/// "PAS" text that follows the gesture anchor.
#[derive(Component)]
pub struct PasLabel;

#[derive(Component)]
pub struct FlashOverlay;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_membrane_mesh)
            .add_systems(
                OnEnter(GameState::Playing),
                setup_playfield.after(build_asset_cache),
            )
            .add_systems(
                Update,
                (
                    sync_cargo_sprites,
                    sync_membrane,
                    draw_phagophore,
                    update_hud,
                    update_flash_overlay,
                )
                    .run_if(
                        in_state(GameState::Playing)
                            .and(resource_exists::<ActiveSession>)
                            .and(resource_exists::<AssetCache>),
                    ),
            );
    }
}

fn init_membrane_mesh(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.insert_resource(MembraneMesh {
        mesh: meshes.add(circle_mesh(1.0, 64)),
        material: materials.add(ColorMaterial::from_color(membrane_color())),
    });
}

// ── OnEnter(Playing) ──────────────────────────────────────────────────────────

/// Spawn the static parts of the play screen.
pub fn setup_playfield(
    mut commands: Commands,
    session: Res<ActiveSession>,
    cache: Res<AssetCache>,
) {
    let screen = session.0.config().screen;
    let font_size = (60.0 * session.0.config().scale.0).max(18.0);

    if let Some(image) = cache.background.clone() {
        commands.spawn((
            Sprite {
                image,
                custom_size: Some(screen),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 0.0),
            SessionEntity,
        ));
    }

    commands.spawn((
        Text::new("0"),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(hud_color()),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(15.0),
            top: Val::Px(0.0),
            ..default()
        },
        HudScore,
        SessionEntity,
    ));

    commands.spawn((
        Text::new("0"),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(hud_color()),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(40.0),
            top: Val::Px(0.0),
            ..default()
        },
        HudAttempts,
        SessionEntity,
    ));

    commands.spawn((
        Text::new("PAS"),
        TextFont {
            font_size: (font_size / 2.0).max(12.0),
            ..default()
        },
        TextColor(hud_color()),
        Node {
            position_type: PositionType::Absolute,
            ..default()
        },
        Visibility::Hidden,
        PasLabel,
        SessionEntity,
    ));

    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            ..default()
        },
        BackgroundColor(flash_color()),
        ZIndex(200),
        Visibility::Hidden,
        FlashOverlay,
        SessionEntity,
    ));
}

// ── Update: sprites ───────────────────────────────────────────────────────────

/// Trapped cargo sits above its autophagosome's membrane.
fn cargo_z(cargo: &Cargo) -> f32 {
    if cargo.trapped {
        TRAPPED_CARGO_Z
    } else {
        CARGO_Z
    }
}

fn cargo_transform(cargo: &Cargo, screen: Vec2) -> Transform {
    let world = screen_to_world(cargo.center, screen);
    // Screen angles turn counter-clockwise, same as Bevy's +z rotation.
    Transform::from_translation(world.extend(cargo_z(cargo)))
        .with_rotation(Quat::from_rotation_z((cargo.frame() as f32).to_radians()))
}

fn cargo_sprite(cargo: &Cargo, cache: &AssetCache) -> Sprite {
    match cache.cargo_image(cargo.kind) {
        Some(image) => Sprite {
            image,
            custom_size: Some(cargo.footprint),
            ..default()
        },
        None => {
            let [r, g, b] = cargo.kind.spec().color;
            Sprite::from_color(Color::srgb(r, g, b), cargo.footprint)
        }
    }
}

/// Reconcile one sprite per cargo, free or trapped.
pub fn sync_cargo_sprites(
    mut commands: Commands,
    session: Res<ActiveSession>,
    cache: Res<AssetCache>,
    mut query: Query<(Entity, &CargoSprite, &mut Transform)>,
) {
    let session = &session.0;
    let screen = session.config().screen;
    let trapped = session
        .autophagosome()
        .map(|ap| ap.contents())
        .unwrap_or_default();
    let live: HashMap<CargoId, &Cargo> = session
        .cargo()
        .iter()
        .chain(trapped.iter())
        .map(|c| (c.id, c))
        .collect();

    let mut drawn = HashSet::with_capacity(live.len());
    for (entity, sprite, mut transform) in query.iter_mut() {
        match live.get(&sprite.0) {
            Some(cargo) => {
                *transform = cargo_transform(cargo, screen);
                drawn.insert(sprite.0);
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for (id, cargo) in &live {
        if drawn.contains(id) {
            continue;
        }
        commands.spawn((
            cargo_sprite(cargo, &cache),
            cargo_transform(cargo, screen),
            CargoSprite(*id),
            SessionEntity,
        ));
    }
}

/// Keep a membrane entity alive exactly while the session has an AP.
pub fn sync_membrane(
    mut commands: Commands,
    session: Res<ActiveSession>,
    cache: Res<AssetCache>,
    membrane: Res<MembraneMesh>,
    mut query: Query<(Entity, &mut Transform, Option<&mut Sprite>), With<MembraneVisual>>,
) {
    let screen = session.0.config().screen;
    let Some(ap) = session.0.autophagosome() else {
        for (entity, ..) in query.iter() {
            commands.entity(entity).despawn();
        }
        return;
    };
    let diameter = ap.sprite_diameter();
    let translation = screen_to_world(ap.center, screen).extend(MEMBRANE_Z);

    if let Some((_, mut transform, sprite)) = query.iter_mut().next() {
        transform.translation = translation;
        match sprite {
            Some(mut sprite) => sprite.custom_size = Some(Vec2::splat(diameter)),
            None => transform.scale = Vec3::splat(diameter / 2.0),
        }
        return;
    }

    match cache.membrane.clone() {
        Some(image) => {
            commands.spawn((
                Sprite {
                    image,
                    custom_size: Some(Vec2::splat(diameter)),
                    ..default()
                },
                Transform::from_translation(translation),
                MembraneVisual,
                SessionEntity,
            ));
        }
        None => {
            commands.spawn((
                Mesh2d(membrane.mesh.clone()),
                MeshMaterial2d(membrane.material.clone()),
                Transform::from_translation(translation).with_scale(Vec3::splat(diameter / 2.0)),
                MembraneVisual,
                SessionEntity,
            ));
        }
    }
}

// ── Update: phagophore ────────────────────────────────────────────────────────

/// Draw the in-progress loop as a dark ribbon with a pale core, plus the
/// hit circle around the PAS.
pub fn draw_phagophore(session: Res<ActiveSession>, mut gizmos: Gizmos) {
    let gesture = session.0.gesture();
    let Some(anchor) = gesture.anchor() else {
        return;
    };
    let screen = session.0.config().screen;
    let width = (6.0 * session.0.config().scale.0).max(2.0);

    gizmos.circle_2d(
        screen_to_world(anchor, screen),
        gesture.hit_radius(),
        pas_color(),
    );

    for segment in gesture.trace().windows(2) {
        let a = screen_to_world(segment[0], screen);
        let b = screen_to_world(segment[1], screen);
        let normal = (b - a).perp().normalize_or_zero() * width / 2.0;
        gizmos.line_2d(a + normal, b + normal, stroke_dark());
        gizmos.line_2d(a - normal, b - normal, stroke_dark());
        gizmos.line_2d(a, b, stroke_light());
    }
}

// ── Update: HUD ───────────────────────────────────────────────────────────────

#[allow(clippy::type_complexity)]
pub fn update_hud(
    session: Res<ActiveSession>,
    mut score: Query<&mut Text, (With<HudScore>, Without<HudAttempts>)>,
    mut attempts: Query<&mut Text, (With<HudAttempts>, Without<HudScore>)>,
    mut pas: Query<(&mut Node, &mut Visibility), With<PasLabel>>,
) {
    if !session.is_changed() {
        return;
    }
    let session = &session.0;

    for mut text in score.iter_mut() {
        text.0 = session.score().to_string();
    }
    for mut text in attempts.iter_mut() {
        text.0 = session.attempts().to_string();
    }

    let scale = session.config().scale.0;
    for (mut node, mut visibility) in pas.iter_mut() {
        match session.gesture().anchor() {
            Some(anchor) => {
                node.left = Val::Px(anchor.x - 32.0 * scale);
                node.top = Val::Px(anchor.y - 25.0 * scale);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

pub fn update_flash_overlay(
    session: Res<ActiveSession>,
    mut query: Query<&mut Visibility, With<FlashOverlay>>,
) {
    let target = if session.0.is_flashing() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in query.iter_mut() {
        if *visibility != target {
            *visibility = target;
        }
    }
}
