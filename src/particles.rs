//! Release bursts: a short puff of pale particles where an autophagosome
//! leaves the cell.
//!
//! ## Design
//!
//! The particles themselves are plain [`Particle`] records owned by the
//! [`crate::session::Session`] and stepped once per tick by
//! [`update_particles`], so a headless session produces exactly the same
//! bursts as a windowed one.  The Bevy side only mirrors them:
//!
//! | System                  | Schedule | Purpose                                       |
//! |-------------------------|----------|-----------------------------------------------|
//! | `init_particle_mesh`    | Startup  | Create the shared circle mesh                 |
//! | `sync_particle_sprites` | Update   | Spawn, move, fade and despawn particle meshes |
//!
//! A single shared circle-mesh [`ParticleMesh`] resource is created at plugin
//! startup to avoid per-particle mesh allocation.  Each particle receives its
//! own unique [`ColorMaterial`] so its alpha can be faded individually.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::Rng;

use crate::constants::{RELEASE_PARTICLES_MAX, RELEASE_PARTICLES_PER_ITEM};
use crate::game::{ActiveSession, SessionEntity};
use crate::geometry::screen_to_world;
use crate::menu::GameState;

// ── Particle state ────────────────────────────────────────────────────────────

/// One short-lived particle, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Unique within a session; the renderer keys its meshes on it.
    pub id: u64,
    pub position: Vec2,
    /// Pixels per tick.
    pub velocity: Vec2,
    /// Ticks alive so far.
    pub age: u32,
    /// Total lifetime in ticks; removed once `age >= lifetime`.
    pub lifetime: u32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Particle {
    /// Quadratic ease-out: bright at birth, rapid fade at the end.
    #[inline]
    pub fn alpha(&self) -> f32 {
        let t = (self.age as f32 / self.lifetime.max(1) as f32).min(1.0);
        (1.0 - t).powi(2)
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Number of particles in the burst for an AP that carried `trapped` items.
#[inline]
pub fn release_burst_size(trapped: usize) -> usize {
    (trapped * RELEASE_PARTICLES_PER_ITEM).min(RELEASE_PARTICLES_MAX)
}

/// Emit a release burst at `center`.
///
/// `ap_velocity` is partly inherited so the burst trails after the membrane
/// instead of hanging where it crossed the edge.
pub fn spawn_release_particles<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    next_id: &mut u64,
    center: Vec2,
    ap_velocity: Vec2,
    trapped: usize,
    rng: &mut R,
) {
    let count = release_burst_size(trapped);
    particles.reserve(count);

    for _ in 0..count {
        let angle = rng.gen_range(0.0_f32..std::f32::consts::TAU);
        let speed = rng.gen_range(1.0_f32..4.0_f32);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed + ap_velocity * 0.3;

        // Pale yellow-green, like the membrane sprite.
        let r = rng.gen_range(0.80_f32..0.95_f32);
        let g = rng.gen_range(0.90_f32..1.0_f32);
        let b = rng.gen_range(0.45_f32..0.65_f32);

        let offset = Vec2::new(rng.gen_range(-6.0..6.0), rng.gen_range(-6.0..6.0));

        particles.push(Particle {
            id: *next_id,
            position: center + offset,
            velocity,
            age: 0,
            lifetime: rng.gen_range(20..=45),
            r,
            g,
            b,
        });
        *next_id += 1;
    }
}

/// Age and move every particle by one tick, dropping the expired ones.
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.age += 1;
        particle.position += particle.velocity;
    }
    particles.retain(|p| !p.is_expired());
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Shared circle mesh used by all particle entities (created once at startup).
#[derive(Resource)]
pub struct ParticleMesh(pub Handle<Mesh>);

/// Links a mesh entity to the session particle it draws.
#[derive(Component)]
pub struct ParticleSprite {
    pub id: u64,
    material: Handle<ColorMaterial>,
}

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_particle_mesh).add_systems(
            Update,
            sync_particle_sprites
                .run_if(in_state(GameState::Playing).and(resource_exists::<ActiveSession>)),
        );
    }
}

fn init_particle_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(circle_mesh(3.0, 6));
    commands.insert_resource(ParticleMesh(handle));
}

/// Mirror the session's particles: spawn meshes for new ones, move and fade
/// the survivors, despawn the rest.
pub fn sync_particle_sprites(
    mut commands: Commands,
    session: Res<ActiveSession>,
    particle_mesh: Res<ParticleMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Transform, &ParticleSprite)>,
) {
    let screen = session.0.config().screen;
    let live: HashMap<u64, &Particle> = session.0.particles().iter().map(|p| (p.id, p)).collect();
    let mut drawn = Vec::with_capacity(live.len());

    for (entity, mut transform, sprite) in query.iter_mut() {
        let Some(particle) = live.get(&sprite.id) else {
            commands.entity(entity).despawn();
            continue;
        };
        drawn.push(sprite.id);
        let world = screen_to_world(particle.position, screen);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
        if let Some(mat) = materials.get_mut(&sprite.material) {
            mat.color = Color::srgba(particle.r, particle.g, particle.b, particle.alpha());
        }
    }

    for particle in session.0.particles() {
        if drawn.contains(&particle.id) {
            continue;
        }
        let material = materials.add(ColorMaterial::from_color(Color::srgba(
            particle.r,
            particle.g,
            particle.b,
            particle.alpha(),
        )));
        commands.spawn((
            Mesh2d(particle_mesh.0.clone()),
            MeshMaterial2d(material.clone()),
            Transform::from_translation(screen_to_world(particle.position, screen).extend(0.9)),
            ParticleSprite {
                id: particle.id,
                material,
            },
            SessionEntity,
        ));
    }
}

/// Build a filled circle mesh approximated by an `n`-sided regular polygon.
///
/// Uses a triangle fan from the centre: `(0, i, i+1 mod n)`.
pub(crate) fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides.max(3) as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn burst(trapped: usize) -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut particles = Vec::new();
        let mut next_id = 0;
        spawn_release_particles(
            &mut particles,
            &mut next_id,
            Vec2::new(500.0, 500.0),
            Vec2::new(20.0, 0.0),
            trapped,
            &mut rng,
        );
        particles
    }

    #[test]
    fn burst_size_grows_with_cargo_and_is_capped() {
        assert_eq!(release_burst_size(0), 0);
        assert_eq!(release_burst_size(1), 6);
        assert_eq!(release_burst_size(5), 30);
        assert_eq!(release_burst_size(50), 48);
        assert_eq!(burst(3).len(), 18);
    }

    #[test]
    fn burst_ids_are_unique_and_lifetimes_in_range() {
        let particles = burst(8);
        for (i, p) in particles.iter().enumerate() {
            assert_eq!(p.id, i as u64);
            assert!((20..=45).contains(&p.lifetime));
            assert_eq!(p.age, 0);
        }
    }

    #[test]
    fn burst_inherits_part_of_the_ap_velocity() {
        let particles = burst(8);
        let mean = particles.iter().map(|p| p.velocity.x).sum::<f32>() / particles.len() as f32;
        // 30 % of 20 px/tick, give or take the random spray.
        assert!(mean > 2.0 && mean < 10.0, "mean x velocity {mean}");
    }

    #[test]
    fn alpha_fades_quadratically() {
        let mut p = burst(1).remove(0);
        p.lifetime = 20;
        assert_eq!(p.alpha(), 1.0);
        p.age = 10;
        assert!((p.alpha() - 0.25).abs() < 1e-6);
        p.age = 20;
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn particles_expire_after_their_lifetime() {
        let mut particles = burst(2);
        for _ in 0..45 {
            update_particles(&mut particles);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn update_moves_by_velocity() {
        let mut particles = burst(1);
        let before = particles[0].clone();
        update_particles(&mut particles);
        assert_eq!(particles[0].position, before.position + before.velocity);
        assert_eq!(particles[0].age, 1);
    }
}
