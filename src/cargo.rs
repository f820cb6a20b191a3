//! Cargo: the organelles and molecules drifting around the cell.
//!
//! Every cargo is the same [`Cargo`] record; what differs between a
//! mitochondrion and a ribosome is the [`CargoKind`] tag and the row of
//! [`CargoSpec`] constants it selects.
//!
//! Cargo physics is deliberately arcade-like rather than physical: a random
//! walk on an integer velocity lattice, hard per-axis speed caps, mirror
//! bounces off the screen edges, and a spin that changes on every bounce.

use bevy::math::{Rect, Vec2};
use rand::Rng;

use crate::config::SessionConfig;
use crate::geometry::rotated_extent;

/// Stable identifier used by the renderer to match sprites across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CargoId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CargoKind {
    Mitochondrion,
    Ribosome,
    Rna,
    /// Penalty cargo dropped when a phagophore times out away from its PAS.
    Pill,
}

/// Per-kind constants, nominal (1920 px wide) units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CargoSpec {
    pub footprint: Vec2,
    pub speed_cap: Vec2,
    pub base_score: i64,
    /// Fraction of the rotation padding ignored by wall collisions, so the
    /// transparent corners of a rotated frame may overlap the edge.
    pub rotation_inset: f32,
    /// Whether the session must clear this kind before it ends.
    pub counts_as_good: bool,
    /// Placeholder tint used when no image is available.
    pub color: [f32; 3],
    /// Image path relative to the `assets/` directory.
    pub image: &'static str,
}

const SPECS: [CargoSpec; 4] = [
    CargoSpec {
        footprint: Vec2::new(300.0, 165.0),
        speed_cap: Vec2::new(7.0, 7.0),
        base_score: 100,
        rotation_inset: 0.5,
        counts_as_good: true,
        color: [0.86, 0.42, 0.30],
        image: "images/mito.png",
    },
    CargoSpec {
        footprint: Vec2::new(90.0, 90.0),
        speed_cap: Vec2::new(15.0, 15.0),
        base_score: 50,
        rotation_inset: 0.0,
        counts_as_good: true,
        color: [0.45, 0.32, 0.70],
        image: "images/ribo.png",
    },
    CargoSpec {
        footprint: Vec2::new(75.0, 300.0),
        speed_cap: Vec2::new(2.0, 12.0),
        base_score: 150,
        rotation_inset: 0.5,
        counts_as_good: true,
        color: [0.25, 0.55, 0.85],
        image: "images/rna.png",
    },
    CargoSpec {
        footprint: Vec2::new(150.0, 75.0),
        speed_cap: Vec2::new(2.0, 2.0),
        base_score: -300,
        rotation_inset: 0.0,
        counts_as_good: false,
        color: [0.95, 0.20, 0.25],
        image: "images/pill.png",
    },
];

impl CargoKind {
    pub const ALL: [CargoKind; 4] = [
        CargoKind::Mitochondrion,
        CargoKind::Ribosome,
        CargoKind::Rna,
        CargoKind::Pill,
    ];

    #[inline]
    pub fn spec(self) -> &'static CargoSpec {
        match self {
            CargoKind::Mitochondrion => &SPECS[0],
            CargoKind::Ribosome => &SPECS[1],
            CargoKind::Rna => &SPECS[2],
            CargoKind::Pill => &SPECS[3],
        }
    }
}

/// Optional overrides for [`Cargo::spawn`]; anything left `None` is rolled
/// or taken from the kind's spec.
#[derive(Debug, Clone, Copy)]
pub struct CargoOverrides {
    /// Unrotated size in screen pixels (already scaled).
    pub footprint: Option<Vec2>,
    /// Unscaled score value.
    pub score: Option<i64>,
    /// Multiply the score by the difficulty's score scalar.
    pub scale_score: bool,
    pub center: Option<Vec2>,
    pub velocity: Option<Vec2>,
}

impl Default for CargoOverrides {
    fn default() -> Self {
        Self {
            footprint: None,
            score: None,
            scale_score: true,
            center: None,
            velocity: None,
        }
    }
}

/// A single piece of cargo.
#[derive(Debug, Clone, PartialEq)]
pub struct Cargo {
    pub id: CargoId,
    pub kind: CargoKind,
    /// Centre of the sprite in screen space.
    pub center: Vec2,
    /// Pixels per tick.
    pub velocity: Vec2,
    /// Per-axis absolute velocity limit.
    pub speed_cap: Vec2,
    /// Degrees, always in `[0, 360)`.
    pub angle: f32,
    /// Degrees per tick.
    pub angular_rate: f32,
    /// Unrotated sprite size.
    pub footprint: Vec2,
    /// Axis-aligned size of the current rotated frame.
    occupied: Vec2,
    pub score_value: i64,
    /// Set once enclosed by an autophagosome; freezes independent motion.
    pub trapped: bool,
}

impl Cargo {
    /// Create a cargo of `kind`, rolling a random position and velocity
    /// unless overridden.
    pub fn spawn<R: Rng + ?Sized>(
        id: CargoId,
        kind: CargoKind,
        config: &SessionConfig,
        overrides: CargoOverrides,
        rng: &mut R,
    ) -> Self {
        let spec = kind.spec();
        let footprint = overrides.footprint.unwrap_or_else(|| {
            Vec2::new(
                config.scale.length(spec.footprint.x),
                config.scale.length(spec.footprint.y),
            )
        });
        let speed_cap = Vec2::new(
            config.speed_cap(spec.speed_cap.x),
            config.speed_cap(spec.speed_cap.y),
        );
        let center = overrides.center.unwrap_or_else(|| {
            Vec2::new(
                rng.gen_range(0.0..config.screen.x.max(1.0)),
                rng.gen_range(0.0..config.screen.y.max(1.0)),
            )
        });
        let velocity = overrides
            .velocity
            .unwrap_or_else(|| random_velocity(speed_cap, rng));
        let base = overrides.score.unwrap_or(spec.base_score);
        let score_value = if overrides.scale_score {
            base * config.profile.score_scalar
        } else {
            base
        };

        Self {
            id,
            kind,
            center,
            velocity,
            speed_cap,
            angle: 0.0,
            angular_rate: random_angular_rate(config.max_angular_rate, rng),
            footprint,
            occupied: footprint,
            score_value,
            trapped: false,
        }
    }

    /// Advance one tick of free-drifting motion.  Trapped cargo is left
    /// untouched; it only moves with its autophagosome.
    pub fn update<R: Rng + ?Sized>(&mut self, config: &SessionConfig, rng: &mut R) {
        if self.trapped {
            return;
        }

        // Random walk, clamped after the jitter is applied.
        let jitter = config.velocity_jitter;
        if jitter > 0 {
            self.velocity.x += rng.gen_range(-jitter..=jitter) as f32;
            self.velocity.y += rng.gen_range(-jitter..=jitter) as f32;
        }
        self.velocity = self.velocity.clamp(-self.speed_cap, self.speed_cap);

        self.center += self.velocity;

        if self.bounce(config.screen) {
            self.angular_rate = random_angular_rate(config.max_angular_rate, rng);
        }

        self.angle = (self.angle + self.angular_rate).rem_euclid(360.0);
        // Centre stays put; only the occupied box follows the new frame.
        self.occupied = rotated_extent(self.footprint, self.frame() as f32);
    }

    /// Keep the collision box on screen, mirroring velocity on contact.
    /// Returns `true` if any wall was hit.
    fn bounce(&mut self, screen: Vec2) -> bool {
        let half = self.collision_half_extent();
        let mut hit = false;

        if self.center.x - half.x < 0.0 {
            self.center.x = half.x;
            self.velocity.x = -self.velocity.x;
            hit = true;
        } else if self.center.x + half.x > screen.x {
            self.center.x = screen.x - half.x;
            self.velocity.x = -self.velocity.x;
            hit = true;
        }

        if self.center.y - half.y < 0.0 {
            self.center.y = half.y;
            self.velocity.y = -self.velocity.y;
            hit = true;
        } else if self.center.y + half.y > screen.y {
            self.center.y = screen.y - half.y;
            self.velocity.y = -self.velocity.y;
            hit = true;
        }

        hit
    }

    fn collision_half_extent(&self) -> Vec2 {
        let padding = (self.occupied - self.footprint).max(Vec2::ZERO);
        (self.occupied - padding * self.kind.spec().rotation_inset) / 2.0
    }

    /// Index of the pre-rotated sprite frame (one per degree).
    #[inline]
    pub fn frame(&self) -> u16 {
        (self.angle.round() as u16) % 360
    }

    /// Size of the current rotated frame.
    #[inline]
    pub fn occupied(&self) -> Vec2 {
        self.occupied
    }

    /// Axis-aligned bounding box of the current frame.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, self.occupied)
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    #[inline]
    pub fn is_good(&self) -> bool {
        self.kind.spec().counts_as_good
    }
}

/// Integer velocity uniformly in `[-cap, cap]` per axis, re-rolled until it
/// is not the zero vector (unless the cap itself is zero).
pub fn random_velocity<R: Rng + ?Sized>(cap: Vec2, rng: &mut R) -> Vec2 {
    let cap_x = cap.x.max(0.0) as i32;
    let cap_y = cap.y.max(0.0) as i32;
    if cap_x == 0 && cap_y == 0 {
        return Vec2::ZERO;
    }
    loop {
        let dx = rng.gen_range(-cap_x..=cap_x);
        let dy = rng.gen_range(-cap_y..=cap_y);
        if dx != 0 || dy != 0 {
            return Vec2::new(dx as f32, dy as f32);
        }
    }
}

/// Non-zero spin in `{±1, …, ±max}` degrees per tick.
pub fn random_angular_rate<R: Rng + ?Sized>(max: i32, rng: &mut R) -> f32 {
    let magnitude = rng.gen_range(1..=max.max(1));
    if rng.gen_bool(0.5) {
        magnitude as f32
    } else {
        -(magnitude as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> SessionConfig {
        SessionConfig::reference(Difficulty::Medium)
    }

    fn still(kind: CargoKind, center: Vec2, rng: &mut StdRng) -> Cargo {
        Cargo::spawn(
            CargoId(1),
            kind,
            &config(),
            CargoOverrides {
                center: Some(center),
                velocity: Some(Vec2::ZERO),
                ..Default::default()
            },
            rng,
        )
    }

    #[test]
    fn spawned_cargo_is_always_moving() {
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..500 {
            let cargo = Cargo::spawn(
                CargoId(i),
                CargoKind::Pill,
                &config(),
                CargoOverrides::default(),
                &mut rng,
            );
            assert_ne!(cargo.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn random_velocity_with_zero_cap_returns_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_velocity(Vec2::ZERO, &mut rng), Vec2::ZERO);
    }

    #[test]
    fn score_is_scaled_by_difficulty_unless_exempt() {
        let mut rng = StdRng::seed_from_u64(2);
        let hard = SessionConfig::reference(Difficulty::Hard);
        let scaled = Cargo::spawn(
            CargoId(1),
            CargoKind::Rna,
            &hard,
            CargoOverrides::default(),
            &mut rng,
        );
        assert_eq!(scaled.score_value, 450);

        let exempt = Cargo::spawn(
            CargoId(2),
            CargoKind::Mitochondrion,
            &hard,
            CargoOverrides {
                score: Some(150),
                scale_score: false,
                ..Default::default()
            },
            &mut rng,
        );
        assert_eq!(exempt.score_value, 150);
    }

    #[test]
    fn velocity_never_exceeds_cap() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = config();
        let mut cargo = Cargo::spawn(
            CargoId(1),
            CargoKind::Rna,
            &config,
            CargoOverrides::default(),
            &mut rng,
        );
        for _ in 0..1_000 {
            cargo.update(&config, &mut rng);
            assert!(cargo.velocity.x.abs() <= cargo.speed_cap.x);
            assert!(cargo.velocity.y.abs() <= cargo.speed_cap.y);
        }
    }

    #[test]
    fn free_cargo_stays_on_screen() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = config();
        let mut cargo = Cargo::spawn(
            CargoId(1),
            CargoKind::Ribosome,
            &config,
            CargoOverrides::default(),
            &mut rng,
        );
        for _ in 0..2_000 {
            cargo.update(&config, &mut rng);
            assert!(crate::geometry::is_in_bounds(
                cargo.bounds(),
                config.screen,
                0.0
            ));
        }
    }

    #[test]
    fn wall_contact_mirrors_velocity_and_respins() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut config = config();
        config.velocity_jitter = 0;
        let mut cargo = still(CargoKind::Ribosome, Vec2::new(46.0, 500.0), &mut rng);
        cargo.velocity = Vec2::new(-10.0, 0.0);
        cargo.angular_rate = 0.0;

        cargo.update(&config, &mut rng);

        assert_eq!(cargo.velocity.x, 10.0);
        assert_eq!(cargo.center.x, 45.0);
        assert_ne!(cargo.angular_rate, 0.0);
        assert!(cargo.angular_rate.abs() <= 5.0);
    }

    #[test]
    fn trapped_cargo_ignores_physics() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = config();
        let mut cargo = still(CargoKind::Ribosome, Vec2::new(500.0, 500.0), &mut rng);
        cargo.velocity = Vec2::new(5.0, 5.0);
        cargo.trapped = true;
        let before = cargo.clone();

        cargo.update(&config, &mut rng);

        assert_eq!(cargo, before);
    }

    #[test]
    fn rotation_keeps_centre_and_resizes_frame() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut config = config();
        config.velocity_jitter = 0;
        let mut cargo = still(CargoKind::Mitochondrion, Vec2::new(900.0, 500.0), &mut rng);
        cargo.angular_rate = 5.0;

        for _ in 0..18 {
            cargo.update(&config, &mut rng);
        }

        assert_eq!(cargo.center, Vec2::new(900.0, 500.0));
        assert_eq!(cargo.frame(), 90);
        assert_eq!(cargo.occupied(), Vec2::new(165.0, 300.0));
        assert_eq!(cargo.bounds().center(), cargo.center);
    }

    #[test]
    fn angle_wraps_below_zero() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut config = config();
        config.velocity_jitter = 0;
        let mut cargo = still(CargoKind::Ribosome, Vec2::new(900.0, 500.0), &mut rng);
        cargo.angular_rate = -3.0;
        cargo.update(&config, &mut rng);
        assert_eq!(cargo.angle, 357.0);
    }

    #[test]
    fn only_pills_are_not_good() {
        for kind in CargoKind::ALL {
            assert_eq!(kind.spec().counts_as_good, kind != CargoKind::Pill);
        }
    }
}
