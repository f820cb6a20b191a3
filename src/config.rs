//! Runtime configuration.
//!
//! Two layers:
//!
//! - [`Tuning`] is a Bevy [`Resource`] that mirrors every constant in
//!   [`crate::constants`].  At startup, [`load_tuning`] reads
//!   `assets/tuning.toml` and overwrites the defaults with any values present
//!   in the file.  Missing keys fall back to the compile-time defaults, so a
//!   minimal TOML can override just the knobs you care about.
//! - [`SessionConfig`] is the immutable, fully-resolved view handed to a
//!   single session: nominal magnitudes rescaled for the window, difficulty
//!   scalars looked up.  It is built once when a round starts and passed by
//!   reference into every gameplay constructor.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `Tuning::default()`.

use std::fmt;

use bevy::math::Vec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{validate_positive, validate_probability, validate_timeout, GameResult};
use crate::geometry::{screen_height, ResolutionScale};

/// Path of the optional tuning override file.
pub const TUNING_PATH: &str = "assets/tuning.toml";

// ── Difficulty ────────────────────────────────────────────────────────────────

/// Player-selected difficulty; fixed for the duration of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a difficulty changes: how long a phagophore may be drawn, how fast
/// cargo drifts, and how much it is worth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub timeout_samples: usize,
    pub speed_scalar: f32,
    pub score_scalar: i64,
}

// ── Tuning ────────────────────────────────────────────────────────────────────

/// File-tunable gameplay knobs, all in nominal (1920 px wide) units.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── Window ───────────────────────────────────────────────────────────────
    pub window_width: u32,
    pub tick_rate: u32,

    // ── Gesture ──────────────────────────────────────────────────────────────
    pub hit_circle_radius: f32,
    pub min_area: f32,
    pub timeout_easy: usize,
    pub timeout_medium: usize,
    pub timeout_hard: usize,
    pub flash_frames: u32,

    // ── Scoring ──────────────────────────────────────────────────────────────
    pub miss_penalty: i64,
    pub timeout_penalty: i64,
    pub ap_release_cost: i64,

    // ── Difficulty scalars ───────────────────────────────────────────────────
    pub speed_scalar_easy: f32,
    pub speed_scalar_medium: f32,
    pub speed_scalar_hard: f32,
    pub score_scalar_easy: i64,
    pub score_scalar_medium: i64,
    pub score_scalar_hard: i64,

    // ── Spawning ─────────────────────────────────────────────────────────────
    pub mito_count: usize,
    pub ribo_count: usize,
    pub rna_count: usize,

    // ── Cargo physics ────────────────────────────────────────────────────────
    pub velocity_jitter: i32,
    pub max_angular_rate: i32,

    // ── Autophagosome ────────────────────────────────────────────────────────
    pub ap_exit_buffer: f32,
    pub ap_sprite_scale: f32,

    // ── Fission ──────────────────────────────────────────────────────────────
    pub fission_chance: f64,
    pub fission_floor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            tick_rate: TICK_RATE,
            hit_circle_radius: HIT_CIRCLE_RADIUS,
            min_area: MIN_AREA,
            timeout_easy: TIMEOUT_EASY,
            timeout_medium: TIMEOUT_MEDIUM,
            timeout_hard: TIMEOUT_HARD,
            flash_frames: FLASH_FRAMES,
            miss_penalty: MISS_PENALTY,
            timeout_penalty: TIMEOUT_PENALTY,
            ap_release_cost: AP_RELEASE_COST,
            speed_scalar_easy: SPEED_SCALAR_EASY,
            speed_scalar_medium: SPEED_SCALAR_MEDIUM,
            speed_scalar_hard: SPEED_SCALAR_HARD,
            score_scalar_easy: SCORE_SCALAR_EASY,
            score_scalar_medium: SCORE_SCALAR_MEDIUM,
            score_scalar_hard: SCORE_SCALAR_HARD,
            mito_count: MITO_COUNT,
            ribo_count: RIBO_COUNT,
            rna_count: RNA_COUNT,
            velocity_jitter: VELOCITY_JITTER,
            max_angular_rate: MAX_ANGULAR_RATE,
            ap_exit_buffer: AP_EXIT_BUFFER,
            ap_sprite_scale: AP_SPRITE_SCALE,
            fission_chance: FISSION_CHANCE,
            fission_floor: FISSION_FLOOR,
        }
    }
}

impl Tuning {
    /// Look up the scalars for `difficulty`.
    pub fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => DifficultyProfile {
                timeout_samples: self.timeout_easy,
                speed_scalar: self.speed_scalar_easy,
                score_scalar: self.score_scalar_easy,
            },
            Difficulty::Medium => DifficultyProfile {
                timeout_samples: self.timeout_medium,
                speed_scalar: self.speed_scalar_medium,
                score_scalar: self.score_scalar_medium,
            },
            Difficulty::Hard => DifficultyProfile {
                timeout_samples: self.timeout_hard,
                speed_scalar: self.speed_scalar_hard,
                score_scalar: self.score_scalar_hard,
            },
        }
    }

    /// Reject values that would make the game unplayable.
    pub fn validate(&self) -> GameResult<()> {
        validate_positive("window_width", self.window_width as f32)?;
        validate_positive("tick_rate", self.tick_rate as f32)?;
        validate_positive("hit_circle_radius", self.hit_circle_radius)?;
        validate_positive("min_area", self.min_area)?;
        validate_timeout("timeout_easy", self.timeout_easy)?;
        validate_timeout("timeout_medium", self.timeout_medium)?;
        validate_timeout("timeout_hard", self.timeout_hard)?;
        validate_positive("speed_scalar_easy", self.speed_scalar_easy)?;
        validate_positive("speed_scalar_medium", self.speed_scalar_medium)?;
        validate_positive("speed_scalar_hard", self.speed_scalar_hard)?;
        validate_positive("ap_exit_buffer", self.ap_exit_buffer)?;
        validate_positive("ap_sprite_scale", self.ap_sprite_scale)?;
        validate_probability("fission_chance", self.fission_chance)?;
        validate_probability("fission_floor", self.fission_floor as f64)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/tuning.toml` and overwrite the
/// `Tuning` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse or validation errors
/// are logged but do not abort the game.  A missing file is silently ignored.
pub fn load_tuning(mut tuning: ResMut<Tuning>) {
    match std::fs::read_to_string(TUNING_PATH) {
        Ok(contents) => match parse_tuning(&contents) {
            Ok(loaded) => {
                *tuning = loaded;
                info!("Loaded tuning from {TUNING_PATH}");
            }
            Err(reason) => {
                warn!("Ignoring {TUNING_PATH}: {reason}; using defaults");
            }
        },
        Err(_) => {
            debug!("No {TUNING_PATH} found; using compiled defaults");
        }
    }
}

/// Startup system: size the primary window to the tuned width at 16:9.
pub fn apply_window_size(
    tuning: Res<Tuning>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    let width = tuning.window_width as f32;
    window.resolution.set(width, screen_height(width));
    eprintln!("[SETUP] Window {}x{}", width, screen_height(width));
}

/// Parse and validate a tuning document.
pub fn parse_tuning(contents: &str) -> Result<Tuning, String> {
    let tuning: Tuning = toml::from_str(contents).map_err(|err| err.to_string())?;
    tuning.validate().map_err(|err| err.to_string())?;
    Ok(tuning)
}

// ── Session configuration ─────────────────────────────────────────────────────

/// Immutable, resolution-scaled settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Play area in screen pixels.
    pub screen: Vec2,
    pub scale: ResolutionScale,
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub tick_rate: u32,

    pub hit_radius: f32,
    pub min_area: f32,
    pub flash_frames: u32,

    pub miss_penalty: i64,
    pub timeout_penalty: i64,
    pub ap_release_cost: i64,

    pub mito_count: usize,
    pub ribo_count: usize,
    pub rna_count: usize,

    pub velocity_jitter: i32,
    pub max_angular_rate: i32,

    pub ap_exit_buffer: f32,
    pub ap_sprite_scale: f32,

    pub fission_chance: f64,
    pub fission_floor: f32,
}

impl SessionConfig {
    /// Resolve `tuning` for a `width` px wide 16:9 screen.
    pub fn new(width: f32, difficulty: Difficulty, tuning: &Tuning) -> Self {
        let scale = ResolutionScale::from_width(width);
        Self {
            screen: Vec2::new(width.round(), screen_height(width)),
            scale,
            difficulty,
            profile: tuning.profile(difficulty),
            tick_rate: tuning.tick_rate.max(1),
            hit_radius: scale.length(tuning.hit_circle_radius),
            min_area: scale.area(tuning.min_area),
            flash_frames: tuning.flash_frames,
            miss_penalty: tuning.miss_penalty,
            timeout_penalty: tuning.timeout_penalty,
            ap_release_cost: tuning.ap_release_cost,
            mito_count: tuning.mito_count,
            ribo_count: tuning.ribo_count,
            rna_count: tuning.rna_count,
            velocity_jitter: tuning.velocity_jitter.max(0),
            max_angular_rate: tuning.max_angular_rate.max(1),
            ap_exit_buffer: scale.length(tuning.ap_exit_buffer),
            ap_sprite_scale: tuning.ap_sprite_scale,
            fission_chance: tuning.fission_chance,
            fission_floor: tuning.fission_floor,
        }
    }

    /// Reference 1920×1080 configuration with default tuning.
    pub fn reference(difficulty: Difficulty) -> Self {
        Self::new(REFERENCE_WIDTH, difficulty, &Tuning::default())
    }

    /// Per-axis speed cap for a nominal cap, after scaling and difficulty.
    #[inline]
    pub fn speed_cap(&self, nominal: f32) -> f32 {
        (self.scale.length(nominal) * self.profile.speed_scalar).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_match_difficulty_table() {
        let tuning = Tuning::default();
        let easy = tuning.profile(Difficulty::Easy);
        let hard = tuning.profile(Difficulty::Hard);
        assert_eq!(easy.timeout_samples, 240);
        assert_eq!(easy.score_scalar, 1);
        assert_eq!(easy.speed_scalar, 0.5);
        assert_eq!(tuning.profile(Difficulty::Medium).timeout_samples, 60);
        assert_eq!(hard.timeout_samples, 20);
        assert_eq!(hard.speed_scalar, 3.0);
        assert_eq!(hard.score_scalar, 3);
    }

    #[test]
    fn reference_config_keeps_nominal_values() {
        let config = SessionConfig::reference(Difficulty::Medium);
        assert_eq!(config.screen, Vec2::new(1920.0, 1080.0));
        assert_eq!(config.hit_radius, 100.0);
        assert_eq!(config.min_area, 20_000.0);
        assert_eq!(config.ap_exit_buffer, 100.0);
    }

    #[test]
    fn half_width_screen_scales_lengths_and_areas() {
        let config = SessionConfig::new(960.0, Difficulty::Easy, &Tuning::default());
        assert_eq!(config.screen, Vec2::new(960.0, 540.0));
        assert_eq!(config.hit_radius, 50.0);
        assert_eq!(config.min_area, 5_000.0);
    }

    #[test]
    fn speed_cap_applies_scale_then_difficulty() {
        let config = SessionConfig::reference(Difficulty::Medium);
        assert_eq!(config.speed_cap(7.0), 11.0);
        let easy = SessionConfig::reference(Difficulty::Easy);
        assert_eq!(easy.speed_cap(15.0), 8.0);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let tuning = parse_tuning("miss_penalty = 75\ntimeout_hard = 30\n").unwrap();
        assert_eq!(tuning.miss_penalty, 75);
        assert_eq!(tuning.timeout_hard, 30);
        assert_eq!(tuning.timeout_easy, TIMEOUT_EASY);
        assert_eq!(tuning.hit_circle_radius, HIT_CIRCLE_RADIUS);
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        assert!(parse_tuning("fission_chance = 2.0").is_err());
        assert!(parse_tuning("min_area = \"big\"").is_err());
    }

    #[test]
    fn difficulty_labels_round_trip_through_display() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.to_string(), difficulty.label());
        }
    }
}
