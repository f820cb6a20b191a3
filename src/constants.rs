//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! Every length and speed is a *nominal* value measured against a 1920 px wide
//! reference screen.  [`crate::config::SessionConfig`] rescales them for the
//! actual window once per session; nothing else should read the raw values.

// ── Screen ────────────────────────────────────────────────────────────────────

/// Width of the reference screen all nominal magnitudes are authored against.
pub const REFERENCE_WIDTH: f32 = 1920.0;

/// Screen aspect ratio (height / width).
pub const ASPECT_RATIO: f32 = 9.0 / 16.0;

/// Window width used when nothing else is configured.
pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;

/// Fixed simulation rate (ticks per second).
pub const TICK_RATE: u32 = 60;

// ── Gesture ───────────────────────────────────────────────────────────────────

/// Radius around the PAS anchor that the release point must land inside for
/// the loop to count as closed (nominal px).
pub const HIT_CIRCLE_RADIUS: f32 = 100.0;

/// Minimum ellipse-approximated area for a closed loop to become an AP
/// (nominal px², scaled by scale² at session start).
pub const MIN_AREA: f32 = 20_000.0;

/// Samples allowed before a phagophore times out, per difficulty.
pub const TIMEOUT_EASY: usize = 240;
pub const TIMEOUT_MEDIUM: usize = 60;
pub const TIMEOUT_HARD: usize = 20;

/// Frames the red error overlay stays visible after a timeout penalty.
pub const FLASH_FRAMES: u32 = 6;

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Points subtracted when the release point misses the hit circle.
pub const MISS_PENALTY: i64 = 50;

/// Base score of the penalty pill dropped on a timed-out miss.
pub const TIMEOUT_PENALTY: i64 = -300;

/// Points subtracted every time an AP leaves the stage.
///
/// Zero keeps captures net-positive; early builds charged 200 here.
pub const AP_RELEASE_COST: i64 = 0;

// ── Difficulty scalars ────────────────────────────────────────────────────────

pub const SPEED_SCALAR_EASY: f32 = 0.5;
pub const SPEED_SCALAR_MEDIUM: f32 = 1.5;
pub const SPEED_SCALAR_HARD: f32 = 3.0;

pub const SCORE_SCALAR_EASY: i64 = 1;
pub const SCORE_SCALAR_MEDIUM: i64 = 2;
pub const SCORE_SCALAR_HARD: i64 = 3;

// ── Spawning ──────────────────────────────────────────────────────────────────

pub const MITO_COUNT: usize = 5;
pub const RIBO_COUNT: usize = 20;
pub const RNA_COUNT: usize = 10;

// ── Cargo physics ─────────────────────────────────────────────────────────────

/// Per-tick velocity jitter bound; each axis moves by an integer in `[-J, J]`.
pub const VELOCITY_JITTER: i32 = 3;

/// Largest angular rate (degrees per tick) picked after a wall bounce.
pub const MAX_ANGULAR_RATE: i32 = 5;

// ── Autophagosome ─────────────────────────────────────────────────────────────

/// How far past the screen edge an AP must travel before it is released
/// (nominal px).  Stops edge-flicker from ending a capture early.
pub const AP_EXIT_BUFFER: f32 = 100.0;

/// Sprite diameter relative to the capture diameter.
pub const AP_SPRITE_SCALE: f32 = 1.2;

// ── Fission ───────────────────────────────────────────────────────────────────

/// Chance per second that the largest free mitochondrion splits.
pub const FISSION_CHANCE: f64 = 0.15;

/// Smallest allowed mitochondrion width as a fraction of the spawn width.
pub const FISSION_FLOOR: f32 = 0.25;

// ── Particles ─────────────────────────────────────────────────────────────────

/// Release-burst particles emitted per trapped item.
pub const RELEASE_PARTICLES_PER_ITEM: usize = 6;
pub const RELEASE_PARTICLES_MAX: usize = 48;

// ── Persistence ───────────────────────────────────────────────────────────────

/// Number of rows shown on the end screen.
pub const HIGH_SCORE_ROWS: usize = 10;
