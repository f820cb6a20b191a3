//! Game-specific error types.
//!
//! Only the I/O edges of the game can fail: the high-score file and the
//! tuning file.  Systems log these through Bevy's `error!`/`warn!` and carry
//! on rather than aborting the frame loop.

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for Gameophagy.
#[derive(Debug)]
pub enum GameError {
    /// Reading or writing the high-score file failed at the OS level.
    HighScoreIo {
        /// File that was being accessed.
        path: PathBuf,
        source: std::io::Error,
    },

    /// The high-score file exists but is not a valid score table.
    HighScoreParse {
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The in-memory score table could not be serialised.
    HighScoreEncode { reason: String },

    /// A tuning value is outside its safe operating range.
    UnsafeTuning {
        /// Name of the knob (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::HighScoreIo { path, source } => {
                write!(f, "high-score file {}: {}", path.display(), source)
            }
            GameError::HighScoreParse { path, reason } => {
                write!(f, "malformed high-score file {}: {}", path.display(), reason)
            }
            GameError::HighScoreEncode { reason } => {
                write!(f, "failed to encode high scores: {}", reason)
            }
            GameError::UnsafeTuning {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "tuning value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::HighScoreIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive and finite.
pub fn validate_positive(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::UnsafeTuning {
            name,
            value: value as f64,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is a probability.
pub fn validate_probability(name: &'static str, value: f64) -> GameResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GameError::UnsafeTuning {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error if a sample cap would time out before a loop can close.
pub fn validate_timeout(name: &'static str, value: usize) -> GameResult<()> {
    if value >= 2 {
        Ok(())
    } else {
        Err(GameError::UnsafeTuning {
            name,
            value: value as f64,
            safe_range: "[2, ∞)",
        })
    }
}
