//! Persistent high-score table.
//!
//! Scores live in `scores/high_scores.toml` as an append-only list:
//!
//! ```toml
//! [[scores]]
//! score = 1250
//! difficulty = "Hard"
//! date = "3/14/2025"
//! ```
//!
//! The file is read and rewritten whole on every [`HighScoreStore::record`],
//! which only happens when a session ends.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::log::warn;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::config::Difficulty;
use crate::error::{GameError, GameResult};

/// Default location, relative to the working directory.
pub const HIGH_SCORE_PATH: &str = "scores/high_scores.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HighScore {
    pub score: i64,
    pub difficulty: Difficulty,
    /// `M/D/YYYY`, local time.
    pub date: String,
}

impl HighScore {
    /// A record stamped with today's date.
    pub fn today(score: i64, difficulty: Difficulty) -> Self {
        Self {
            score,
            difficulty,
            date: format_date(today()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScoreTable {
    pub scores: Vec<HighScore>,
}

impl ScoreTable {
    /// The `n` best entries, highest first.  Equal scores keep file order.
    pub fn top(&self, n: usize) -> Vec<HighScore> {
        let mut sorted = self.scores.clone();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(n);
        sorted
    }
}

/// File-backed score table.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl Default for HighScoreStore {
    fn default() -> Self {
        Self::new(HIGH_SCORE_PATH)
    }
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table.  A missing file is an empty table.
    pub fn load(&self) -> GameResult<ScoreTable> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ScoreTable::default())
            }
            Err(source) => {
                return Err(GameError::HighScoreIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        toml::from_str(&contents).map_err(|err| GameError::HighScoreParse {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    fn write(&self, table: &ScoreTable) -> GameResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| GameError::HighScoreIo {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let serialized = toml::to_string_pretty(table).map_err(|err| {
            GameError::HighScoreEncode {
                reason: err.to_string(),
            }
        })?;
        fs::write(&self.path, serialized).map_err(|source| GameError::HighScoreIo {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the file with an empty table.
    pub fn reset(&self) -> GameResult<()> {
        self.write(&ScoreTable::default())
    }

    /// Append `entry` and persist.  A malformed file is reset to an empty
    /// table and the append retried once.
    pub fn record(&self, entry: HighScore) -> GameResult<ScoreTable> {
        let mut table = match self.load() {
            Ok(table) => table,
            Err(err @ GameError::HighScoreParse { .. }) => {
                warn!("{err}; resetting the score table");
                self.reset()?;
                self.load()?
            }
            Err(err) => return Err(err),
        };
        table.scores.push(entry);
        self.write(&table)?;
        Ok(table)
    }

    /// The `n` best stored entries, highest first.
    pub fn top(&self, n: usize) -> GameResult<Vec<HighScore>> {
        Ok(self.load()?.top(n))
    }
}

/// Today's local date, or the UTC date when the local offset is unknown.
fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Format `date` as `M/D/YYYY`.
pub fn format_date(date: Date) -> String {
    format!("{}/{}/{}", date.month() as u8, date.day(), date.year())
}
