//! JSON fixture schema and loading.
//!
//! A fixture is a single document with five top-level arrays. Cross references
//! (team members, activity and leaderboard owners) are usernames; they are
//! resolved later by [`crate::plan::SeedPlan`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Duration;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid duration {0:?}, expected HH:MM")]
    InvalidDuration(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub users: Vec<FixtureUser>,
    pub teams: Vec<FixtureTeam>,
    pub activities: Vec<FixtureActivity>,
    pub leaderboard: Vec<FixtureLeaderboardEntry>,
    pub workouts: Vec<FixtureWorkout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureTeam {
    pub name: String,
    /// Usernames of the members.
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureActivity {
    /// Username of the owner.
    pub user: String,
    pub activity_type: String,
    /// Elapsed time as `HH:MM`.
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureLeaderboardEntry {
    pub user: String,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureWorkout {
    pub name: String,
    pub description: String,
}

impl Fixture {
    /// Reads and parses a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parses an `HH:MM` elapsed time into hours plus minutes. Minutes are added
/// as given (`"01:75"` is 2h15m) and anything after the second field is
/// ignored, so `"01:30:00"` is 1h30m. Both fields must be plain digits.
pub fn parse_duration(value: &str) -> Result<Duration, FixtureError> {
    let invalid = || FixtureError::InvalidDuration(value.to_string());

    let mut fields = value.split(':');
    let hours = fields.next().and_then(parse_field).ok_or_else(invalid)?;
    let minutes = fields.next().and_then(parse_field).ok_or_else(invalid)?;

    let seconds = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .ok_or_else(invalid)?;
    Ok(Duration::seconds(seconds))
}

fn parse_field(field: &str) -> Option<i64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
