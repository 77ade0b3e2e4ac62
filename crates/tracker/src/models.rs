use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
}
impl User {
    pub fn new(username: String, email: String, password: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password,
        }
    }
}

/// A named group of users. Membership lives in the `team_members` junction
/// table and is managed through [`crate::database::Store::add_team_members`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
}
impl Team {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_type: String,
    pub duration: Duration,
}
impl Activity {
    pub fn new(user_id: Uuid, activity_type: String, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            activity_type,
            duration,
        }
    }
}

/// Row shape of the `activities` table; durations are stored as whole seconds.
#[derive(Debug, FromRow)]
pub(crate) struct ActivityRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_type: String,
    pub duration_seconds: i64,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            activity_type: row.activity_type,
            duration: Duration::seconds(row.duration_seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score: i64,
}
impl LeaderboardEntry {
    pub fn new(user_id: Uuid, score: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}
impl Workout {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
        }
    }
}

/// Number of stored records per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub users: usize,
    pub teams: usize,
    pub team_members: usize,
    pub activities: usize,
    pub leaderboard: usize,
    pub workouts: usize,
}
