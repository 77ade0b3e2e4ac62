//! Resolution of a fixture into records ready for insertion.
//!
//! Every record gets its identifier here, every username reference is looked
//! up and every duration is parsed, so a fixture that cannot be seeded is
//! rejected before anything in the store is touched.

use std::collections::BTreeMap;

use thiserror::Error;
use tracker::models::{Activity, LeaderboardEntry, RecordCounts, Team, User, Workout};
use uuid::Uuid;

use crate::fixture::{Fixture, FixtureError, parse_duration};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("{referenced_by} references unknown user '{username}'")]
    UnknownUser {
        referenced_by: String,
        username: String,
    },
    #[error("Username '{0}' appears more than once")]
    DuplicateUsername(String),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// A team together with the resolved ids of its members.
#[derive(Debug, Clone)]
pub struct PlannedTeam {
    pub team: Team,
    pub member_ids: Vec<Uuid>,
}

/// Records derived from one fixture, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SeedPlan {
    pub users: Vec<User>,
    pub teams: Vec<PlannedTeam>,
    pub activities: Vec<Activity>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub workouts: Vec<Workout>,
}

impl SeedPlan {
    pub fn from_fixture(fixture: &Fixture) -> Result<Self, PlanError> {
        let mut plan = SeedPlan::default();
        let mut user_ids: BTreeMap<&str, Uuid> = BTreeMap::new();

        for data in &fixture.users {
            let user = User::new(
                data.username.clone(),
                data.email.clone(),
                data.password.clone(),
            );
            if user_ids.insert(&data.username, user.id).is_some() {
                return Err(PlanError::DuplicateUsername(data.username.clone()));
            }
            plan.users.push(user);
        }

        let resolve = |username: &str, referenced_by: &dyn Fn() -> String| {
            user_ids
                .get(username)
                .copied()
                .ok_or_else(|| PlanError::UnknownUser {
                    referenced_by: referenced_by(),
                    username: username.to_string(),
                })
        };

        for data in &fixture.teams {
            let mut member_ids = Vec::with_capacity(data.members.len());
            for username in &data.members {
                let id = resolve(username, &|| format!("team '{}'", data.name))?;
                if !member_ids.contains(&id) {
                    member_ids.push(id);
                }
            }
            plan.teams.push(PlannedTeam {
                team: Team::new(data.name.clone()),
                member_ids,
            });
        }

        for (i, data) in fixture.activities.iter().enumerate() {
            let user_id = resolve(&data.user, &|| format!("activity #{i}"))?;
            let duration = parse_duration(&data.duration)?;
            plan.activities
                .push(Activity::new(user_id, data.activity_type.clone(), duration));
        }

        for (i, data) in fixture.leaderboard.iter().enumerate() {
            let user_id = resolve(&data.user, &|| format!("leaderboard entry #{i}"))?;
            plan.leaderboard
                .push(LeaderboardEntry::new(user_id, data.score));
        }

        plan.workouts = fixture
            .workouts
            .iter()
            .map(|data| Workout::new(data.name.clone(), data.description.clone()))
            .collect();

        Ok(plan)
    }

    /// Record counts this plan produces once applied to an empty store.
    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            users: self.users.len(),
            teams: self.teams.len(),
            team_members: self.teams.iter().map(|t| t.member_ids.len()).sum(),
            activities: self.activities.len(),
            leaderboard: self.leaderboard.len(),
            workouts: self.workouts.len(),
        }
    }
}
