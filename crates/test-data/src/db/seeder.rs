//! Database seeding utilities.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};
use tracker::{
    DatabaseError, Store,
    models::{Activity, LeaderboardEntry, RecordCounts, User, Workout},
};

use crate::fixture::{Fixture, FixtureError};
use crate::plan::{PlanError, PlannedTeam, SeedPlan};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Replaces the contents of a [`Store`] with the records described by a fixture.
pub struct Seeder<S> {
    store: S,
}

impl<S: Store> Seeder<S> {
    /// Creates a new seeder writing to the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the fixture at `path` and seeds it.
    pub async fn seed_from_path(&self, path: impl AsRef<Path>) -> Result<RecordCounts, SeedError> {
        let path = path.as_ref();
        info!("Loading fixture from {}", path.display());
        let fixture = Fixture::load(path)?;
        self.seed_fixture(&fixture).await
    }

    /// Resolves the fixture, clears the store, then inserts every record.
    ///
    /// Fixture problems (unknown usernames, bad durations, duplicate usernames)
    /// are reported before anything is deleted. A storage failure part way
    /// through leaves whatever was written up to that point.
    pub async fn seed_fixture(&self, fixture: &Fixture) -> Result<RecordCounts, SeedError> {
        let plan = SeedPlan::from_fixture(fixture)?;
        self.apply(&plan).await
    }

    /// Clears the store and inserts a resolved plan in dependency order.
    pub async fn apply(&self, plan: &SeedPlan) -> Result<RecordCounts, SeedError> {
        info!("Starting database population...");

        self.clear_all().await?;
        self.seed_users(&plan.users).await?;
        self.seed_teams(&plan.teams).await?;
        self.seed_activities(&plan.activities).await?;
        self.seed_leaderboard(&plan.leaderboard).await?;
        self.seed_workouts(&plan.workouts).await?;

        Ok(plan.counts())
    }

    /// Clears all seeded data.
    ///
    /// **WARNING**: This deletes every user, team, activity, leaderboard entry
    /// and workout.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        info!("Clearing all seeded data...");
        self.store.clear_all().await?;
        info!("All data cleared");
        Ok(())
    }

    async fn seed_users(&self, users: &[User]) -> Result<(), SeedError> {
        info!("Seeding {} users...", users.len());

        for user in users {
            self.store.insert_user(user).await?;
            debug!("Created user: {} ({})", user.username, user.id);
        }

        info!("Seeded {} users", users.len());
        Ok(())
    }

    async fn seed_teams(&self, teams: &[PlannedTeam]) -> Result<(), SeedError> {
        info!("Seeding {} teams...", teams.len());

        for planned in teams {
            self.store.insert_team(&planned.team).await?;
            self.store
                .add_team_members(planned.team.id, &planned.member_ids)
                .await?;
            debug!(
                "Created team: {} with {} members",
                planned.team.name,
                planned.member_ids.len()
            );
        }

        info!("Seeded {} teams", teams.len());
        Ok(())
    }

    async fn seed_activities(&self, activities: &[Activity]) -> Result<(), SeedError> {
        info!("Seeding {} activities...", activities.len());

        for activity in activities {
            self.store.insert_activity(activity).await?;
            debug!(
                "Created activity: {} for {} ({} min)",
                activity.activity_type,
                activity.user_id,
                activity.duration.whole_minutes()
            );
        }

        info!("Seeded {} activities", activities.len());
        Ok(())
    }

    async fn seed_leaderboard(&self, entries: &[LeaderboardEntry]) -> Result<(), SeedError> {
        info!("Seeding {} leaderboard entries...", entries.len());

        for entry in entries {
            self.store.insert_leaderboard_entry(entry).await?;
            debug!("Created leaderboard entry: {} for {}", entry.score, entry.user_id);
        }

        info!("Seeded {} leaderboard entries", entries.len());
        Ok(())
    }

    async fn seed_workouts(&self, workouts: &[Workout]) -> Result<(), SeedError> {
        info!("Seeding {} workouts...", workouts.len());

        for workout in workouts {
            self.store.insert_workout(workout).await?;
            debug!("Created workout: {}", workout.name);
        }

        info!("Seeded {} workouts", workouts.len());
        Ok(())
    }

    /// Returns a reference to the store for verification.
    pub fn store(&self) -> &S {
        &self.store
    }
}
