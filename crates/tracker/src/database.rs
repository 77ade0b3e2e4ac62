//! Persistence layer for tracker records.
//!
//! [`Store`] is the handle the seeder and the tests talk to. [`Database`] is the
//! PostgreSQL implementation; [`MemoryStore`] keeps everything in process and
//! enforces the same uniqueness and reference rules as the schema.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::DatabaseError;
use crate::models::{Activity, ActivityRow, LeaderboardEntry, RecordCounts, Team, User, Workout};

#[async_trait]
pub trait Store: Send + Sync {
    /// Deletes every user, team, membership, activity, leaderboard entry and workout.
    async fn clear_all(&self) -> Result<(), DatabaseError>;

    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError>;

    async fn insert_team(&self, team: &Team) -> Result<(), DatabaseError>;

    /// Adds users to a team. Adding an existing member is a no-op.
    async fn add_team_members(&self, team_id: Uuid, user_ids: &[Uuid])
    -> Result<(), DatabaseError>;

    async fn insert_activity(&self, activity: &Activity) -> Result<(), DatabaseError>;

    async fn insert_leaderboard_entry(&self, entry: &LeaderboardEntry)
    -> Result<(), DatabaseError>;

    async fn insert_workout(&self, workout: &Workout) -> Result<(), DatabaseError>;

    /// All users, ordered by username.
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    /// All teams, ordered by name.
    async fn list_teams(&self) -> Result<Vec<Team>, DatabaseError>;

    /// Members of a team, ordered by username.
    async fn team_members(&self, team_id: Uuid) -> Result<Vec<User>, DatabaseError>;

    /// All activities, ordered by owner then activity type.
    async fn list_activities(&self) -> Result<Vec<Activity>, DatabaseError>;

    /// All leaderboard entries, highest score first.
    async fn list_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DatabaseError>;

    /// All workouts, ordered by name.
    async fn list_workouts(&self) -> Result<Vec<Workout>, DatabaseError>;

    async fn counts(&self) -> Result<RecordCounts, DatabaseError>;
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for Database {
    async fn clear_all(&self) -> Result<(), DatabaseError> {
        // Order matters due to foreign key constraints
        sqlx::query("DELETE FROM team_members")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM activities")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM leaderboard")
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM teams").execute(&self.pool).await?;
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        sqlx::query("DELETE FROM workouts")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_team(&self, team: &Team) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO teams (id, name)
            VALUES ($1, $2)
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn add_team_members(
        &self,
        team_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<(), DatabaseError> {
        for user_id in user_ids {
            sqlx::query(
                r#"
                INSERT INTO team_members (team_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (team_id, user_id) DO NOTHING
                "#,
            )
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn insert_activity(&self, activity: &Activity) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO activities (id, user_id, activity_type, duration_seconds)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(activity.id)
        .bind(activity.user_id)
        .bind(&activity.activity_type)
        .bind(activity.duration.whole_seconds())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_leaderboard_entry(
        &self,
        entry: &LeaderboardEntry,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO leaderboard (id, user_id, score)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.score)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_workout(&self, workout: &Workout) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO workouts (id, name, description)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(workout.id)
        .bind(&workout.name)
        .bind(&workout.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as(
            r#"
            SELECT id, username, email, password
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, DatabaseError> {
        let teams = sqlx::query_as("SELECT id, name FROM teams ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(teams)
    }

    async fn team_members(&self, team_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let members = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.email, u.password
            FROM users u
            JOIN team_members tm ON tm.user_id = u.id
            WHERE tm.team_id = $1
            ORDER BY u.username
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, DatabaseError> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.user_id, a.activity_type, a.duration_seconds
            FROM activities a
            JOIN users u ON u.id = a.user_id
            ORDER BY u.username, a.activity_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Activity::from).collect())
    }

    async fn list_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DatabaseError> {
        let entries = sqlx::query_as(
            r#"
            SELECT id, user_id, score
            FROM leaderboard
            ORDER BY score DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn list_workouts(&self) -> Result<Vec<Workout>, DatabaseError> {
        let workouts = sqlx::query_as("SELECT id, name, description FROM workouts ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(workouts)
    }

    async fn counts(&self) -> Result<RecordCounts, DatabaseError> {
        let (users, teams, team_members, activities, leaderboard, workouts): (
            i64,
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM teams),
                (SELECT COUNT(*) FROM team_members),
                (SELECT COUNT(*) FROM activities),
                (SELECT COUNT(*) FROM leaderboard),
                (SELECT COUNT(*) FROM workouts)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(RecordCounts {
            users: users as usize,
            teams: teams as usize,
            team_members: team_members as usize,
            activities: activities as usize,
            leaderboard: leaderboard as usize,
            workouts: workouts as usize,
        })
    }
}
