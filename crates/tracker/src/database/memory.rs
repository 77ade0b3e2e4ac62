//! In-process [`Store`] backed by plain vectors.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use uuid::Uuid;

use super::Store;
use crate::errors::DatabaseError;
use crate::models::{Activity, LeaderboardEntry, RecordCounts, Team, User, Workout};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    teams: Vec<Team>,
    team_members: BTreeSet<(Uuid, Uuid)>,
    activities: Vec<Activity>,
    leaderboard: Vec<LeaderboardEntry>,
    workouts: Vec<Workout>,
}

impl Tables {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn require_user(&self, table: &'static str, id: Uuid) -> Result<(), DatabaseError> {
        match self.user(id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::ForeignKeyViolation {
                table,
                referenced: "user",
                id,
            }),
        }
    }

    fn username(&self, id: Uuid) -> &str {
        self.user(id).map(|u| u.username.as_str()).unwrap_or_default()
    }
}

/// Shares its tables between clones, so a test can keep a handle to a store
/// it has passed to a seeder.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn clear_all(&self) -> Result<(), DatabaseError> {
        *self.tables.lock().unwrap() = Tables::default();
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueViolation {
                field: "username",
                value: user.username.clone(),
            });
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn insert_team(&self, team: &Team) -> Result<(), DatabaseError> {
        self.tables.lock().unwrap().teams.push(team.clone());
        Ok(())
    }

    async fn add_team_members(
        &self,
        team_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.teams.iter().any(|t| t.id == team_id) {
            return Err(DatabaseError::ForeignKeyViolation {
                table: "team_members",
                referenced: "team",
                id: team_id,
            });
        }
        for &user_id in user_ids {
            tables.require_user("team_members", user_id)?;
        }
        tables
            .team_members
            .extend(user_ids.iter().map(|&user_id| (team_id, user_id)));
        Ok(())
    }

    async fn insert_activity(&self, activity: &Activity) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        tables.require_user("activities", activity.user_id)?;
        tables.activities.push(activity.clone());
        Ok(())
    }

    async fn insert_leaderboard_entry(
        &self,
        entry: &LeaderboardEntry,
    ) -> Result<(), DatabaseError> {
        let mut tables = self.tables.lock().unwrap();
        tables.require_user("leaderboard", entry.user_id)?;
        tables.leaderboard.push(entry.clone());
        Ok(())
    }

    async fn insert_workout(&self, workout: &Workout) -> Result<(), DatabaseError> {
        self.tables.lock().unwrap().workouts.push(workout.clone());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut users = self.tables.lock().unwrap().users.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, DatabaseError> {
        let mut teams = self.tables.lock().unwrap().teams.clone();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn team_members(&self, team_id: Uuid) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let mut members: Vec<User> = tables
            .team_members
            .iter()
            .filter(|(team, _)| *team == team_id)
            .filter_map(|&(_, user_id)| tables.user(user_id).cloned())
            .collect();
        members.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(members)
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        let mut activities = tables.activities.clone();
        activities.sort_by(|a, b| {
            tables
                .username(a.user_id)
                .cmp(tables.username(b.user_id))
                .then_with(|| a.activity_type.cmp(&b.activity_type))
        });
        Ok(activities)
    }

    async fn list_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DatabaseError> {
        let mut entries = self.tables.lock().unwrap().leaderboard.clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(entries)
    }

    async fn list_workouts(&self) -> Result<Vec<Workout>, DatabaseError> {
        let mut workouts = self.tables.lock().unwrap().workouts.clone();
        workouts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(workouts)
    }

    async fn counts(&self) -> Result<RecordCounts, DatabaseError> {
        let tables = self.tables.lock().unwrap();
        Ok(RecordCounts {
            users: tables.users.len(),
            teams: tables.teams.len(),
            team_members: tables.team_members.len(),
            activities: tables.activities.len(),
            leaderboard: tables.leaderboard.len(),
            workouts: tables.workouts.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    struct Fixture {
        store: MemoryStore,
        user: User,
        team: Team,
        activity: Activity,
        leaderboard: LeaderboardEntry,
        workout: Workout,
    }

    async fn set_up() -> Fixture {
        let store = MemoryStore::new();
        let user = User::new(
            "testuser".to_string(),
            "testuser@example.com".to_string(),
            "password123".to_string(),
        );
        store.insert_user(&user).await.unwrap();

        let team = Team::new("Test Team".to_string());
        store.insert_team(&team).await.unwrap();
        store.add_team_members(team.id, &[user.id]).await.unwrap();

        let activity = Activity::new(user.id, "Running".to_string(), Duration::minutes(30));
        store.insert_activity(&activity).await.unwrap();

        let leaderboard = LeaderboardEntry::new(user.id, 100);
        store.insert_leaderboard_entry(&leaderboard).await.unwrap();

        let workout = Workout::new("Test Workout".to_string(), "A test workout".to_string());
        store.insert_workout(&workout).await.unwrap();

        Fixture {
            store,
            user,
            team,
            activity,
            leaderboard,
            workout,
        }
    }

    #[tokio::test]
    async fn test_user_creation() {
        let f = set_up().await;
        let users = f.store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "testuser");
        assert_eq!(users[0].email, "testuser@example.com");
        assert_eq!(users[0], f.user);
    }

    #[tokio::test]
    async fn test_team_creation() {
        let f = set_up().await;
        let teams = f.store.list_teams().await.unwrap();
        assert_eq!(teams[0].name, "Test Team");
        let members = f.store.team_members(f.team.id).await.unwrap();
        assert!(members.contains(&f.user));
    }

    #[tokio::test]
    async fn test_activity_creation() {
        let f = set_up().await;
        let activities = f.store.list_activities().await.unwrap();
        assert_eq!(activities[0].activity_type, "Running");
        assert_eq!(activities[0].duration, Duration::minutes(30));
        assert_eq!(activities[0], f.activity);
    }

    #[tokio::test]
    async fn test_leaderboard_creation() {
        let f = set_up().await;
        let entries = f.store.list_leaderboard().await.unwrap();
        assert_eq!(entries[0].score, 100);
        assert_eq!(entries[0].user_id, f.user.id);
        assert_eq!(entries[0], f.leaderboard);
    }

    #[tokio::test]
    async fn test_workout_creation() {
        let f = set_up().await;
        let workouts = f.store.list_workouts().await.unwrap();
        assert_eq!(workouts[0].name, "Test Workout");
        assert_eq!(workouts[0].description, "A test workout");
        assert_eq!(workouts[0], f.workout);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let f = set_up().await;
        let dup = User::new("testuser".into(), "other@example.com".into(), "x".into());
        let err = f.store.insert_user(&dup).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::UniqueViolation { field: "username", .. }
        ));
    }

    #[tokio::test]
    async fn test_dangling_owner_rejected() {
        let store = MemoryStore::new();
        let ghost = Uuid::new_v4();
        let err = store
            .insert_leaderboard_entry(&LeaderboardEntry::new(ghost, 5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::ForeignKeyViolation { table: "leaderboard", id, .. } if id == ghost
        ));
        assert_eq!(store.counts().await.unwrap(), RecordCounts::default());
    }

    #[tokio::test]
    async fn test_clear_all_and_shared_clones() {
        let f = set_up().await;
        let other = f.store.clone();
        assert_eq!(other.counts().await.unwrap().team_members, 1);

        other.clear_all().await.unwrap();
        assert_eq!(f.store.counts().await.unwrap(), RecordCounts::default());
    }
}
