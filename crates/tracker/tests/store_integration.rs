//! Integration tests for the PostgreSQL store.
//!
//! To run these tests, you need:
//! 1. A PostgreSQL database
//! 2. DATABASE_URL environment variable set
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p tracker --test store_integration`
//!
//! Note: These tests create and clean up their own rows using unique names,
//! so they can safely run against a development database.

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use time::Duration;
use tracker::{
    Database, Store,
    models::{Activity, LeaderboardEntry, Team, User, Workout},
};
use uuid::Uuid;

/// Get database pool, skipping tests if DATABASE_URL is not set.
async fn get_test_db() -> Option<Database> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            return None;
        }
    };

    let db = Database::new(pool);
    db.migrate().await.expect("Failed to run migrations");
    Some(db)
}

/// Cleanup helper to remove test rows.
async fn cleanup_test_data(pool: &PgPool, user_id: Uuid, team_id: Uuid, workout_id: Uuid) {
    // Delete in order due to foreign key constraints
    let _ = sqlx::query("DELETE FROM team_members WHERE team_id = $1")
        .bind(team_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM activities WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM leaderboard WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(team_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await;
    let _ = sqlx::query("DELETE FROM workouts WHERE id = $1")
        .bind(workout_id)
        .execute(pool)
        .await;
}

#[tokio::test]
async fn test_records_round_trip_through_postgres() {
    let Some(db) = get_test_db().await else {
        return;
    };

    let test_id = Uuid::new_v4().simple().to_string();
    let user = User::new(
        format!("testuser-{test_id}"),
        "testuser@example.com".to_string(),
        "password123".to_string(),
    );
    let team = Team::new(format!("Test Team {test_id}"));
    let activity = Activity::new(user.id, "Running".to_string(), Duration::minutes(30));
    let entry = LeaderboardEntry::new(user.id, 100);
    let workout = Workout::new(format!("Test Workout {test_id}"), "A test workout".to_string());

    db.insert_user(&user).await.expect("Failed to insert user");
    db.insert_team(&team).await.expect("Failed to insert team");
    db.add_team_members(team.id, &[user.id, user.id])
        .await
        .expect("Failed to add team member");
    db.insert_activity(&activity)
        .await
        .expect("Failed to insert activity");
    db.insert_leaderboard_entry(&entry)
        .await
        .expect("Failed to insert leaderboard entry");
    db.insert_workout(&workout)
        .await
        .expect("Failed to insert workout");

    let users = db.list_users().await.unwrap();
    let stored_user = users.iter().find(|u| u.id == user.id).unwrap();
    assert_eq!(stored_user.username, user.username);
    assert_eq!(stored_user.email, "testuser@example.com");
    assert_eq!(stored_user.password, "password123");

    let members = db.team_members(team.id).await.unwrap();
    assert_eq!(members, vec![user.clone()]);

    let activities = db.list_activities().await.unwrap();
    let stored_activity = activities.iter().find(|a| a.id == activity.id).unwrap();
    assert_eq!(stored_activity.activity_type, "Running");
    assert_eq!(stored_activity.duration, Duration::minutes(30));

    let entries = db.list_leaderboard().await.unwrap();
    let stored_entry = entries.iter().find(|e| e.id == entry.id).unwrap();
    assert_eq!(stored_entry.score, 100);
    assert_eq!(stored_entry.user_id, user.id);

    let workouts = db.list_workouts().await.unwrap();
    let stored_workout = workouts.iter().find(|w| w.id == workout.id).unwrap();
    assert_eq!(stored_workout.description, "A test workout");

    cleanup_test_data(db.pool(), user.id, team.id, workout.id).await;
}

#[tokio::test]
async fn test_activity_requires_existing_user() {
    let Some(db) = get_test_db().await else {
        return;
    };

    let activity = Activity::new(Uuid::new_v4(), "Running".to_string(), Duration::minutes(5));
    let result = db.insert_activity(&activity).await;
    assert!(result.is_err(), "foreign key should reject a dangling owner");
}
