//! Populates the database from the fixture file.
//!
//! Run with:
//! ```
//! cargo run -p test-data --bin seed
//! ```

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use test_data::config::DEFAULT_LOG_FILTER;
use test_data::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = SeedConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Connected to database");

    let db = Database::new(pool);
    db.migrate().await.context("failed to run migrations")?;

    let seeder = Seeder::new(db);
    let counts = seeder
        .seed_from_path(&config.fixture_path)
        .await
        .with_context(|| format!("failed to seed from {}", config.fixture_path.display()))?;

    // Summary output
    tracing::info!("Seed completed!");
    tracing::info!("  Users: {}", counts.users);
    tracing::info!("  Teams: {} ({} memberships)", counts.teams, counts.team_members);
    tracing::info!("  Activities: {}", counts.activities);
    tracing::info!("  Leaderboard entries: {}", counts.leaderboard);
    tracing::info!("  Workouts: {}", counts.workouts);

    println!("Successfully populated the database with test data.");

    Ok(())
}
