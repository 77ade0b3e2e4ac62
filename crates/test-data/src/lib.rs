//! Fixture seeding for OctoFit Tracker.
//!
//! This crate loads a JSON fixture describing users, teams, activities,
//! leaderboard entries and workouts, and replaces the contents of a tracker
//! store with it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let seeder = Seeder::new(Database::new(pool));
//! let counts = seeder.seed_from_path("fixtures/test_data.json").await?;
//! ```

pub mod config;
pub mod db;
pub mod fixture;
pub mod plan;

// Re-export core types from tracker crate
pub use tracker::models::{Activity, LeaderboardEntry, RecordCounts, Team, User, Workout};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::SeedConfig;
    pub use crate::db::{SeedError, Seeder};
    pub use crate::fixture::{Fixture, FixtureError, parse_duration};
    pub use crate::plan::{PlanError, SeedPlan};
    pub use tracker::{Database, MemoryStore, Store};
}
