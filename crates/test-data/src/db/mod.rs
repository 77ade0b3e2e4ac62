//! Database integration for seeding fixture data.
//!
//! The [`Seeder`] wipes the tracker tables and inserts the records of a
//! resolved fixture in dependency order.

mod seeder;

pub use seeder::{SeedError, Seeder};
