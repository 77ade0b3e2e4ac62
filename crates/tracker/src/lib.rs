//! Data model and persistence for OctoFit Tracker.

pub mod database;
pub mod errors;
pub mod models;

pub use database::{Database, MemoryStore, Store};
pub use errors::DatabaseError;
