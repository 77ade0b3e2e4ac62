use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Duplicate {field}: {value}")]
    UniqueViolation { field: &'static str, value: String },

    #[error("{table} references missing {referenced} {id}")]
    ForeignKeyViolation {
        table: &'static str,
        referenced: &'static str,
        id: Uuid,
    },
}
