pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use thiserror::Error;

use crate::models::ParseEnumError;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ParseEnumError> for DatabaseError {
    fn from(err: ParseEnumError) -> Self {
        DatabaseError::InvalidEnum {
            field: err.field.into(),
            value: err.value,
        }
    }
}

impl DatabaseError {
    pub fn patient_not_found(id: i64) -> Self {
        DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        }
    }
}
