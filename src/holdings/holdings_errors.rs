use diesel::result::Error as DieselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HoldingsError>;

/// Custom error type for lot and portfolio operations
#[derive(Debug, Error)]
pub enum HoldingsError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<DieselError> for HoldingsError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => HoldingsError::NotFound("Record not found".to_string()),
            _ => HoldingsError::DatabaseError(err.to_string()),
        }
    }
}
