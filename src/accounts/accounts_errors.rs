use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AccountError>;

/// Custom error type for account-related operations
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Account not found: {0}")]
    NotFound(String),
    #[error("Account already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<DieselError> for AccountError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AccountError::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                AccountError::AlreadyExists(info.message().to_string())
            }
            _ => AccountError::DatabaseError(err.to_string()),
        }
    }
}

impl From<AccountError> for String {
    fn from(error: AccountError) -> Self {
        error.to_string()
    }
}
