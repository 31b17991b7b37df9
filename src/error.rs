// src/error.rs
use thiserror::Error;

/// Errors raised by repositories and services.
#[derive(Error, Debug)]
pub enum HireError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Company and candidate are not a match")]
    NotMatched,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HireError {
    pub fn validation(message: impl Into<String>) -> Self {
        HireError::Validation(message.into())
    }

    /// Stable code used in error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            HireError::Validation(_) => "VALIDATION_ERROR",
            HireError::NotFound(_) => "NOT_FOUND",
            HireError::Conflict(_) => "CONFLICT",
            HireError::NotMatched => "NOT_MATCHED",
            HireError::InvalidCredentials => "INVALID_CREDENTIALS",
            HireError::Unauthorized => "UNAUTHORIZED",
            HireError::Database(_) => "DATABASE_ERROR",
            HireError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, HireError::Database(_) | HireError::Internal(_))
    }
}

/// True when a database error is a uniqueness violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() || db_err.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

pub type HireResult<T> = Result<T, HireError>;
