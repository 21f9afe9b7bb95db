//! Error types for the inventory services.

use sea_orm::{DbErr, SqlErr};

/// Failure of a service operation.
///
/// `NotFound` and `Conflict` are caller mistakes and carry a message fit for
/// the client. Everything the store reports is passed through as `Database`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness rule would be broken (hotel name, spot number in a parking).
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Maps a unique-constraint violation raised by the store to `Conflict`,
    /// leaving every other database error untouched.
    pub(crate) fn from_write(err: DbErr, message: impl FnOnce() -> String) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint rejected write: {}", detail);
                Self::Conflict(message())
            }
            _ => Self::Database(err),
        }
    }
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
