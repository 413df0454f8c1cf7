//! Storage-specific error type wrapping sqlx errors.

use stockroom_domain::error::StockroomError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for StockroomError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
