//! Photo-store error type wrapping IO errors.

use std::path::PathBuf;

use stockroom_domain::error::StockroomError;

/// Errors originating from the file-system photo store.
#[derive(Debug, thiserror::Error)]
pub enum PhotoStoreError {
    /// The photo directory could not be created or opened.
    #[error("photo directory {} is unusable: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading, writing, or removing a photo file failed.
    #[error("photo file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PhotoStoreError> for StockroomError {
    fn from(err: PhotoStoreError) -> Self {
        Self::Photos(Box::new(err))
    }
}
