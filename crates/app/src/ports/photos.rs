//! Photo store port — blob storage for device photos, addressed by filename.

use std::future::Future;
use std::path::PathBuf;

use stockroom_domain::error::StockroomError;
use stockroom_domain::photo::PhotoUpload;

/// Storage for photo files referenced from device records.
pub trait PhotoStore {
    /// Store an upload and return the filename it was stored under.
    ///
    /// The stored name is derived from the upload time and the client
    /// filename. Two uploads of the same filename within one millisecond
    /// collide; the later one wins.
    fn save(
        &self,
        upload: PhotoUpload,
    ) -> impl Future<Output = Result<String, StockroomError>> + Send;

    /// Delete a stored file. Deleting a missing file is not an error.
    fn delete(&self, filename: &str) -> impl Future<Output = Result<(), StockroomError>> + Send;

    /// Absolute path of a stored file, or `None` when it is not on disk.
    fn resolve(
        &self,
        filename: &str,
    ) -> impl Future<Output = Result<Option<PathBuf>, StockroomError>> + Send;
}
