//! [`PhotoStore`] backed by a local directory.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use stockroom_app::ports::PhotoStore;
use stockroom_domain::error::StockroomError;
use stockroom_domain::photo::PhotoUpload;

use crate::error::PhotoStoreError;
use crate::naming::{is_plain, stored_name};

/// Photo files kept flat under a single directory.
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    /// Open the store at `root`, creating the directory when it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoStoreError::Directory`] when the directory cannot be
    /// created or resolved.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, PhotoStoreError> {
        let root = root.into();
        let directory_error = |source| PhotoStoreError::Directory {
            path: root.clone(),
            source,
        };
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(directory_error)?;
        let root = tokio::fs::canonicalize(&root)
            .await
            .map_err(directory_error)?;
        tracing::debug!(root = %root.display(), "photo store ready");
        Ok(Self { root })
    }

    /// Absolute path of the photo directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, filename: &str) -> Option<PathBuf> {
        is_plain(filename).then(|| self.root.join(filename))
    }
}

impl PhotoStore for LocalPhotoStore {
    fn save(
        &self,
        upload: PhotoUpload,
    ) -> impl Future<Output = Result<String, StockroomError>> + Send {
        let name = stored_name(Utc::now(), &upload.filename);
        let path = self.root.join(&name);
        async move {
            tokio::fs::write(&path, &upload.bytes)
                .await
                .map_err(PhotoStoreError::from)?;
            tracing::debug!(filename = %name, size = upload.bytes.len(), "photo saved");
            Ok(name)
        }
    }

    fn delete(&self, filename: &str) -> impl Future<Output = Result<(), StockroomError>> + Send {
        let path = self.path_of(filename);
        async move {
            let Some(path) = path else {
                return Ok(());
            };
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "photo deleted");
                    Ok(())
                }
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(PhotoStoreError::from(err).into()),
            }
        }
    }

    fn resolve(
        &self,
        filename: &str,
    ) -> impl Future<Output = Result<Option<PathBuf>, StockroomError>> + Send {
        let path = self.path_of(filename);
        async move {
            let Some(path) = path else {
                return Ok(None);
            };
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => Ok(Some(path)),
                Ok(_) => Ok(None),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
                Err(err) => Err(PhotoStoreError::from(err).into()),
            }
        }
    }
}
