//! Photo uploads — raw file content as received from a client.

/// A file attached to a request.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Filename as supplied by the client. Not trusted as a path.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Wrap an upload, or return `None` when no file was really attached.
    ///
    /// Browsers submit an empty file input as a part with an empty filename.
    #[must_use]
    pub fn attached(filename: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        let filename = filename.into();
        if filename.is_empty() {
            return None;
        }
        Some(Self { filename, bytes })
    }
}

impl std::fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}
