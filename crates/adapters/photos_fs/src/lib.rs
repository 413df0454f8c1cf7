//! # stockroom-adapter-photos-fs
//!
//! Directory-backed implementation of
//! [`PhotoStore`](stockroom_app::ports::PhotoStore).
//!
//! Files are stored flat under one directory, named
//! `<upload timestamp>_<sanitised client filename>`. The directory holds no
//! metadata; records refer to files by name only.
//!
//! ## Dependency rule
//! Depends on `stockroom-app` (for port traits) and `stockroom-domain` (for domain types).

mod error;
mod naming;
mod store;

pub use error::PhotoStoreError;
pub use store::LocalPhotoStore;
