//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`StockroomError`] via `From`. Adapter failures are boxed so the domain
//! never names an IO crate.

/// Boxed adapter error carried by the infrastructure variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum StockroomError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The storage backend failed.
    #[error("storage error")]
    Storage(#[source] BoxError),

    /// The photo store failed.
    #[error("photo store error")]
    Photos(#[source] BoxError),
}

/// Input rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("inventory_name is required")]
    EmptyName,

    #[error("no photo file attached")]
    MissingPhoto,

    #[error("query is required")]
    MissingQuery,

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("request body too large")]
    PayloadTooLarge,
}

/// A record (or a file a record points to) does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
