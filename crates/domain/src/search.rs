//! Search criteria.
//!
//! Two lookup modes share the `/search` endpoint: an exact id lookup that can
//! hide the photo reference, and a case-insensitive substring match on the
//! device name.

use crate::error::{StockroomError, ValidationError};
use crate::id::DeviceId;

/// How to look devices up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    /// Exact id. The photo reference is hidden unless `include_photo`.
    ById { id: DeviceId, include_photo: bool },
    /// Case-insensitive substring of `inventory_name`.
    ByName(String),
}

impl SearchCriterion {
    /// Build a name search, rejecting an empty query.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingQuery`] when `query` is empty.
    pub fn by_name(query: impl Into<String>) -> Result<Self, StockroomError> {
        let query = query.into();
        if query.is_empty() {
            return Err(ValidationError::MissingQuery.into());
        }
        Ok(Self::ByName(query))
    }
}

/// Whether `name` contains `query`, ignoring case.
///
/// Both sides are folded with Unicode lowercasing, so `"äpfel"` finds
/// `"Äpfelschäler"`. Every repository filters names through this so the
/// backends agree on what matches.
#[must_use]
pub fn name_contains(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Interpret a form flag the way HTML forms and JSON clients send it.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}
