//! Stored filename rules.

use chrono::{DateTime, Utc};

/// Name a stored upload: UTC timestamp to the millisecond, then the
/// sanitised client filename.
pub(crate) fn stored_name(uploaded_at: DateTime<Utc>, original: &str) -> String {
    format!(
        "{}_{}",
        uploaded_at.format("%Y%m%d%H%M%S%3f"),
        sanitize(original)
    )
}

/// Keep only the final path component and replace anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub(crate) fn sanitize(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

/// `true` when `name` can only address a file directly inside the store.
pub(crate) fn is_plain(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
