//! Axum router assembly.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use stockroom_app::ports::{DeviceRepository, PhotoStore};

use crate::error::method_not_allowed;
use crate::state::AppState;

/// Default cap on request bodies, photo uploads included.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Knobs for [`build`].
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Serve the `/forms/*` HTML pages.
    pub serve_forms: bool,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            serve_forms: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Build the top-level axum [`Router`].
///
/// Mounts the inventory API, the OpenAPI document and, when enabled, the form
/// pages. Any path or verb without a handler gets a JSON `405`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R, P>(state: AppState<R, P>, options: RouterOptions) -> Router
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .merge(crate::docs::routes());
    if options.serve_forms {
        router = router.merge(crate::forms::routes());
    }

    router
        .fallback(method_not_allowed)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
