//! Inventory API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod photos;
#[allow(clippy::missing_errors_doc)]
pub mod search;

use axum::Router;
use axum::routing::{get, post};

use stockroom_app::ports::{DeviceRepository, PhotoStore};

use crate::state::AppState;

/// Build the inventory API routes.
pub fn routes<R, P>() -> Router<AppState<R, P>>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(devices::register::<R, P>))
        .route("/inventory", get(devices::list::<R, P>))
        .route(
            "/inventory/{id}",
            get(devices::get::<R, P>)
                .put(devices::update::<R, P>)
                .delete(devices::delete::<R, P>),
        )
        .route(
            "/inventory/{id}/photo",
            get(photos::get::<R, P>).put(photos::replace::<R, P>),
        )
        .route("/search", post(search::search::<R, P>))
}
