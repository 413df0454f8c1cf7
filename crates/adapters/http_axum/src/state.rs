//! Shared application state for axum handlers.

use std::sync::Arc;

use stockroom_app::ports::{DeviceRepository, PhotoStore};
use stockroom_app::services::device_service::DeviceService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository and photo store types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<R, P> {
    /// Device CRUD, photo, and search service.
    pub device_service: Arc<DeviceService<R, P>>,
}

impl<R, P> Clone for AppState<R, P> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
        }
    }
}

impl<R, P> AppState<R, P>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(device_service: DeviceService<R, P>) -> Self {
        Self::from_arc(Arc::new(device_service))
    }

    /// Create a new application state from a pre-wrapped `Arc` service.
    ///
    /// Use this when the service is also needed outside the HTTP layer.
    pub fn from_arc(device_service: Arc<DeviceService<R, P>>) -> Self {
        Self { device_service }
    }
}
