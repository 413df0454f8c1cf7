//! Storage port — repository trait for device persistence.

use std::future::Future;

use stockroom_domain::device::{Device, NewDevice};
use stockroom_domain::error::StockroomError;
use stockroom_domain::id::DeviceId;

/// Repository owning the canonical device records.
///
/// Implementations assign ids on [`create`](Self::create); an id is never
/// handed out twice, even after the record holding it is deleted.
pub trait DeviceRepository {
    /// Persist a new device and return it with its assigned id.
    fn create(
        &self,
        device: NewDevice,
    ) -> impl Future<Output = Result<Device, StockroomError>> + Send;

    /// Get a device by id.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send;

    /// List every device, in id order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, StockroomError>> + Send;

    /// Overwrite a stored device. Returns `None` when no record has that id.
    fn update(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send;

    /// Remove a device and return what was removed.
    fn delete(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send;

    /// Devices whose name contains `query`, ignoring case, in id order.
    fn find_by_name(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Device>, StockroomError>> + Send;
}
