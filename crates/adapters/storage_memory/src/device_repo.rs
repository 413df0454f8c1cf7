//! In-memory implementation of [`DeviceRepository`].

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use stockroom_app::ports::DeviceRepository;
use stockroom_domain::device::{Device, NewDevice};
use stockroom_domain::error::StockroomError;
use stockroom_domain::id::DeviceId;
use stockroom_domain::search::name_contains;

#[derive(Debug, Default)]
struct Inner {
    /// Kept sorted by id; ids only grow.
    devices: Vec<Device>,
    /// Highest id ever handed out, so deleted ids are not reused.
    last_id: Option<DeviceId>,
}

impl Inner {
    fn next_id(&self) -> DeviceId {
        let current_max = self.devices.last().map(|d| d.id);
        current_max
            .max(self.last_id)
            .map_or(DeviceId::new(1), DeviceId::next)
    }

    fn position(&self, id: DeviceId) -> Option<usize> {
        self.devices.binary_search_by_key(&id, |d| d.id).ok()
    }
}

/// Process-local device repository.
#[derive(Debug, Default)]
pub struct InMemoryDeviceRepository {
    inner: Mutex<Inner>,
}

impl InMemoryDeviceRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave `Inner` half-written:
        // every mutation is a single push/replace/remove.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceRepository for InMemoryDeviceRepository {
    fn create(
        &self,
        device: NewDevice,
    ) -> impl Future<Output = Result<Device, StockroomError>> + Send {
        let mut inner = self.lock();
        let id = inner.next_id();
        let device = device.into_device(id);
        inner.devices.push(device.clone());
        inner.last_id = Some(id);
        async { Ok(device) }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
        let inner = self.lock();
        let result = inner.position(id).map(|idx| inner.devices[idx].clone());
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, StockroomError>> + Send {
        let result = self.lock().devices.clone();
        async { Ok(result) }
    }

    fn update(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
        let mut inner = self.lock();
        let result = inner.position(device.id).map(|idx| {
            inner.devices[idx] = device.clone();
            device
        });
        async { Ok(result) }
    }

    fn delete(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
        let mut inner = self.lock();
        let result = inner.position(id).map(|idx| inner.devices.remove(idx));
        async { Ok(result) }
    }

    fn find_by_name(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Device>, StockroomError>> + Send {
        let result: Vec<Device> = self
            .lock()
            .devices
            .iter()
            .filter(|d| name_contains(&d.inventory_name, query))
            .cloned()
            .collect();
        async { Ok(result) }
    }
}
