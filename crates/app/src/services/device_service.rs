//! Device service — use-cases for managing devices and their photos.

use std::path::PathBuf;

use stockroom_domain::device::{Device, DevicePatch, NewDevice};
use stockroom_domain::error::{NotFoundError, StockroomError, ValidationError};
use stockroom_domain::id::DeviceId;
use stockroom_domain::photo::PhotoUpload;
use stockroom_domain::search::SearchCriterion;

use crate::ports::{DeviceRepository, PhotoStore};

/// Result of a [`DeviceService::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Exact id hit. Callers hide `photo` unless `include_photo`.
    Device { device: Device, include_photo: bool },
    /// Name matches, possibly empty.
    Matches(Vec<Device>),
}

/// Application service for device CRUD, photo handling, and search.
pub struct DeviceService<R, P> {
    repo: R,
    photos: P,
}

impl<R: DeviceRepository, P: PhotoStore> DeviceService<R, P> {
    /// Create a new service backed by the given repository and photo store.
    pub fn new(repo: R, photos: P) -> Self {
        Self { repo, photos }
    }

    /// Register a new device, storing its photo first when one is attached.
    ///
    /// Validation happens before anything is written, so a rejected request
    /// leaves neither a record nor a file behind.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::Validation`] if invariants fail, or a
    /// storage/photo error propagated from the ports.
    #[tracing::instrument(skip(self, device, photo), fields(inventory_name = %device.inventory_name))]
    pub async fn register_device(
        &self,
        mut device: NewDevice,
        photo: Option<PhotoUpload>,
    ) -> Result<Device, StockroomError> {
        device.validate()?;
        if let Some(upload) = photo {
            device.photo = Some(self.photos.save(upload).await?);
        }
        let created = self.repo.create(device).await?;
        tracing::info!(id = %created.id, "device registered");
        Ok(created)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, StockroomError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| device_not_found(id))
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_devices(&self) -> Result<Vec<Device>, StockroomError> {
        self.repo.get_all().await
    }

    /// Apply a partial update, optionally replacing the photo.
    ///
    /// Only non-empty patch fields are written. When the photo changes, the
    /// previously referenced file is removed after the record is saved.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::NotFound`] when no device with `id` exists,
    /// or a storage/photo error propagated from the ports.
    #[tracing::instrument(skip(self, patch, photo))]
    pub async fn update_device(
        &self,
        id: DeviceId,
        mut patch: DevicePatch,
        photo: Option<PhotoUpload>,
    ) -> Result<Device, StockroomError> {
        let mut device = self.get_device(id).await?;
        patch.photo = match photo {
            Some(upload) => Some(self.photos.save(upload).await?),
            None => None,
        };
        let previous = patch.apply(&mut device);

        let updated = self
            .repo
            .update(device)
            .await?
            .ok_or_else(|| device_not_found(id))?;

        if let Some(previous) = previous {
            self.discard_photo(&previous).await;
        }
        Ok(updated)
    }

    /// Replace the photo of an existing device.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::NotFound`] when no device with `id` exists,
    /// [`ValidationError::MissingPhoto`] when no file is attached, or a
    /// storage/photo error propagated from the ports.
    #[tracing::instrument(skip(self, photo))]
    pub async fn replace_photo(
        &self,
        id: DeviceId,
        photo: Option<PhotoUpload>,
    ) -> Result<Device, StockroomError> {
        self.get_device(id).await?;
        let upload = photo.ok_or(ValidationError::MissingPhoto)?;
        self.update_device(id, DevicePatch::default(), Some(upload))
            .await
    }

    /// Delete a device and its photo file, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, id: DeviceId) -> Result<Device, StockroomError> {
        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| device_not_found(id))?;
        if let Some(photo) = &removed.photo {
            self.discard_photo(photo).await;
        }
        tracing::info!(%id, "device deleted");
        Ok(removed)
    }

    /// Locate the photo file of a device.
    ///
    /// Returns `Ok(None)` when the record points at a file that is no longer
    /// on disk.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::NotFound`] when no device with `id` exists or
    /// it has no photo, or a storage/photo error propagated from the ports.
    #[tracing::instrument(skip(self))]
    pub async fn photo_file(&self, id: DeviceId) -> Result<Option<PathBuf>, StockroomError> {
        let device = self.get_device(id).await?;
        let Some(photo) = device.photo else {
            return Err(NotFoundError {
                entity: "Photo for device",
                id: id.to_string(),
            }
            .into());
        };
        self.photos.resolve(&photo).await
    }

    /// Search devices by exact id or by name substring.
    ///
    /// # Errors
    ///
    /// Returns [`StockroomError::NotFound`] for an id search without a hit,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, criterion: SearchCriterion) -> Result<SearchOutcome, StockroomError> {
        match criterion {
            SearchCriterion::ById { id, include_photo } => {
                let device = self.get_device(id).await?;
                Ok(SearchOutcome::Device {
                    device,
                    include_photo,
                })
            }
            SearchCriterion::ByName(query) => {
                let matches = self.repo.find_by_name(&query).await?;
                Ok(SearchOutcome::Matches(matches))
            }
        }
    }

    /// Remove a file that no record references any more.
    ///
    /// The record change it follows has already been committed, so a failure
    /// here is logged and swallowed.
    async fn discard_photo(&self, filename: &str) {
        if let Err(err) = self.photos.delete(filename).await {
            tracing::warn!(error = %err, filename, "failed to delete photo file");
        }
    }
}

fn device_not_found(id: DeviceId) -> StockroomError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryDeviceRepo {
        store: Mutex<BTreeMap<DeviceId, Device>>,
    }

    impl DeviceRepository for InMemoryDeviceRepo {
        fn create(
            &self,
            device: NewDevice,
        ) -> impl Future<Output = Result<Device, StockroomError>> + Send {
            let mut store = self.store.lock().unwrap();
            let id = store
                .keys()
                .next_back()
                .map_or(DeviceId::new(1), |last| last.next());
            let device = device.into_device(id);
            store.insert(id, device.clone());
            async { Ok(device) }
        }

        fn get_by_id(
            &self,
            id: DeviceId,
        ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
            let result = self.store.lock().unwrap().get(&id).cloned();
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, StockroomError>> + Send {
            let result: Vec<Device> = self.store.lock().unwrap().values().cloned().collect();
            async { Ok(result) }
        }

        fn update(
            &self,
            device: Device,
        ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = store
                .get_mut(&device.id)
                .map(|slot| {
                    *slot = device.clone();
                    device
                });
            async { Ok(result) }
        }

        fn delete(
            &self,
            id: DeviceId,
        ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
            let result = self.store.lock().unwrap().remove(&id);
            async { Ok(result) }
        }

        fn find_by_name(
            &self,
            query: &str,
        ) -> impl Future<Output = Result<Vec<Device>, StockroomError>> + Send {
            let query = query.to_lowercase();
            let result: Vec<Device> = self
                .store
                .lock()
                .unwrap()
                .values()
                .filter(|d| d.inventory_name.to_lowercase().contains(&query))
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    #[derive(Default)]
    struct InMemoryPhotoStore {
        files: Mutex<BTreeMap<String, Vec<u8>>>,
        counter: Mutex<u32>,
    }

    impl InMemoryPhotoStore {
        fn contains(&self, filename: &str) -> bool {
            self.files.lock().unwrap().contains_key(filename)
        }

        fn len(&self) -> usize {
            self.files.lock().unwrap().len()
        }
    }

    impl PhotoStore for InMemoryPhotoStore {
        fn save(
            &self,
            upload: PhotoUpload,
        ) -> impl Future<Output = Result<String, StockroomError>> + Send {
            let mut counter = self.counter.lock().unwrap();
            *counter += 1;
            let name = format!("{}_{}", *counter, upload.filename);
            self.files
                .lock()
                .unwrap()
                .insert(name.clone(), upload.bytes);
            async { Ok(name) }
        }

        fn delete(&self, filename: &str) -> impl Future<Output = Result<(), StockroomError>> + Send {
            self.files.lock().unwrap().remove(filename);
            async { Ok(()) }
        }

        fn resolve(
            &self,
            filename: &str,
        ) -> impl Future<Output = Result<Option<PathBuf>, StockroomError>> + Send {
            let result = self
                .contains(filename)
                .then(|| PathBuf::from("/photos").join(filename));
            async { Ok(result) }
        }
    }

    type Service = DeviceService<InMemoryDeviceRepo, InMemoryPhotoStore>;

    fn make_service() -> Service {
        DeviceService::new(InMemoryDeviceRepo::default(), InMemoryPhotoStore::default())
    }

    fn drill() -> NewDevice {
        Device::builder()
            .inventory_name("Drill")
            .description("cordless")
            .build()
            .unwrap()
    }

    fn upload(name: &str) -> Option<PhotoUpload> {
        PhotoUpload::attached(name, name.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn should_register_device_without_photo() {
        let svc = make_service();

        let created = svc.register_device(drill(), None).await.unwrap();

        assert_eq!(created.id, DeviceId::new(1));
        assert_eq!(created.inventory_name, "Drill");
        assert_eq!(created.description, "cordless");
        assert!(created.photo.is_none());
    }

    #[tokio::test]
    async fn should_store_photo_when_registering_with_upload() {
        let svc = make_service();

        let created = svc
            .register_device(drill(), upload("drill.jpg"))
            .await
            .unwrap();

        let photo = created.photo.unwrap();
        assert!(svc.photos.contains(&photo));
    }

    #[tokio::test]
    async fn should_not_store_photo_when_registration_is_invalid() {
        let svc = make_service();
        let mut device = drill();
        device.inventory_name = String::new();

        let result = svc.register_device(device, upload("drill.jpg")).await;

        assert!(matches!(
            result,
            Err(StockroomError::Validation(ValidationError::EmptyName))
        ));
        assert_eq!(svc.photos.len(), 0);
        assert!(svc.list_devices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_not_found_when_device_missing() {
        let svc = make_service();
        let result = svc.get_device(DeviceId::new(9)).await;
        assert!(matches!(result, Err(StockroomError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_keep_description_when_update_omits_it() {
        let svc = make_service();
        let created = svc.register_device(drill(), None).await.unwrap();

        let patch = DevicePatch {
            inventory_name: Some("Impact drill".to_string()),
            ..DevicePatch::default()
        };
        let updated = svc.update_device(created.id, patch, None).await.unwrap();

        assert_eq!(updated.inventory_name, "Impact drill");
        assert_eq!(updated.description, "cordless");
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_device() {
        let svc = make_service();

        let result = svc
            .update_device(DeviceId::new(5), DevicePatch::default(), upload("x.jpg"))
            .await;

        assert!(matches!(result, Err(StockroomError::NotFound(_))));
        assert_eq!(svc.photos.len(), 0);
    }

    #[tokio::test]
    async fn should_delete_previous_photo_when_replacing() {
        let svc = make_service();
        let created = svc
            .register_device(drill(), upload("old.jpg"))
            .await
            .unwrap();
        let old = created.photo.unwrap();

        let updated = svc
            .replace_photo(created.id, upload("new.jpg"))
            .await
            .unwrap();

        let new = updated.photo.unwrap();
        assert_ne!(old, new);
        assert!(!svc.photos.contains(&old));
        assert!(svc.photos.contains(&new));
    }

    #[tokio::test]
    async fn should_reject_photo_replacement_without_file() {
        let svc = make_service();
        let created = svc.register_device(drill(), None).await.unwrap();

        let result = svc.replace_photo(created.id, None).await;

        assert!(matches!(
            result,
            Err(StockroomError::Validation(ValidationError::MissingPhoto))
        ));
    }

    #[tokio::test]
    async fn should_report_not_found_before_missing_file_on_replacement() {
        let svc = make_service();
        let result = svc.replace_photo(DeviceId::new(3), None).await;
        assert!(matches!(result, Err(StockroomError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_record_and_photo() {
        let svc = make_service();
        let created = svc
            .register_device(drill(), upload("drill.jpg"))
            .await
            .unwrap();
        let photo = created.photo.clone().unwrap();

        let removed = svc.delete_device(created.id).await.unwrap();

        assert_eq!(removed, created);
        assert!(!svc.photos.contains(&photo));
        assert!(matches!(
            svc.get_device(created.id).await,
            Err(StockroomError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_device() {
        let svc = make_service();
        let result = svc.delete_device(DeviceId::new(1)).await;
        assert!(matches!(result, Err(StockroomError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_resolve_photo_file() {
        let svc = make_service();
        let created = svc
            .register_device(drill(), upload("drill.jpg"))
            .await
            .unwrap();

        let path = svc.photo_file(created.id).await.unwrap().unwrap();

        assert!(path.ends_with(created.photo.unwrap()));
    }

    #[tokio::test]
    async fn should_return_not_found_when_device_has_no_photo() {
        let svc = make_service();
        let created = svc.register_device(drill(), None).await.unwrap();

        let result = svc.photo_file(created.id).await;

        assert!(matches!(result, Err(StockroomError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_none_when_photo_file_vanished() {
        let svc = make_service();
        let created = svc
            .register_device(drill(), upload("drill.jpg"))
            .await
            .unwrap();
        svc.photos.files.lock().unwrap().clear();

        let result = svc.photo_file(created.id).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_search_by_id_and_carry_photo_flag() {
        let svc = make_service();
        let created = svc.register_device(drill(), None).await.unwrap();

        let outcome = svc
            .search(SearchCriterion::ById {
                id: created.id,
                include_photo: false,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SearchOutcome::Device {
                device: created,
                include_photo: false,
            }
        );
    }

    #[tokio::test]
    async fn should_search_by_name_substring_ignoring_case() {
        let svc = make_service();
        svc.register_device(drill(), None).await.unwrap();
        svc.register_device(
            Device::builder()
                .inventory_name("Ladder")
                .build()
                .unwrap(),
            None,
        )
        .await
        .unwrap();

        let hits = svc
            .search(SearchCriterion::by_name("DRI").unwrap())
            .await
            .unwrap();
        let SearchOutcome::Matches(hits) = hits else {
            panic!("expected name matches");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].inventory_name, "Drill");

        let none = svc
            .search(SearchCriterion::by_name("zzz").unwrap())
            .await
            .unwrap();
        assert_eq!(none, SearchOutcome::Matches(vec![]));
    }

    /// Records the name of every span opened while it is the default subscriber.
    #[derive(Clone, Default)]
    struct SpanNames(Arc<Mutex<Vec<&'static str>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanNames {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            self.0.lock().unwrap().push(attrs.metadata().name());
        }
    }

    #[tokio::test]
    async fn should_open_a_span_for_every_service_call() {
        use tracing_subscriber::layer::SubscriberExt;

        let names = SpanNames::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(names.clone()));

        let svc = make_service();
        let device = svc.register_device(drill(), None).await.unwrap();
        svc.list_devices().await.unwrap();
        svc.get_device(device.id).await.unwrap();
        svc.search(SearchCriterion::by_name("dri").unwrap())
            .await
            .unwrap();
        svc.delete_device(device.id).await.unwrap();

        let names = names.0.lock().unwrap();
        for expected in [
            "register_device",
            "list_devices",
            "get_device",
            "search",
            "delete_device",
        ] {
            assert!(names.contains(&expected), "no span for {expected}");
        }
    }
}
