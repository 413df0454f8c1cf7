//! # stockroom-adapter-storage-memory
//!
//! In-process implementation of
//! [`DeviceRepository`](stockroom_app::ports::DeviceRepository).
//!
//! Records live in an ordered list for the lifetime of the process and are
//! lost on restart.
//!
//! ## Dependency rule
//! Depends on `stockroom-app` (for port traits) and `stockroom-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod device_repo;

pub use device_repo::InMemoryDeviceRepository;
