//! # stockroom-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository` — CRUD and search for device records
//!   - `PhotoStore` — save, delete, and locate photo files
//! - Define the **driving/inbound port** as a use-case struct:
//!   - `DeviceService` — register, list, get, update, delete, photo handling, search
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `stockroom-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
