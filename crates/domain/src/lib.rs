//! # stockroom-domain
//!
//! Pure domain model for the stockroom inventory service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define the **Device** record (an inventoried item with an optional photo)
//! - Define **patches** (partial updates with "only overwrite when present" rules)
//! - Define **search criteria** (by exact id, or by name substring)
//! - Define **photo uploads** (raw bytes plus the client-supplied filename)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod device;
pub mod photo;
pub mod search;
