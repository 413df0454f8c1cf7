//! # stockroom-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **inventory JSON API** (`/register`, `/inventory`, `/search`, …)
//! - Stream stored **photo files** back with a content type guessed from the
//!   file extension
//! - Publish an **OpenAPI document** at `/openapi.json` and a browsable UI at `/docs`
//! - Optionally serve plain **HTML form pages** that post to the API
//! - Answer every unmapped path or verb with a uniform `405`
//! - Map HTTP requests into application service calls (driving adapter)
//!
//! ## Request bodies
//! `/register`, `/search`, and the `PUT` endpoints accept JSON,
//! URL-encoded forms, and multipart forms alike; see [`submission`].
//!
//! ## Dependency rule
//! Depends on `stockroom-app` (for port traits and services) and
//! `stockroom-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod docs;
pub mod error;
pub mod forms;
pub mod router;
pub mod state;
pub mod submission;
