//! Component models and service for the Statuspage REST API.
//!
//! Components are the monitored units shown on a status page. Incidents embed
//! them, so the models here are shared with `statuspage-incidents`.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ComponentsService;
pub use models::{Component, ComponentStatus, PatchComponent};

/// Convenient result alias that reuses the shared Statuspage error type.
pub type Result<T> = statuspage_core::Result<T>;
