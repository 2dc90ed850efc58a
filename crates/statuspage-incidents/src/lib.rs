//! Incident models and service for the Statuspage REST API.
//!
//! Provides typed structures for incidents and their write payloads, and an
//! asynchronous [`IncidentsService`] that lists, reads, creates, updates and
//! resolves the incidents of one status page.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::IncidentsService;
pub use models::{
    Incident, IncidentHistoryParams, IncidentImpact, IncidentStatus, IncidentUpdate,
    PatchIncident, PostIncident, ResolveOptions,
};

/// Convenient result alias that reuses the shared Statuspage error type.
pub type Result<T> = statuspage_core::Result<T>;
