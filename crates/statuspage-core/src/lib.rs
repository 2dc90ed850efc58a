//! # statuspage-core
//!
//! Core types and utilities for working with the Statuspage REST API.
//!
//! This crate provides the shared error type, page configuration, the HTTP
//! transport abstraction consumed by the resource services, and the wire-format
//! helpers used by the model crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status reporting
//! - [`config`] - Page and credential configuration
//! - [`client`] - Transport trait and its `reqwest` implementation
//! - [`query`] - Query string builder
//! - [`patch`] - Tri-state fields for partial updates
//! - [`wire`] - Open wire enums and serde helpers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod patch;
pub mod query;
pub mod wire;

#[doc(hidden)]
pub use serde as __serde;

// Re-export commonly used types
pub use client::{HttpTransport, ReqwestTransport, TransportRequest, TransportResponse};
pub use config::StatusPageConfig;
pub use error::{Error, Result};
pub use patch::Patch;
