//! # API Shared
//!
//! Shared wire definitions for the HealthSense APIs.
//!
//! Contains:
//! - Request/response types for the REST surface (`types` module), with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `healthsense-core` and `api-rest` so both speak exactly the same JSON.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;

/// Public API version string reported by the service banner.
pub const API_VERSION: &str = "1.0.0";
