use crate::types::{HealthRes, ServiceInfoRes};
use crate::API_VERSION;

/// Simple health service used by the REST API.
///
/// Provides the liveness payload and the service banner served at `/`.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Returns the liveness payload.
    ///
    /// # Returns
    /// A `HealthRes` reporting `"healthy"`.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "healthy".into(),
        }
    }

    /// Returns the service banner pointing callers at the interactive docs.
    ///
    /// # Arguments
    /// * `docs_path` - Path where the Swagger UI is mounted.
    pub fn service_info(docs_path: &str) -> ServiceInfoRes {
        ServiceInfoRes {
            message: "HealthSense AI API is running".into(),
            version: API_VERSION.into(),
            docs: docs_path.into(),
        }
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}
