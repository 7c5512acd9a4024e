//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they can be exercised without a database.

use crate::domain::Models;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub models: Models,
    /// Deployment environment reported by the healthcheck.
    pub environment: String,
}

impl HttpState {
    /// Bundle repositories with the deployment environment name.
    pub fn new(models: Models, environment: impl Into<String>) -> Self {
        Self {
            models,
            environment: environment.into(),
        }
    }
}
