//! Health check handlers for liveness and readiness probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses. Neither probe contacts the accident store.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Store backend in use (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

impl HealthStatus {
    /// Create a healthy liveness status.
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            store: None,
        }
    }

    /// Create a ready status naming the store backend.
    pub fn ready(service: &str, version: &str, store: &str) -> Self {
        Self {
            store: Some(store.to_string()),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"acciresque-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// The service holds no data of its own, so it is ready once the store
/// client exists.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"acciresque-service-shared","version":"0.1.0","store":"http"}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus::ready(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        state.backend(),
    );
    (StatusCode::OK, Json(status))
}
