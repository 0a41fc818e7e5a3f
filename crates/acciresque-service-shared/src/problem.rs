//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>
//!
//! Every problem also carries an `error` member holding a short caller-safe
//! message, so clients that only look for `{error}` keep working.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use acciresque_lib::Error as LibError;

/// Problem type URI for accidents that do not exist.
pub const PROBLEM_ACCIDENT_NOT_FOUND: &str = "/problems/accident-not-found";

/// Problem type URI for invalid request parameters or bodies.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for a store that could not be reached or refused the call.
pub const PROBLEM_UPSTREAM_UNAVAILABLE: &str = "/problems/upstream-unavailable";

/// Opaque message for every 5xx outcome.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use acciresque_service_shared::{ProblemDetails, PROBLEM_ACCIDENT_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_ACCIDENT_NOT_FOUND,
///     "Accident Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("Accident 'a1' not found")
/// .with_request_id("req-12345");
/// assert_eq!(problem.error, "Accident Not Found");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Caller-safe message; never contains upstream text.
    pub error: String,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (e.g., request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create a new ProblemDetails; `error` defaults to the title.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        let title = title.into();
        Self {
            type_uri: type_uri.into(),
            error: title.clone(),
            title,
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Override the caller-facing `error` message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_error(detail.clone())
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for a missing accident.
    pub fn accident_not_found(id: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ACCIDENT_NOT_FOUND,
            "Accident Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("Accident '{}' not found", id))
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem with the opaque message.
    pub fn internal_error(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_error(INTERNAL_ERROR_MESSAGE)
        .with_request_id(request_id)
    }

    /// Create a 502 Bad Gateway problem for store failures.
    pub fn upstream_unavailable(request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_UNAVAILABLE,
            "Upstream Unavailable",
            StatusCode::BAD_GATEWAY,
        )
        .with_error(INTERNAL_ERROR_MESSAGE)
        .with_detail("The accident store could not complete the request")
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// Upstream text never leaves this function: store failures map to opaque
/// problems, and only validation messages (which describe the caller's own
/// input) are echoed.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::NotFound { id } => ProblemDetails::accident_not_found(id, request_id),
        LibError::Validation { .. } => ProblemDetails::bad_request(error.to_string(), request_id),
        LibError::UpstreamUnavailable { .. } | LibError::UpstreamStatus { .. } => {
            ProblemDetails::upstream_unavailable(request_id)
        }
        LibError::UpstreamMalformed { .. } | LibError::Client(_) | LibError::InvalidConfig { .. } => {
            ProblemDetails::internal_error(request_id)
        }
    }
}
