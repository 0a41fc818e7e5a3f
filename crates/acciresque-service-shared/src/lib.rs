//! Shared infrastructure for the Acciresque HTTP service.
//!
//! This crate provides the HTTP glue around `acciresque-lib`:
//!
//! - [`AppState`]: The configured accident store, shared across handlers
//! - [`ServiceConfig`]: Port and store backend read from the environment
//! - [`health`]: Health check handlers for liveness/readiness probes
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - [`AccidentRequest`]: Request body with validation
//!
//! # Architecture
//!
//! Handlers stay thin; all accident logic resides in `acciresque-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse request JSON                                       │
//! │  - Validate body and path id                                │
//! │  - Call acciresque-lib operations                           │
//! │  - Map errors to ProblemDetails                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides memory-backed state for handler
//! testing. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ServiceConfig, StoreBackend, DEFAULT_PORT};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_accidents_returned, record_store_call, MetricsConfig,
    MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    from_lib_error, ProblemDetails, INTERNAL_ERROR_MESSAGE, PROBLEM_ACCIDENT_NOT_FOUND,
    PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST, PROBLEM_UPSTREAM_UNAVAILABLE,
};
pub use request::{json_rejection_problem, path_rejection_problem, AccidentRequest, Validate};
pub use state::{AppState, AppStateError};
