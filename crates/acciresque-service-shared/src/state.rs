//! Application state for the HTTP service.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the accident store.

use std::sync::Arc;

use acciresque_lib::{AccidentStore, Error as LibError, HttpAccidentStore, MemoryAccidentStore};

use crate::config::{ServiceConfig, StoreBackend};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to build the HTTP store client.
    StoreInit(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreInit(e) => write!(f, "failed to initialize accident store: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreInit(e) => Some(e),
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::StoreInit(err)
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor. It holds no request data.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use acciresque_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     let store = state.store();
///     // ... call acciresque_lib operations with the store
/// }
///
/// let state = AppState::from_config(&ServiceConfig::from_env()).unwrap();
/// let app = Router::new()
///     .route("/accidents", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn AccidentStore>,
}

impl AppState {
    /// Build application state for the configured backend.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AppStateError> {
        let store: Arc<dyn AccidentStore> = match config.backend {
            StoreBackend::Http => {
                tracing::info!(
                    base_url = %config.store.base_url,
                    timeout_ms = config.store.timeout.as_millis() as u64,
                    "using http accident store"
                );
                Arc::new(HttpAccidentStore::new(config.store.clone())?)
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory accident store; data is lost on restart");
                Arc::new(MemoryAccidentStore::new())
            }
        };

        Ok(Self::from_store(store))
    }

    /// Create application state around an existing store.
    ///
    /// This is useful for testing.
    pub fn from_store(store: Arc<dyn AccidentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Access the accident store.
    pub fn store(&self) -> &dyn AccidentStore {
        self.inner.store.as_ref()
    }

    /// Label of the store backend in use.
    pub fn backend(&self) -> &'static str {
        self.inner.store.backend()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend())
            .finish()
    }
}
