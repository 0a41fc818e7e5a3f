//! Service configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `PORT`: HTTP port (default: 3000)
//! - `STORE_BACKEND`: `http` (default) or `memory`
//! - `STORE_BASE_URL`, `STORE_TIMEOUT_SECS`, `STORE_READ_CREDENTIAL`,
//!   `STORE_WRITE_CREDENTIAL`: see [`StoreConfig::from_env`]

use acciresque_lib::StoreConfig;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Which store implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Remote document store over HTTP (default, production).
    #[default]
    Http,
    /// In-process store (development and tests).
    Memory,
}

impl StoreBackend {
    /// Parse a backend name.
    ///
    /// Accepts "memory" or "mem"; returns `Http` for any other value.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => StoreBackend::Memory,
            _ => StoreBackend::Http,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Http => "http",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Top-level configuration for the accident service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub backend: StoreBackend,
    pub store: StoreConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend: StoreBackend::default(),
            store: StoreConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// An unparseable `PORT` falls back to the default.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let backend = std::env::var("STORE_BACKEND")
            .map(|v| StoreBackend::parse(&v))
            .unwrap_or_default();

        Self {
            port,
            backend,
            store: StoreConfig::from_env(),
        }
    }
}
