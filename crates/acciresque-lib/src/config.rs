//! Store connection settings.

use std::time::Duration;

use crate::context::AccessTier;

/// Default store location.
pub const DEFAULT_STORE_BASE_URL: &str =
    "https://acciresque-default-rtdb.asia-southeast1.firebasedatabase.app";

/// Default outbound timeout in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

const BASE_URL_ENV: &str = "STORE_BASE_URL";
const TIMEOUT_ENV: &str = "STORE_TIMEOUT_SECS";
const READ_CREDENTIAL_ENV: &str = "STORE_READ_CREDENTIAL";
const WRITE_CREDENTIAL_ENV: &str = "STORE_WRITE_CREDENTIAL";

/// Credential tags forwarded to the store, one per access tier.
///
/// These are literal strings the store protocol expects; they do not
/// authenticate anything on the proxy side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub read: String,
    pub write: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            read: "PUBLIC".to_string(),
            write: "ADMIN".to_string(),
        }
    }
}

impl Credentials {
    /// Resolve the tag for a tier.
    pub fn for_tier(&self, tier: AccessTier) -> &str {
        match tier {
            AccessTier::Read => &self.read,
            AccessTier::Write => &self.write,
        }
    }
}

/// Configuration for [`HttpAccidentStore`](crate::store::HttpAccidentStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    pub credentials: Credentials,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            credentials: Credentials::default(),
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// - `STORE_BASE_URL`: store root (default: the Acciresque database)
    /// - `STORE_TIMEOUT_SECS`: outbound timeout (default: 10)
    /// - `STORE_READ_CREDENTIAL` / `STORE_WRITE_CREDENTIAL`: tags (default: `PUBLIC` / `ADMIN`)
    ///
    /// Unparseable or zero timeouts fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var(BASE_URL_ENV).unwrap_or(defaults.base_url);
        let timeout = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let read = std::env::var(READ_CREDENTIAL_ENV).unwrap_or(defaults.credentials.read);
        let write = std::env::var(WRITE_CREDENTIAL_ENV).unwrap_or(defaults.credentials.write);

        Self::new(base_url)
            .with_timeout(timeout)
            .with_credentials(Credentials { read, write })
    }

    /// Configuration for `base_url` with default timeout and credentials.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credentials_match_store_convention() {
        let creds = Credentials::default();
        assert_eq!(creds.for_tier(AccessTier::Read), "PUBLIC");
        assert_eq!(creds.for_tier(AccessTier::Write), "ADMIN");
    }

    #[test]
    fn new_trims_trailing_slashes() {
        let config = StoreConfig::new("http://127.0.0.1:9000//");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS));
    }

    #[test]
    fn builder_overrides() {
        let config = StoreConfig::new("http://store")
            .with_timeout(Duration::from_millis(250))
            .with_credentials(Credentials {
                read: "R".to_string(),
                write: "W".to_string(),
            });
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.credentials.for_tier(AccessTier::Write), "W");
    }
}
