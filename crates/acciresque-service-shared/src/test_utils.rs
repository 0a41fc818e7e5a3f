//! Test utilities for handler testing.
//!
//! States here are backed by [`MemoryAccidentStore`], except
//! [`unreachable_store_state`] which points an HTTP store at a closed port.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use acciresque_lib::{Accident, HttpAccidentStore, MemoryAccidentStore, StoreConfig};

use crate::state::AppState;

/// An empty memory-backed state.
pub fn test_state() -> AppState {
    AppState::from_store(Arc::new(MemoryAccidentStore::new()))
}

/// A memory-backed state seeded with `accidents`.
///
/// Accidents without an `accidentId` are skipped.
pub fn test_state_with(accidents: impl IntoIterator<Item = Accident>) -> AppState {
    AppState::from_store(Arc::new(MemoryAccidentStore::with_accidents(accidents)))
}

/// A state whose HTTP store points at a port nothing listens on.
///
/// # Panics
///
/// Panics if no local port can be reserved.
pub fn unreachable_store_state() -> AppState {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("reserve local port");
        listener.local_addr().expect("local addr")
    };
    let config = StoreConfig::new(format!("http://{}", addr)).with_timeout(Duration::from_secs(2));
    let store = HttpAccidentStore::new(config).expect("valid store config");
    AppState::from_store(Arc::new(store))
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;
    use acciresque_lib::test_helpers::AccidentBuilder;

    #[test]
    fn test_state_is_memory_backed() {
        assert_eq!(test_state().backend(), "memory");
    }

    #[tokio::test]
    async fn test_state_with_seeds_store() {
        let state = test_state_with([
            AccidentBuilder::new().id("a1").build(),
            AccidentBuilder::new().id("a2").build(),
        ]);
        let ctx = acciresque_lib::CallContext::new(acciresque_lib::Operation::ListAccidents);
        let docs = state.store().list(ctx).await.unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_unreachable_store_state_is_http() {
        assert_eq!(unreachable_store_state().backend(), "http");
    }

    #[test]
    fn test_request_id_unique() {
        let id1 = test_request_id();
        let id2 = test_request_id();
        assert_ne!(id1, id2);
    }
}
