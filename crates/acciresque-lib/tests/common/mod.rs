//! Common test utilities: a scripted fake store served over real HTTP.
//!
//! The fake records every request it receives and answers each one with the
//! same scripted reply, so tests can assert on both the wire format the
//! client produces and how it reacts to what the store sends back.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use acciresque_lib::{HttpAccidentStore, StoreConfig};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;

/// What the fake store answers with.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
    Stall(Duration),
}

/// A request as seen by the fake store.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct FakeState {
    reply: Reply,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct FakeStore {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl FakeStore {
    pub async fn start(reply: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            reply,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake store");
        let addr = listener.local_addr().expect("fake store address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake store serves");
        });

        Self { addr, requests }
    }

    pub async fn json(reply: Value) -> Self {
        Self::start(Reply::Json(StatusCode::OK, reply)).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> HttpAccidentStore {
        HttpAccidentStore::new(StoreConfig::new(self.base_url())).expect("client builds")
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> HttpAccidentStore {
        HttpAccidentStore::new(StoreConfig::new(self.base_url()).with_timeout(timeout))
            .expect("client builds")
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn only_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one store call");
        requests.into_iter().next().expect("one request")
    }
}

async fn record(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    state.requests.lock().expect("requests lock").push(Recorded {
        method,
        path: uri.path().to_string(),
        query,
        body,
    });

    match state.reply {
        Reply::Json(status, value) => (status, axum::Json(value)).into_response(),
        Reply::Raw(status, text) => (status, text).into_response(),
        Reply::Stall(delay) => {
            tokio::time::sleep(delay).await;
            StatusCode::OK.into_response()
        }
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    addr
}
