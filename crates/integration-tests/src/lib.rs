//! Integration tests for StudyHelper.
//!
//! Each test starts its own in-process server on an ephemeral port and talks
//! to it over real HTTP, so tests are isolated and need no external services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p study-helper-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_health() {
//!     let server = TestServer::seeded().await;
//!     let resp = server.get("/health").send().await.unwrap();
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tokio::net::TcpListener;

use study_helper_server::config::ServerConfig;
use study_helper_server::middleware::IDENTITY_HEADER;
use study_helper_server::state::AppState;
use study_helper_server::store::{MemoryStore, seed};

/// A running server plus an HTTP client pointed at it.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub store: MemoryStore,
}

impl TestServer {
    /// Start a server with the given configuration and store.
    pub async fn start(config: ServerConfig, store: MemoryStore) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let app = study_helper_server::app(AppState::new(config, store.clone()));

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            store,
        }
    }

    /// An empty store with the demo identity fallback enabled.
    pub async fn empty() -> Self {
        Self::start(ServerConfig::default(), MemoryStore::new()).await
    }

    /// A store holding the demo accounts and questions.
    pub async fn seeded() -> Self {
        let store = MemoryStore::new();
        seed::demo_data(&store).expect("Failed to seed demo data");
        Self::start(ServerConfig::default(), store).await
    }

    /// A seeded store that requires an identity header on every request.
    pub async fn strict() -> Self {
        let store = MemoryStore::new();
        seed::demo_data(&store).expect("Failed to seed demo data");
        let config = ServerConfig {
            allow_demo_identity: false,
            ..ServerConfig::default()
        };
        Self::start(config, store).await
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    /// POST `body` as JSON to `path`.
    #[must_use]
    pub fn post(&self, path: &str, body: &Value) -> RequestBuilder {
        self.client.post(self.url(path)).json(body)
    }

    /// PATCH `body` as JSON to `path`.
    #[must_use]
    pub fn patch(&self, path: &str, body: &Value) -> RequestBuilder {
        self.client.patch(self.url(path)).json(body)
    }
}

/// Extension for sending requests as a given identity.
pub trait AsIdentity {
    /// Set the `x-identity-uid` header.
    #[must_use]
    fn as_identity(self, uid: &str) -> Self;
}

impl AsIdentity for RequestBuilder {
    fn as_identity(self, uid: &str) -> Self {
        self.header(IDENTITY_HEADER, uid)
    }
}

/// Send a request and return the status and JSON body (`Null` if not JSON).
pub async fn send(request: RequestBuilder) -> (reqwest::StatusCode, Value) {
    let response = request.send().await.expect("Request failed");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// A question payload the server accepts.
#[must_use]
pub fn question_body(title: &str) -> Value {
    serde_json::json!({
        "title": title,
        "content": "Please show each step.",
        "subject": "Mathematics",
        "gradeLevel": "Grade 10",
        "difficulty": "Medium",
        "images": []
    })
}
