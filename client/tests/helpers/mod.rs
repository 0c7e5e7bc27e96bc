#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    middleware::{self, Next},
    response::Response,
};
use client::{ApiClient, ClientConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use util::storage::{MemoryStorage, SharedStorage};

/// A request as the mock API saw it.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Call {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

pub type Calls = Arc<Mutex<Vec<Call>>>;

/// In-process API server bound to an ephemeral port; routes live under `/api`.
pub struct MockApi {
    pub base_url: String,
    pub calls: Calls,
    task: JoinHandle<()>,
}

impl MockApi {
    pub async fn spawn(routes: Router) -> Self {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let recorder = calls.clone();

        let app = Router::new()
            .nest("/api", routes)
            .layer(middleware::from_fn(move |req: Request, next: Next| {
                let recorder = recorder.clone();
                async move { record(recorder, req, next).await }
            }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("mock api addr");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api serve");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            calls,
            task,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.path == path)
            .collect()
    }

    pub fn client(&self, storage: SharedStorage) -> ApiClient {
        self.client_with_timeout(storage, Duration::from_secs(5))
    }

    pub fn client_with_timeout(&self, storage: SharedStorage, timeout: Duration) -> ApiClient {
        ApiClient::new(
            ClientConfig {
                base_url: self.base_url.clone(),
                timeout,
                token_key: "token".into(),
            },
            storage,
        )
        .expect("client")
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn record(calls: Calls, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    calls.lock().unwrap().push(Call {
        method: parts.method.to_string(),
        path: api_path(parts.uri.path()),
        query: parts.uri.query().map(str::to_string),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Path relative to the `/api` mount, whichever form the layer observes.
fn api_path(path: &str) -> String {
    path.strip_prefix("/api").unwrap_or(path).to_string()
}

/// Memory storage pre-seeded with a bearer token.
pub fn storage_with_token(token: &str) -> SharedStorage {
    let storage = MemoryStorage::shared();
    storage.set_item("token", token).expect("seed token");
    storage
}
