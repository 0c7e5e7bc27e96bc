#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use common::config::AppConfig;
use serde_json::{Value, json};
use services::app::AppContext;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use util::notify::Toast;
use util::storage::{MemoryStorage, SharedStorage};

#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl Call {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

pub type Calls = Arc<Mutex<Vec<Call>>>;

/// In-process API server on an ephemeral port; routes are mounted under `/api`.
pub struct MockApi {
    pub base_url: String,
    calls: Calls,
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
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    pub fn config(&self) -> AppConfig {
        let mut cfg = AppConfig::from_env();
        cfg.api_base_url = self.base_url.clone();
        cfg.request_timeout_secs = 2;
        cfg.page_limit = 2;
        cfg.user_storage_key = "vividstream_user".into();
        cfg.token_storage_key = "token".into();
        cfg
    }

    pub fn context(&self, storage: SharedStorage) -> AppContext {
        AppContext::with_storage(&self.config(), storage).expect("app context")
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
    let path = parts.uri.path();
    calls.lock().unwrap().push(Call {
        method: parts.method.to_string(),
        path: path.strip_prefix("/api").unwrap_or(path).to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

pub fn memory() -> SharedStorage {
    MemoryStorage::shared()
}

pub fn user_json(id: &str, role: &str) -> Value {
    json!({"_id": id, "fullName": "Ada Obi", "email": "ada@example.com", "role": role})
}

/// Auth routes: `ada@example.com` / `secret1` logs in as `role`; anything else is 401.
pub fn auth_routes(role: &'static str) -> Router {
    Router::new()
        .route(
            "/users/login-user",
            axum::routing::post(move |Json(body): Json<Value>| async move {
                if body["email"] == "ada@example.com" && body["password"] == "secret1" {
                    (
                        StatusCode::OK,
                        Json(json!({"user": user_json("u1", role), "token": "jwt-u1"})),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"message": "Invalid email or password"})),
                    )
                }
            }),
        )
        .route(
            "/users/register-user",
            axum::routing::post(|Json(body): Json<Value>| async move {
                let user = json!({
                    "_id": "u2",
                    "fullName": body["fullName"],
                    "email": body["email"],
                    "role": body["role"],
                });
                (StatusCode::CREATED, Json(json!({"user": user, "token": "jwt-u2"})))
            }),
        )
}

/// A paginated collection served at `list_path` with DELETE at `item_path/{id}`.
#[derive(Clone)]
pub struct Collection {
    pub items: Arc<Mutex<Vec<Value>>>,
    /// Artificial latency per requested page.
    pub delays: Arc<Mutex<HashMap<u32, Duration>>>,
}

impl Collection {
    pub fn with_ids(count: usize) -> Self {
        let items = (1..=count).map(|i| json!({"_id": format!("r{i}"), "status": "active"})).collect();
        Self {
            items: Arc::new(Mutex::new(items)),
            delays: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn delay_page(&self, page: u32, delay: Duration) {
        self.delays.lock().unwrap().insert(page, delay);
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn routes(&self, list_path: &str, item_path: &str) -> Router {
        Router::new()
            .route(list_path, get(list_page))
            .route(&format!("{item_path}/{{id}}"), delete(delete_item).put(put_item))
            .with_state(self.clone())
    }
}

async fn list_page(State(c): State<Collection>, Query(q): Query<HashMap<String, String>>) -> Response {
    let page: u32 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = q.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);

    let delay = c.delays.lock().unwrap().get(&page).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let items = c.items.lock().unwrap().clone();
    let total_pages = items.len().div_ceil(limit).max(1);
    let start = (page as usize - 1) * limit;
    let docs: Vec<Value> = items.into_iter().skip(start).take(limit).collect();
    Json(json!({"docs": docs, "page": page, "limit": limit, "totalPages": total_pages})).into_response()
}

async fn delete_item(State(c): State<Collection>, Path(id): Path<String>) -> Response {
    let mut items = c.items.lock().unwrap();
    let before = items.len();
    items.retain(|v| v["_id"] != id.as_str());
    if items.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response();
    }
    Json(json!({"message": "Deleted"})).into_response()
}

async fn put_item(
    State(c): State<Collection>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut items = c.items.lock().unwrap();
    let Some(item) = items.iter_mut().find(|v| v["_id"] == id.as_str()) else {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response();
    };
    if let (Some(target), Some(patch)) = (item.as_object_mut(), body.as_object()) {
        for (k, v) in patch {
            target.insert(k.clone(), v.clone());
        }
    }
    Json(json!({"message": "Updated"})).into_response()
}

pub fn titles(toasts: &[Toast]) -> Vec<String> {
    toasts.iter().map(|t| t.title.clone()).collect()
}
