//! Shared test harness: an in-process stand-in for the PostgREST backing
//! store plus helpers to drive the real router against it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{RawQuery, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceExt;

use afiliados_api::config::{AppConfig, StoreConfig};
use afiliados_api::{build_state, router};

/// Canned behavior and request capture for the mock store.
pub struct MockStore {
    pub rows: Mutex<Value>,
    /// Raw `Content-Range` header value; `None` omits the header.
    pub content_range: Mutex<Option<String>>,
    /// Status returned while `fail_times` has not been exhausted.
    pub fail_status: Mutex<u16>,
    pub fail_times: Mutex<u32>,
    pub captured: Mutex<Vec<Vec<(String, String)>>>,
    pub hits: Mutex<u32>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(json!([])),
            content_range: Mutex::new(Some("*/0".to_string())),
            fail_status: Mutex::new(500),
            fail_times: Mutex::new(0),
            captured: Mutex::new(Vec::new()),
            hits: Mutex::new(0),
        })
    }

    pub fn with_rows(rows: Value, content_range: &str) -> Arc<Self> {
        let mock = Self::new();
        *mock.rows.lock().unwrap() = rows;
        *mock.content_range.lock().unwrap() = Some(content_range.to_string());
        mock
    }

    /// Return `status` for the first `times` requests, then succeed.
    pub fn failing(status: u16, times: u32) -> Arc<Self> {
        let mock = Self::new();
        *mock.fail_status.lock().unwrap() = status;
        *mock.fail_times.lock().unwrap() = times;
        mock
    }

    pub fn hit_count(&self) -> u32 {
        *self.hits.lock().unwrap()
    }

    /// Query pairs of the most recent request, in wire order.
    pub fn last_query(&self) -> Vec<(String, String)> {
        self.captured.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

async fn store_handler(
    State(mock): State<Arc<MockStore>>,
    RawQuery(query): RawQuery,
) -> Response {
    let pairs: Vec<(String, String)> = query.map_or_else(Vec::new, |raw| {
        url::form_urlencoded::parse(raw.as_bytes())
            .into_owned()
            .collect()
    });
    mock.captured.lock().unwrap().push(pairs);

    let hit = {
        let mut guard = mock.hits.lock().unwrap();
        *guard += 1;
        *guard
    };
    if hit <= *mock.fail_times.lock().unwrap() {
        let status = StatusCode::from_u16(*mock.fail_status.lock().unwrap())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "upstream boom").into_response();
    }

    let rows = mock.rows.lock().unwrap().clone();
    let mut response = Json(rows).into_response();
    if let Some(range) = mock.content_range.lock().unwrap().clone() {
        response
            .headers_mut()
            .insert("content-range", range.parse().unwrap());
    }
    response
}

/// Serve the mock store on an ephemeral port; returns its base URL.
pub async fn spawn_store(mock: Arc<MockStore>) -> String {
    let app = Router::new()
        .route("/rest/v1/afiliados_personal", get(store_handler))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_config(store_url: &str) -> AppConfig {
    AppConfig {
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        max_page_size: 10_000,
        missing_store_vars: Vec::new(),
        store: Some(StoreConfig {
            base_url: store_url.to_string(),
            service_role_key: "test-service-key".to_string(),
            anon_key: "test-anon-key".to_string(),
            table: "afiliados_personal".to_string(),
            request_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            max_retries: 2,
        }),
    }
}

/// Real app router wired to the given mock store.
pub async fn setup_app(mock: Arc<MockStore>) -> Router {
    let url = spawn_store(mock).await;
    router(build_state(test_config(&url)))
}

/// Router with the store left unconfigured (degraded deployment).
pub fn setup_unconfigured_app() -> Router {
    router(build_state(AppConfig::default()))
}

pub async fn get_response(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = get_response(app, uri).await;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap();
    (status, value)
}
