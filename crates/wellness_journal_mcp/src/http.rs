//! REST routes served next to the streamable MCP endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::debug_handler;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::tower::{
    StreamableHttpServerConfig, StreamableHttpService,
};
use serde::Deserialize;
use tower_http::timeout::TimeoutLayer;

use wellness_engine::observability::Health;
use wellness_engine::{EntryInput, StoreError, StoredEntry, WellnessAnalysis};

use crate::WellnessMcpHandler;
use crate::error::McpError;
use crate::service::JournalService;
use crate::types::{AnalyzeEntryParams, DeleteEntryResult, ListEntriesResult, StoreEntryResult};

/// Header carrying the sealing key for REST calls.
pub const ACCESS_KEY_HEADER: &str = "x-access-key";

pub const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AppState {
    pub service: JournalService,
    pub metrics: PrometheusHandle,
    /// Backend label reported by `/health`.
    pub store_label: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[debug_handler]
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(Health::readiness(state.store_label)))
}

#[debug_handler]
async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state.metrics.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[debug_handler]
async fn create_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(entry): Json<EntryInput>,
) -> Result<(StatusCode, Json<StoreEntryResult>), (StatusCode, String)> {
    state
        .service
        .store_entry(&entry, access_key(&headers))
        .await
        .map(|res| (StatusCode::CREATED, Json(res)))
        .map_err(map_err)
}

#[debug_handler]
async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListEntriesResult>, (StatusCode, String)> {
    state
        .service
        .list_entries(query.limit)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<StoredEntry>, (StatusCode, String)> {
    state
        .service
        .get_entry(&id, access_key(&headers))
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteEntryResult>, (StatusCode, String)> {
    state
        .service
        .delete_entry(&id)
        .await
        .map(Json)
        .map_err(map_err)
}

#[debug_handler]
async fn analysis(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(params): Json<AnalyzeEntryParams>,
) -> Result<Json<WellnessAnalysis>, (StatusCode, String)> {
    let key = params.access_key.or_else(|| access_key(&headers));
    state
        .service
        .analyze_entry(&params.entry, params.history.as_deref(), key)
        .await
        .map(Json)
        .map_err(map_err)
}

fn access_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACCESS_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

pub fn map_err(e: McpError) -> (StatusCode, String) {
    let status = match &e {
        McpError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        McpError::Store(StoreError::DecryptionFailure(_)) => StatusCode::FORBIDDEN,
        McpError::Store(StoreError::IntegrityMismatch { .. }) => StatusCode::CONFLICT,
        McpError::Store(StoreError::StorageUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        McpError::Store(StoreError::Config(_)) | McpError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

/// Full application router: REST routes, `/health`, `/metrics` and the MCP
/// service nested at `/mcp`.
pub fn router(state: Arc<AppState>, handler: WellnessMcpHandler, max_body_size: usize) -> Router {
    let factory = move || -> Result<_, std::io::Error> { Ok(handler.clone()) };
    let mcp_service = StreamableHttpService::new(
        factory,
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    // MCP sessions are long-lived streams and stay outside the timeout.
    let rest = Router::new()
        .route("/entries", post(create_entry).get(list_entries))
        .route("/entries/{id}", get(get_entry).delete(delete_entry))
        .route("/analysis", post(analysis))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .merge(rest)
        .nest_service("/mcp", mcp_service)
        .layer(axum::extract::DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}
