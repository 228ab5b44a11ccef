//! HTTP surface over the request handlers.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;
use crate::store::{ProgressionPoint, RemoteStore, StoredEntry};
use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use liftlog_core::RecordId;
use liftlog_storage::FileBackend;
use liftlog_sync_protocol::{SubmitRequest, SubmitResponse, SyncBatchRequest, SyncBatchResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    handler: Arc<RequestHandler>,
}

impl AppState {
    /// Creates the state from a handler.
    #[must_use]
    pub fn new(handler: Arc<RequestHandler>) -> Self {
        Self { handler }
    }
}

/// Builds the application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sync", post(sync_batch))
        .route("/api/exercises", get(list_exercises).post(submit_exercise))
        .route("/api/exercises/names", get(exercise_names))
        .route("/api/exercises/progression/{name}", get(progression))
        .route("/api/exercises/{id}", delete(delete_exercise))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Opens the store and runs the server until shutdown.
///
/// # Errors
///
/// Returns an error if the data file cannot be opened or the listen
/// address cannot be bound.
pub async fn serve(config: ServerConfig) -> ServerResult<()> {
    let backend = FileBackend::open_with_create_dirs(&config.data_path)?;
    let store = Arc::new(RemoteStore::open(Box::new(backend))?);
    let handler = Arc::new(RequestHandler::new(store, config.clone()));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, data = %config.data_path.display(), "server listening");
    axum::serve(listener, app_router(AppState::new(handler))).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    name: Option<String>,
    limit: Option<usize>,
    #[serde(default)]
    offset: usize,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

async fn sync_batch(
    State(state): State<AppState>,
    Json(request): Json<SyncBatchRequest>,
) -> ServerResult<Json<SyncBatchResponse>> {
    Ok(Json(state.handler.handle_sync(request)?))
}

async fn submit_exercise(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> ServerResult<Json<SubmitResponse>> {
    Ok(Json(state.handler.handle_submit(request)?))
}

async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<StoredEntry>> {
    Json(
        state
            .handler
            .handle_list(query.name.as_deref(), query.limit, query.offset),
    )
}

async fn exercise_names(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.handler.handle_names())
}

async fn progression(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Vec<ProgressionPoint>> {
    Json(state.handler.handle_progression(&name))
}

async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<DeleteResponse>> {
    let id: RecordId = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest(format!("invalid id: {id}")))?;
    state.handler.handle_delete(id)?;
    Ok(Json(DeleteResponse { success: true }))
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlog_storage::InMemoryBackend;

    #[test]
    fn router_builds() {
        let store = Arc::new(RemoteStore::open(Box::new(InMemoryBackend::new())).unwrap());
        let handler = Arc::new(RequestHandler::new(store, ServerConfig::default()));
        let _router = app_router(AppState::new(handler));
    }
}
