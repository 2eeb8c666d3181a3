//! An axum fake of the remote document store's REST API, backed by an
//! `InMemoryDocumentStore`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use scriptwright_core::error::StoreError;
use scriptwright_core::model::{
    AssetManifest, ChapterContent, CharacterProfile, CreateScriptRequest, CreateScriptResponse,
    ScriptSummary, WriteAck,
};
use scriptwright_core::store::DocumentStore;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::store::InMemoryDocumentStore;

type Store = Arc<InMemoryDocumentStore>;

/// HTTP-layer wrapper around `StoreError`.
struct FakeError(StoreError);

impl From<StoreError> for FakeError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for FakeError {
    fn into_response(self) -> Response {
        let (status, detail) = match self.0 {
            StoreError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
            StoreError::Status { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            ),
            StoreError::Transport(message) | StoreError::Decode(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

async fn list_scripts(State(store): State<Store>) -> Result<Json<Vec<ScriptSummary>>, FakeError> {
    Ok(Json(store.list_scripts().await?))
}

async fn create_script(
    State(store): State<Store>,
    Json(request): Json<CreateScriptRequest>,
) -> Result<Json<CreateScriptResponse>, FakeError> {
    Ok(Json(store.create_script(&request).await?))
}

async fn get_script(
    State(store): State<Store>,
    Path(script_id): Path<String>,
) -> Result<Json<ScriptSummary>, FakeError> {
    Ok(Json(store.get_script(&script_id).await?))
}

async fn list_chapters(
    State(store): State<Store>,
    Path(script_id): Path<String>,
) -> Result<Json<Vec<String>>, FakeError> {
    Ok(Json(store.list_chapters(&script_id).await?))
}

async fn get_chapter(
    State(store): State<Store>,
    Path((script_id, path)): Path<(String, String)>,
) -> Result<Json<ChapterContent>, FakeError> {
    Ok(Json(store.get_chapter(&script_id, &path).await?))
}

async fn save_chapter(
    State(store): State<Store>,
    Path((script_id, path)): Path<(String, String)>,
    Json(content): Json<ChapterContent>,
) -> Result<Json<WriteAck>, FakeError> {
    Ok(Json(store.save_chapter(&script_id, &path, &content).await?))
}

async fn delete_chapter(
    State(store): State<Store>,
    Path((script_id, path)): Path<(String, String)>,
) -> Result<Json<WriteAck>, FakeError> {
    Ok(Json(store.delete_chapter(&script_id, &path).await?))
}

async fn get_assets(
    State(store): State<Store>,
    Path(script_id): Path<String>,
) -> Result<Json<AssetManifest>, FakeError> {
    Ok(Json(store.get_assets(&script_id).await?))
}

async fn list_characters(
    State(store): State<Store>,
    Path(script_id): Path<String>,
) -> Result<Json<Vec<CharacterProfile>>, FakeError> {
    Ok(Json(store.list_characters(&script_id).await?))
}

/// Returns the REST API router, nested under `/api`.
pub fn router(store: Store) -> Router {
    let scripts = Router::new()
        .route("/", get(list_scripts))
        .route("/create", post(create_script))
        .route("/{script_id}", get(get_script))
        .route("/{script_id}/chapters", get(list_chapters))
        .route(
            "/{script_id}/chapters/{*path}",
            get(get_chapter).post(save_chapter).delete(delete_chapter),
        )
        .route("/{script_id}/assets", get(get_assets))
        .route("/{script_id}/characters", get(list_characters));

    Router::new()
        .nest("/api/scripts", scripts)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serves `router(store)` on an ephemeral local port. Returns the API base
/// URL (ending in `/api`) and the server task.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn(store: Store) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind fake document store");
    let addr = listener.local_addr().expect("fake document store address");
    let app = router(store);

    let handle = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(%err, "fake document store stopped");
        }
    });

    (format!("http://{addr}/api"), handle)
}
