use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;

use kerpic::model::{BatchRequest, BatchResponse, FolderInfo, ImageInfo, SaveRequest, SaveResponse};

use super::http_error::{bad_request, library_error};
use super::types::AppState;

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

pub(super) async fn list_folders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FolderInfo>>, Response> {
    state.library.list_folders().map(Json).map_err(library_error)
}

pub(super) async fn folder_contents(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Json<FolderInfo>, Response> {
    state
        .library
        .folder_contents(&path)
        .map(Json)
        .map_err(library_error)
}

pub(super) async fn root_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ImageInfo>>, Response> {
    state.library.list_images("").map(Json).map_err(library_error)
}

pub(super) async fn list_images(
    State(state): State<Arc<AppState>>,
    Path(folder): Path<String>,
) -> Result<Json<Vec<ImageInfo>>, Response> {
    state
        .library
        .list_images(&folder)
        .map(Json)
        .map_err(library_error)
}

pub(super) async fn create_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, Response> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    if req.image_paths.is_empty() {
        return Err(bad_request("imagePaths must not be empty"));
    }

    // Paths that cannot be read are left out of the batch.
    let images: Vec<ImageInfo> = req
        .image_paths
        .iter()
        .filter_map(|p| match state.library.image_info(p) {
            Ok(info) => Some(info),
            Err(err) => {
                tracing::debug!(path = %p, %err, "dropping unreadable batch image");
                None
            }
        })
        .collect();

    let (id, remembered) = {
        let mut batches = state.batches.write().await;
        let id = batches.insert(images.clone());
        (id, batches.len())
    };
    tracing::info!(batch = %id, images = images.len(), remembered, "batch created");
    Ok(Json(BatchResponse { id, images }))
}

pub(super) async fn save_selected(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, Response> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    if req.batch_id.is_empty() {
        return Err(bad_request("batchId is required"));
    }
    if !state.batches.read().await.contains(&req.batch_id) {
        tracing::debug!(batch = %req.batch_id, "save for unknown batch");
    }

    state
        .library
        .save_selected(&req.selected_paths, &req.target_folder)
        .map(Json)
        .map_err(library_error)
}
