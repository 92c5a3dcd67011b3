use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use super::handlers::{
    create_batch, folder_contents, healthz, list_folders, list_images, root_images, save_selected,
};
use super::types::AppState;

pub(super) fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/folders", get(list_folders))
        .route("/folders/*path", get(folder_contents))
        .route("/images", get(root_images))
        .route("/images/*folder", get(list_images))
        .route("/batch", post(create_batch))
        .route("/save", post(save_selected));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api)
        .with_state(state)
}
