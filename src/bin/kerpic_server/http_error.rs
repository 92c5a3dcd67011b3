use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kerpic::library::LibraryError;

fn json_error(status: StatusCode, msg: String) -> Response {
    (status, Json(serde_json::json!({ "error": msg }))).into_response()
}

pub(super) fn bad_request(msg: impl Into<String>) -> Response {
    json_error(StatusCode::BAD_REQUEST, msg.into())
}

pub(super) fn library_error(err: LibraryError) -> Response {
    let status = match &err {
        LibraryError::Forbidden(_) => StatusCode::FORBIDDEN,
        LibraryError::NotFound(_) | LibraryError::NotADirectory(_) => StatusCode::NOT_FOUND,
        LibraryError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(%err, "library error");
    }
    json_error(status, err.to_string())
}
