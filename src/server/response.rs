//! Status mapping and response builders.

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::ports::tasks::{FailureKind, TaskRecord};

const JSON: &str = "application/json";
const TEXT: &str = "text/plain";

/// Body of every 404.
pub const NOT_FOUND_BODY: &str = "Error 404: resource not found.";

/// HTTP status for a modifier failure kind.
#[must_use]
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        FailureKind::BadUuid | FailureKind::MalformedData => StatusCode::BAD_REQUEST,
    }
}

fn empty(status: StatusCode, content_type: &'static str) -> Response {
    (status, [(CONTENT_TYPE, content_type)]).into_response()
}

/// 400 with an empty body.
#[must_use]
pub fn bad_request() -> Response {
    empty(StatusCode::BAD_REQUEST, TEXT)
}

/// 413 with an empty body.
#[must_use]
pub fn payload_too_large() -> Response {
    empty(StatusCode::PAYLOAD_TOO_LARGE, TEXT)
}

/// Failure response for a modifier failure kind.
#[must_use]
pub fn failure(kind: FailureKind) -> Response {
    empty(status_for(kind), TEXT)
}

/// 204 after a successful mutation.
#[must_use]
pub fn no_content() -> Response {
    empty(StatusCode::NO_CONTENT, JSON)
}

/// 202 after scheduling a refresh.
#[must_use]
pub fn accepted() -> Response {
    empty(StatusCode::ACCEPTED, TEXT)
}

/// 201 with the created task.
#[must_use]
pub fn created(record: &TaskRecord) -> Response {
    (StatusCode::CREATED, Json(record)).into_response()
}

/// 200 with the task collection as a JSON array.
#[must_use]
pub fn tasks(tasks: &[TaskRecord]) -> Response {
    (StatusCode::OK, Json(tasks)).into_response()
}

/// 200 with a static file.
#[must_use]
pub fn asset(bytes: Vec<u8>, content_type: &str) -> Response {
    let headers = [(CONTENT_TYPE, content_type.to_string())];
    (StatusCode::OK, headers, bytes).into_response()
}

/// 404 with a plain-text explanation.
#[must_use]
pub fn not_found() -> Response {
    let status = StatusCode::NOT_FOUND;
    let headers = [(CONTENT_TYPE, TEXT)];
    (status, headers, NOT_FOUND_BODY).into_response()
}
