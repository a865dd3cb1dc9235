use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use folio_models::contact::ContactValidationErrors;
use serde::Serialize;

pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";
pub const INVALID_FORM_DATA: &str = "Invalid form data";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const NOT_FOUND: &str = "Not found";

#[derive(Serialize)]
pub struct ApiError {
    pub error: &'static str,
}

#[derive(Serialize)]
pub struct ApiValidationError<'a> {
    pub error: &'static str,
    pub details: &'a ContactValidationErrors,
}

pub fn error(code: StatusCode, error: &'static str) -> Response {
    (code, Json(ApiError { error })).into_response()
}

/// Log the error and respond with an opaque 500.
pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
}

pub fn validation_error(details: &ContactValidationErrors) -> Response {
    tracing::debug!(%details, "rejected invalid form data");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiValidationError {
            error: INVALID_FORM_DATA,
            details,
        }),
    )
        .into_response()
}
