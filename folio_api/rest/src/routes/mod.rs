use axum::{http::StatusCode, response::Response};

use crate::errors::{error, METHOD_NOT_ALLOWED, NOT_FOUND};

pub mod contact;

pub async fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, NOT_FOUND)
}

pub async fn method_not_allowed() -> Response {
    error(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
}
