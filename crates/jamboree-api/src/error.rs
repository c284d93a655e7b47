//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use jamboree_core::{Error, ErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] Error),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Core(e) => match e.kind() {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, e.to_string()),
        ErrorKind::InvalidArgument => (StatusCode::BAD_REQUEST, e.to_string()),
        ErrorKind::Internal => {
          tracing::error!(error = ?e, "request failed");
          (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
        }
      },
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

/// `axum::Json`, but rejections become [`ApiError::BadRequest`].
#[derive(Debug, axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
