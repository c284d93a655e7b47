//! The `X-Admin-Code` header extractor.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

pub const ADMIN_CODE_HEADER: &str = "x-admin-code";

/// The caller's claimed admin code, if any. Whether it matches is decided by
/// the service, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminCode(pub Option<String>);

impl AdminCode {
  pub fn as_deref(&self) -> Option<&str> { self.0.as_deref() }
}

impl<S: Send + Sync> FromRequestParts<S> for AdminCode {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let Some(value) = parts.headers.get(ADMIN_CODE_HEADER) else {
      return Ok(AdminCode(None));
    };
    let code = value
      .to_str()
      .map_err(|_| ApiError::BadRequest("X-Admin-Code is not valid ASCII".to_owned()))?;
    Ok(AdminCode(Some(code.to_owned())))
  }
}
