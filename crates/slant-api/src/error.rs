//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No identity header, or an empty one.
  #[error("unauthenticated")]
  Unauthenticated,

  /// Missing or wrong operator credentials on an admin route.
  #[error("admin credentials required")]
  AdminRequired,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("validation error: {0}")]
  Validation(String),

  /// The store failed; the client may retry.
  #[error("data unavailable: {0}")]
  DataUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Shorthand for a store failure.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::DataUnavailable(Box::new(err))
  }

  /// Unwrap a required request field or reject the request.
  pub fn require<T>(value: Option<T>, field: &str) -> Result<T, Self> {
    value.ok_or_else(|| Self::Validation(format!("{field} is required")))
  }
}

impl From<slant_core::Error> for ApiError {
  fn from(err: slant_core::Error) -> Self {
    use slant_core::Error as E;
    match err {
      E::ArticleNotFound(id) => Self::NotFound(format!("article {id} not found")),
      E::DataUnavailable(e) => Self::DataUnavailable(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Unauthenticated | ApiError::AdminRequired => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    match &self {
      ApiError::DataUnavailable(e) => tracing::warn!(error = %e, "store unavailable"),
      ApiError::Internal(m) => tracing::error!(error = %m, "internal error"),
      _ => {}
    }

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    match self {
      ApiError::AdminRequired => {
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"slant\""),
        );
      }
      ApiError::DataUnavailable(_) => {
        res
          .headers_mut()
          .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
      }
      _ => {}
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Error)]
  #[error("disk I/O error")]
  struct DiskError;

  #[test]
  fn store_failure_is_503_with_retry_after() {
    let res = ApiError::from(slant_core::Error::data_unavailable(DiskError)).into_response();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.headers().get(header::RETRY_AFTER).unwrap(), "1");
    assert!(!res.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[test]
  fn missing_article_is_404() {
    let id = uuid::Uuid::nil();
    let err = ApiError::from(slant_core::Error::ArticleNotFound(id));
    assert_eq!(err.to_string(), format!("not found: article {id} not found"));
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn admin_rejection_challenges_for_basic() {
    let res = ApiError::AdminRequired.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
      res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
      "Basic realm=\"slant\""
    );
    assert!(!res.headers().contains_key(header::RETRY_AFTER));
  }
}
