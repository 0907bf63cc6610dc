//! Request extractors for caller identity and operator credentials.
//!
//! End users are authenticated upstream; the fronting proxy forwards the
//! identity provider's subject id in a configurable header. Operator routes
//! (article ingestion) use HTTP Basic credentials checked against an argon2
//! hash.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use slant_core::store::NewsStore;

use crate::{AppState, error::ApiError};

/// Operator credentials accepted on admin routes.
#[derive(Clone)]
pub struct AdminCredentials {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// The identity provider's subject id for the calling user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub String);

/// Zero-size marker: present in the handler means operator credentials
/// checked out.
pub struct Admin;

/// Read the caller's identity from `header_name`.
pub fn identity_from_headers(
  headers: &HeaderMap,
  header_name: &str,
) -> Result<Identity, ApiError> {
  let value = headers
    .get(header_name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .ok_or(ApiError::Unauthenticated)?;
  Ok(Identity(value.to_owned()))
}

/// Verify HTTP Basic operator credentials. With no credentials configured
/// every request is rejected.
pub fn verify_admin(
  headers: &HeaderMap,
  config: Option<&AdminCredentials>,
) -> Result<(), ApiError> {
  let config = config.ok_or(ApiError::AdminRequired)?;

  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::AdminRequired)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::AdminRequired)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::AdminRequired)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::AdminRequired)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::AdminRequired)?;

  if username != config.username {
    return Err(ApiError::AdminRequired);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| ApiError::AdminRequired)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::AdminRequired)?;

  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    identity_from_headers(&parts.headers, &state.config.identity_header)
  }
}

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_admin(&parts.headers, state.admin.as_deref())?;
    Ok(Admin)
  }
}
