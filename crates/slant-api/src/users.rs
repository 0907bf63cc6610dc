//! Handlers for `/user`: the caller's own profile.

use axum::{Json, extract::State};
use slant_core::{
  store::NewsStore,
  user::{User, UserUpdate},
};

use crate::{AppState, auth::Identity, error::ApiError};

/// `GET /user`
///
/// First call creates the profile with defaults.
pub async fn get_me<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
) -> Result<Json<User>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let user = state
    .store
    .ensure_user(&external_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(user))
}

/// `PUT /user`
///
/// Body: any subset of `nickname`, `preferences`,
/// `bias_profile`.
pub async fn update_me<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
  Json(update): Json<UserUpdate>,
) -> Result<Json<User>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  if update.nickname.as_deref().is_some_and(|n| n.trim().is_empty()) {
    return Err(ApiError::Validation("nickname must not be blank".into()));
  }

  let user = state
    .store
    .ensure_user(&external_id)
    .await
    .map_err(ApiError::store)?;

  if update.is_empty() {
    return Ok(Json(user));
  }

  let updated = state
    .store
    .update_user(user.user_id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {} not found", user.user_id)))?;
  Ok(Json(updated))
}
