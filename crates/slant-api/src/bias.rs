//! Handlers for `/bias`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/bias` | Bias report; callers without a profile get the default report |
//! | `PUT`  | `/bias` | Body: [`UserBiasProfile`]; stores the self-declared profile |

use axum::{Json, extract::State};
use rand_core::OsRng;
use slant_core::{
  report::{BiasReport, bias_report},
  store::NewsStore,
  user::{UserBiasProfile, UserUpdate},
};

use crate::{AppState, auth::Identity, error::ApiError};

/// `GET /bias`
pub async fn report<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
) -> Result<Json<BiasReport>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let Some(user) = state
    .store
    .find_user(&external_id)
    .await
    .map_err(ApiError::store)?
  else {
    tracing::debug!(%external_id, "no profile yet, returning default report");
    return Ok(Json(BiasReport::empty()));
  };

  let mut rng = OsRng;
  let report = bias_report(
    state.store.as_ref(),
    user.user_id,
    state.config.recommendation_limit,
    &mut rng,
  )
  .await?;
  Ok(Json(report))
}

/// `PUT /bias`
///
/// Creates the user first if needed.
///
/// Only the self-declared profile changes; the vote-derived distribution is
/// unaffected.
pub async fn put_profile<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
  Json(profile): Json<UserBiasProfile>,
) -> Result<Json<UserBiasProfile>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let user = state
    .store
    .ensure_user(&external_id)
    .await
    .map_err(ApiError::store)?;

  let update = UserUpdate { bias_profile: Some(profile), ..Default::default() };
  let updated = state
    .store
    .update_user(user.user_id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {} not found", user.user_id)))?;

  Ok(Json(updated.bias_profile))
}
