//! Handlers for `/votes`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/votes` | Body: `{"articleId": "...", "voteType": true}`; re-voting overwrites |
//! | `GET`  | `/votes` | `?articleId=` required; returns `{"vote": true\|false\|null}` |

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use slant_core::{
  store::{NewsStore, require_article},
  vote::{NewVote, Vote},
};
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastBody {
  pub article_id: Option<Uuid>,
  /// `true` for agree, `false` for disagree.
  pub vote_type:  Option<bool>,
}

/// `POST /votes`
pub async fn cast<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
  Json(body): Json<CastBody>,
) -> Result<Json<Vote>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let article_id = ApiError::require(body.article_id, "articleId")?;
  let agree = ApiError::require(body.vote_type, "voteType")?;

  require_article(state.store.as_ref(), article_id).await?;

  let user = state
    .store
    .ensure_user(&external_id)
    .await
    .map_err(ApiError::store)?;

  let vote = state
    .store
    .cast_vote(NewVote { user_id: user.user_id, article_id, agree })
    .await
    .map_err(ApiError::store)?;

  tracing::debug!(user_id = %user.user_id, %article_id, agree, "vote recorded");
  Ok(Json(vote))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupParams {
  pub article_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct VoteLookup {
  pub vote: Option<bool>,
}

/// `GET /votes?articleId=<id>`
pub async fn lookup<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
  Query(params): Query<LookupParams>,
) -> Result<Json<VoteLookup>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let article_id = ApiError::require(params.article_id, "articleId")?;

  let Some(user) = state
    .store
    .find_user(&external_id)
    .await
    .map_err(ApiError::store)?
  else {
    return Ok(Json(VoteLookup { vote: None }));
  };

  let vote = state
    .store
    .get_vote(user.user_id, article_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(VoteLookup { vote: vote.map(|v| v.agree) }))
}
