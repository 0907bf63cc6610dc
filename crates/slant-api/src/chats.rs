//! Handlers for chat histories.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/chat-history` | `?articleId=` required; `{"history": ... \| null}` |
//! | `POST`   | `/chat-history` | Body: `{"articleId": "...", "messages": [...]}` |
//! | `DELETE` | `/chat-history` | `?articleId=` required; 204, or 404 if none |
//! | `GET`    | `/chat-histories` | All of the caller's histories, newest first |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};
use slant_core::{
  chat::{ChatHistory, ChatHistorySummary, ChatMessage},
  store::{NewsStore, require_article},
};
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleParams {
  pub article_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct HistoryLookup {
  pub history: Option<ChatHistory>,
}

/// `GET /chat-history?articleId=<id>`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
  Query(params): Query<ArticleParams>,
) -> Result<Json<HistoryLookup>, ApiError>
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
    return Ok(Json(HistoryLookup { history: None }));
  };

  let history = state
    .store
    .get_chat_history(user.user_id, article_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(HistoryLookup { history }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBody {
  pub article_id: Option<Uuid>,
  pub messages:   Option<Vec<ChatMessage>>,
}

/// `POST /chat-history`: replaces the stored transcript.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
  Json(body): Json<SaveBody>,
) -> Result<Json<ChatHistory>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let article_id = ApiError::require(body.article_id, "articleId")?;
  let messages = ApiError::require(body.messages, "messages")?;

  require_article(state.store.as_ref(), article_id).await?;

  let user = state
    .store
    .ensure_user(&external_id)
    .await
    .map_err(ApiError::store)?;

  let history = state
    .store
    .save_chat_history(user.user_id, article_id, messages)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(history))
}

/// `DELETE /chat-history?articleId=<id>`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
  Query(params): Query<ArticleParams>,
) -> Result<StatusCode, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let article_id = ApiError::require(params.article_id, "articleId")?;
  let not_found = || ApiError::NotFound(format!("no chat history for article {article_id}"));

  let user = state
    .store
    .find_user(&external_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;

  let deleted = state
    .store
    .delete_chat_history(user.user_id, article_id)
    .await
    .map_err(ApiError::store)?;

  if deleted { Ok(StatusCode::NO_CONTENT) } else { Err(not_found()) }
}

/// `GET /chat-histories`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Identity(external_id): Identity,
) -> Result<Json<Vec<ChatHistorySummary>>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let Some(user) = state
    .store
    .find_user(&external_id)
    .await
    .map_err(ApiError::store)?
  else {
    return Ok(Json(Vec::new()));
  };

  let histories = state
    .store
    .list_chat_histories(user.user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(histories))
}
