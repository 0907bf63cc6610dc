//! Handlers for `/articles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/articles` | Optional `category`, `bias`, `limit`; newest first |
//! | `GET`  | `/articles/:id` | 404 if not found |
//! | `POST` | `/articles` | Admin only. Body: list of [`NewArticleBody`]; returns 201 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slant_core::{
  article::{Article, NewArticle},
  bias::BiasLabel,
  defaults::DEFAULT_CATEGORY,
  store::{ArticleQuery, NewsStore, require_article},
};
use uuid::Uuid;

use crate::{AppState, auth::Admin, error::ApiError};

/// Upper bound on `?limit=`.
const MAX_LIMIT: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category: Option<String>,
  pub bias:     Option<BiasLabel>,
  pub limit:    Option<usize>,
}

/// `GET /articles[?category=...][&bias=...][&limit=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Article>>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let query = ArticleQuery {
    category: params.category.filter(|c| !c.is_empty()),
    bias:     params.bias,
    limit:    params
      .limit
      .unwrap_or(state.config.latest_articles_limit)
      .min(MAX_LIMIT),
  };

  let articles = state
    .store
    .latest_articles(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(articles))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /articles/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Article>, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  let article = require_article(state.store.as_ref(), id).await?;
  Ok(Json(article))
}

// ─── Ingest ───────────────────────────────────────────────────────────────────

/// One article in the body of `POST /articles`.
#[derive(Debug, Deserialize)]
pub struct NewArticleBody {
  pub title:        String,
  #[serde(default)]
  pub body:         String,
  pub source:       String,
  pub source_url:   Option<String>,
  pub category:     Option<String>,
  /// Defaults to center when the upstream feed carries no label.
  pub bias:         Option<BiasLabel>,
  pub summary:      Option<String>,
  pub published_at: Option<DateTime<Utc>>,
}

impl From<NewArticleBody> for NewArticle {
  fn from(b: NewArticleBody) -> Self {
    NewArticle {
      title:        b.title.trim().to_owned(),
      body:         b.body,
      source:       b.source,
      source_url:   b.source_url,
      category:     b
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
      bias:         b.bias.unwrap_or(BiasLabel::Center),
      summary:      b.summary,
      published_at: b.published_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
  /// Number of articles stored; duplicates by title are skipped.
  pub saved:    usize,
  pub articles: Vec<Article>,
}

/// `POST /articles`: returns 201 with the articles that were new.
pub async fn ingest<S>(
  State(state): State<AppState<S>>,
  _admin: Admin,
  Json(body): Json<Vec<NewArticleBody>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  if let Some(pos) = body
    .iter()
    .position(|a| a.title.trim().is_empty() || a.source.trim().is_empty())
  {
    return Err(ApiError::Validation(format!(
      "article {pos}: title and source are required"
    )));
  }

  let submitted = body.len();
  let articles = state
    .store
    .insert_articles(body.into_iter().map(NewArticle::from).collect())
    .await
    .map_err(ApiError::store)?;

  tracing::info!(submitted, saved = articles.len(), "articles ingested");
  Ok((
    StatusCode::CREATED,
    Json(IngestResponse { saved: articles.len(), articles }),
  ))
}
