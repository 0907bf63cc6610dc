//! The `NewsStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `slant-store-sqlite`).
//! The HTTP layer and the bias report depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Error,
  article::{Article, NewArticle},
  bias::BiasLabel,
  chat::{ChatHistory, ChatHistorySummary, ChatMessage},
  defaults::DEFAULT_LATEST_LIMIT,
  user::{User, UserUpdate},
  vote::{BiasVote, NewVote, Vote},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`NewsStore::latest_articles`].
#[derive(Debug, Clone)]
pub struct ArticleQuery {
  pub category: Option<String>,
  pub bias:     Option<BiasLabel>,
  /// Maximum number of articles returned.
  pub limit:    usize,
}

impl Default for ArticleQuery {
  fn default() -> Self {
    Self { category: None, bias: None, limit: DEFAULT_LATEST_LIMIT }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Slant storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait NewsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Look up a user by the identity provider's subject id.
  fn find_user<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Return the user for `external_id`, creating one with default nickname,
  /// preferences and bias profile if none exists. Safe to race.
  fn ensure_user<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns `None` if `user_id` is unknown.
  fn update_user(
    &self,
    user_id: Uuid,
    update: UserUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Articles ──────────────────────────────────────────────────────────

  /// Store a batch of articles, skipping any whose title is already present
  /// (including earlier entries of the same batch). Returns only the
  /// articles that were stored.
  fn insert_articles(
    &self,
    articles: Vec<NewArticle>,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + '_;

  fn get_article(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  /// Up to `query.limit` matching articles, most recently published first.
  /// Articles without a publication date sort last.
  fn latest_articles<'a>(
    &'a self,
    query: &'a ArticleQuery,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + 'a;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Record a vote, replacing any earlier vote by the same user on the same
  /// article.
  fn cast_vote(
    &self,
    vote: NewVote,
  ) -> impl Future<Output = Result<Vote, Self::Error>> + Send + '_;

  fn get_vote(
    &self,
    user_id: Uuid,
    article_id: Uuid,
  ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send + '_;

  /// Every vote the user has cast, joined with its article's bias label.
  fn votes_with_bias(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<BiasVote>, Self::Error>> + Send + '_;

  // ── Chat histories ────────────────────────────────────────────────────

  fn get_chat_history(
    &self,
    user_id: Uuid,
    article_id: Uuid,
  ) -> impl Future<Output = Result<Option<ChatHistory>, Self::Error>> + Send + '_;

  /// Replace the transcript for (user, article), creating it if needed.
  /// `created_at` survives replacement; `updated_at` is refreshed.
  fn save_chat_history(
    &self,
    user_id: Uuid,
    article_id: Uuid,
    messages: Vec<ChatMessage>,
  ) -> impl Future<Output = Result<ChatHistory, Self::Error>> + Send + '_;

  /// Returns `true` if a history existed and was removed.
  fn delete_chat_history(
    &self,
    user_id: Uuid,
    article_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All of a user's histories, most recently updated first.
  fn list_chat_histories(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ChatHistorySummary>, Self::Error>> + Send + '_;
}

/// Fetch an article that has to exist for the operation to make sense.
pub async fn require_article<S>(store: &S, id: Uuid) -> crate::Result<Article>
where
  S: NewsStore,
{
  store
    .get_article(id)
    .await
    .map_err(Error::data_unavailable)?
    .ok_or(Error::ArticleNotFound(id))
}
