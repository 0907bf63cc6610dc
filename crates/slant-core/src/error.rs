//! Error types for `slant-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("article not found: {0}")]
  ArticleNotFound(Uuid),

  /// The storage collaborator failed. Retryable from the caller's side.
  #[error("data unavailable: {0}")]
  DataUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a storage backend error.
  pub fn data_unavailable<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::DataUnavailable(Box::new(err))
  }

  /// Whether retrying the same request may succeed.
  pub fn is_retryable(&self) -> bool { matches!(self, Self::DataUnavailable(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
