//! Error type for `slant-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value outside its enum's vocabulary.
  #[error("decode error: {0}")]
  Decode(String),

  /// An upsert returned no row; the referenced user or article is gone.
  #[error("row missing after write: {0}")]
  MissingRow(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
