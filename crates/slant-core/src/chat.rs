//! Per-article chat histories.
//!
//! The LLM that produces assistant turns lives outside this system; only the
//! transcript is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::article::ArticleSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role:    ChatRole,
  pub content: String,
}

/// The transcript a user keeps for one article. At most one per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
  pub chat_id:    Uuid,
  pub user_id:    Uuid,
  pub article_id: Uuid,
  pub messages:   Vec<ChatMessage>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A chat history together with the article it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistorySummary {
  #[serde(flatten)]
  pub history: ChatHistory,
  /// `None` if the article no longer exists.
  pub article: Option<ArticleSummary>,
}
