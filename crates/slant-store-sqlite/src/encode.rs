//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so that text
//! ordering matches chronological ordering. Structured fields (preferences,
//! bias profile, chat messages) are stored as compact JSON. UUIDs are stored
//! as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use slant_core::{
  article::{Article, ArticleSummary},
  bias::BiasLabel,
  chat::{ChatHistory, ChatHistorySummary, ChatMessage},
  user::{Preferences, User, UserBiasProfile},
  vote::{BiasVote, Vote},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

/// Now, truncated to the precision the store keeps, so values handed back
/// from writes compare equal to values read back later.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── BiasLabel ───────────────────────────────────────────────────────────────

pub fn encode_bias(b: BiasLabel) -> &'static str { b.as_str() }

pub fn decode_bias(s: &str) -> Result<BiasLabel> {
  match s {
    "left" => Ok(BiasLabel::Left),
    "center" => Ok(BiasLabel::Center),
    "right" => Ok(BiasLabel::Right),
    other => Err(Error::Decode(format!("unknown bias label: {other:?}"))),
  }
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_preferences(p: &Preferences) -> Result<String> {
  Ok(serde_json::to_string(p)?)
}

pub fn encode_bias_profile(p: &UserBiasProfile) -> Result<String> {
  Ok(serde_json::to_string(p)?)
}

pub fn encode_messages(m: &[ChatMessage]) -> Result<String> {
  Ok(serde_json::to_string(m)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:      String,
  pub external_id:  String,
  pub nickname:     String,
  pub preferences:  String,
  pub bias_profile: String,
  pub created_at:   String,
  pub updated_at:   String,
}

pub const USER_COLUMNS: &str =
  "user_id, external_id, nickname, preferences, bias_profile, created_at, updated_at";

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:      row.get(0)?,
      external_id:  row.get(1)?,
      nickname:     row.get(2)?,
      preferences:  row.get(3)?,
      bias_profile: row.get(4)?,
      created_at:   row.get(5)?,
      updated_at:   row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:      decode_uuid(&self.user_id)?,
      external_id:  self.external_id,
      nickname:     self.nickname,
      preferences:  serde_json::from_str(&self.preferences)?,
      bias_profile: serde_json::from_str(&self.bias_profile)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `articles` row.
pub struct RawArticle {
  pub article_id:   String,
  pub title:        String,
  pub body:         String,
  pub source:       String,
  pub source_url:   Option<String>,
  pub category:     String,
  pub bias:         String,
  pub summary:      Option<String>,
  pub published_at: Option<String>,
  pub created_at:   String,
}

pub const ARTICLE_COLUMNS: &str = "article_id, title, body, source, source_url, \
                                   category, bias, summary, published_at, created_at";

impl RawArticle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:   row.get(0)?,
      title:        row.get(1)?,
      body:         row.get(2)?,
      source:       row.get(3)?,
      source_url:   row.get(4)?,
      category:     row.get(5)?,
      bias:         row.get(6)?,
      summary:      row.get(7)?,
      published_at: row.get(8)?,
      created_at:   row.get(9)?,
    })
  }

  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      article_id:   decode_uuid(&self.article_id)?,
      title:        self.title,
      body:         self.body,
      source:       self.source,
      source_url:   self.source_url,
      category:     self.category,
      bias:         decode_bias(&self.bias)?,
      summary:      self.summary,
      published_at: decode_opt_dt(self.published_at)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `votes` row.
pub struct RawVote {
  pub user_id:    String,
  pub article_id: String,
  pub agree:      bool,
  pub cast_at:    String,
}

impl RawVote {
  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      user_id:    decode_uuid(&self.user_id)?,
      article_id: decode_uuid(&self.article_id)?,
      agree:      self.agree,
      cast_at:    decode_dt(&self.cast_at)?,
    })
  }
}

/// A `votes` row joined with the article's bias column.
pub struct RawBiasVote {
  pub article_id: String,
  pub agree:      bool,
  pub bias:       String,
}

impl RawBiasVote {
  pub fn into_bias_vote(self) -> Result<BiasVote> {
    Ok(BiasVote {
      article_id:   decode_uuid(&self.article_id)?,
      agree:        self.agree,
      article_bias: decode_bias(&self.bias)?,
    })
  }
}

/// Raw strings read directly from a `chat_histories` row.
pub struct RawChatHistory {
  pub chat_id:    String,
  pub user_id:    String,
  pub article_id: String,
  pub messages:   String,
  pub created_at: String,
  pub updated_at: String,
}

pub const CHAT_COLUMNS: &str =
  "chat_id, user_id, article_id, messages, created_at, updated_at";

impl RawChatHistory {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      chat_id:    row.get(0)?,
      user_id:    row.get(1)?,
      article_id: row.get(2)?,
      messages:   row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_history(self) -> Result<ChatHistory> {
    Ok(ChatHistory {
      chat_id:    decode_uuid(&self.chat_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      article_id: decode_uuid(&self.article_id)?,
      messages:   serde_json::from_str(&self.messages)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// A `chat_histories` row left-joined with the article's summary columns.
pub struct RawChatSummary {
  pub history: RawChatHistory,
  // articles join
  pub title:   Option<String>,
  pub source:  Option<String>,
  pub bias:    Option<String>,
}

impl RawChatSummary {
  pub fn into_summary(self) -> Result<ChatHistorySummary> {
    let history = self.history.into_history()?;
    let article = match (self.title, self.source, self.bias) {
      (Some(title), Some(source), Some(bias)) => Some(ArticleSummary {
        id: history.article_id,
        title,
        source,
        bias: decode_bias(&bias)?,
      }),
      _ => None,
    };
    Ok(ChatHistorySummary { history, article })
  }
}
