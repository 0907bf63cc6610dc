//! Articles and their projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{bias::BiasLabel, defaults::DEFAULT_CATEGORY};

/// A stored news article. `bias` is assigned outside this system and is
/// treated as ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
  pub article_id:   Uuid,
  pub title:        String,
  pub body:         String,
  /// Publisher name, e.g. "The Daily Ledger".
  pub source:       String,
  pub source_url:   Option<String>,
  pub category:     String,
  pub bias:         BiasLabel,
  pub summary:      Option<String>,
  pub published_at: Option<DateTime<Utc>>,
  pub created_at:   DateTime<Utc>,
}

impl Article {
  pub fn summary(&self) -> ArticleSummary {
    ArticleSummary {
      id:     self.article_id,
      title:  self.title.clone(),
      source: self.source.clone(),
      bias:   self.bias,
    }
  }
}

/// Input to [`crate::store::NewsStore::insert_articles`].
/// `article_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewArticle {
  pub title:        String,
  pub body:         String,
  pub source:       String,
  pub source_url:   Option<String>,
  pub category:     String,
  pub bias:         BiasLabel,
  pub summary:      Option<String>,
  pub published_at: Option<DateTime<Utc>>,
}

impl NewArticle {
  /// Convenience constructor with all optional fields unset.
  pub fn new(
    title: impl Into<String>,
    source: impl Into<String>,
    bias: BiasLabel,
  ) -> Self {
    Self {
      title: title.into(),
      body: String::new(),
      source: source.into(),
      source_url: None,
      category: DEFAULT_CATEGORY.to_owned(),
      bias,
      summary: None,
      published_at: None,
    }
  }
}

/// The `{id, title, source, bias}` projection used in recommendations and
/// chat-history listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
  pub id:     Uuid,
  pub title:  String,
  pub source: String,
  pub bias:   BiasLabel,
}
