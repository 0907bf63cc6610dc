//! Votes: one agree/disagree verdict per (user, article).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bias::BiasLabel;

/// A stored vote. Casting again on the same article replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
  pub user_id:    Uuid,
  pub article_id: Uuid,
  pub agree:      bool,
  /// Server-assigned; refreshed on every overwrite.
  pub cast_at:    DateTime<Utc>,
}

/// Input to [`crate::store::NewsStore::cast_vote`].
#[derive(Debug, Clone, Copy)]
pub struct NewVote {
  pub user_id:    Uuid,
  pub article_id: Uuid,
  pub agree:      bool,
}

/// A vote joined with the bias label of the article it was cast on; the
/// aggregator's only input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiasVote {
  pub article_id:   Uuid,
  pub agree:        bool,
  pub article_bias: BiasLabel,
}
