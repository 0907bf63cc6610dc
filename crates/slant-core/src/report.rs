//! The per-user bias report: distribution, dominant label, opposite-leaning
//! recommendations and vote statistics.

use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  article::ArticleSummary,
  bias::{BiasDistribution, BiasLabel, articles_read, compute_distribution},
  recommend::{fetch_articles, select_opposite},
  store::NewsStore,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStats {
  pub total_votes:    usize,
  pub agree_votes:    usize,
  pub disagree_votes: usize,
  /// Distinct articles voted on.
  pub articles_read:  usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasReport {
  pub bias_scores:       BiasDistribution,
  pub dominant_bias:     BiasLabel,
  pub opposite_articles: Vec<ArticleSummary>,
  pub stats:             VoteStats,
}

impl BiasReport {
  /// The report for a caller with no votes, stored profile or not: default
  /// distribution, center dominant, nothing recommended.
  pub fn empty() -> Self {
    Self {
      bias_scores:       BiasDistribution::default(),
      dominant_bias:     BiasLabel::Center,
      opposite_articles: Vec::new(),
      stats:             VoteStats::default(),
    }
  }
}

/// Build the report for `user_id`.
///
/// Reads the user's votes once, aggregates them, and fetches up to `limit`
/// articles carrying the opposite label. The coin for a center dominant is
/// drawn from `rng`. An empty vote set yields [`BiasReport::empty`] without
/// touching the article store.
pub async fn bias_report<S, R>(
  store: &S,
  user_id: Uuid,
  limit: usize,
  rng: &mut R,
) -> Result<BiasReport>
where
  S: NewsStore,
  R: RngCore + Send,
{
  let votes = store
    .votes_with_bias(user_id)
    .await
    .map_err(Error::data_unavailable)?;

  let summary = compute_distribution(&votes);
  if summary.total_count == 0 {
    return Ok(BiasReport::empty());
  }

  let opposite = select_opposite(summary.dominant, rng);
  let articles = fetch_articles(store, opposite, limit).await?;

  Ok(BiasReport {
    bias_scores:       summary.scores,
    dominant_bias:     summary.dominant,
    opposite_articles: articles.iter().map(|a| a.summary()).collect(),
    stats:             VoteStats {
      total_votes:    summary.total_count,
      agree_votes:    summary.agree_count,
      disagree_votes: summary.disagree_count,
      articles_read:  articles_read(&votes),
    },
  })
}
