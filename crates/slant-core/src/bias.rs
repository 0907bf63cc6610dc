//! Bias labels and the vote aggregator.
//!
//! A user's distribution is a pure function of their vote set joined with the
//! editorial bias label of each voted article. It is recomputed on every read
//! and never stored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{defaults::DEFAULT_DISTRIBUTION, vote::BiasVote};

// ─── Labels ──────────────────────────────────────────────────────────────────

/// The editorial bias label carried by an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasLabel {
  Left,
  Center,
  Right,
}

impl BiasLabel {
  /// The mirrored label: left and right swap, center maps to itself.
  ///
  /// Used by the aggregator to credit a disagree vote. The recommender has
  /// its own mapping for center, see [`crate::recommend::select_opposite`].
  pub fn opposite(self) -> Self {
    match self {
      Self::Left => Self::Right,
      Self::Center => Self::Center,
      Self::Right => Self::Left,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Left => "left",
      Self::Center => "center",
      Self::Right => "right",
    }
  }
}

impl std::fmt::Display for BiasLabel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Distribution ────────────────────────────────────────────────────────────

/// Percentages per bucket. The three values sum to 100 give or take one,
/// since each bucket is rounded independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasDistribution {
  pub left:   u8,
  pub center: u8,
  pub right:  u8,
}

impl BiasDistribution {
  pub fn get(&self, label: BiasLabel) -> u8 {
    match label {
      BiasLabel::Left => self.left,
      BiasLabel::Center => self.center,
      BiasLabel::Right => self.right,
    }
  }

  pub fn sum(&self) -> u16 {
    u16::from(self.left) + u16::from(self.center) + u16::from(self.right)
  }
}

impl Default for BiasDistribution {
  fn default() -> Self { DEFAULT_DISTRIBUTION }
}

/// Output of [`compute_distribution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiasSummary {
  pub scores:         BiasDistribution,
  pub dominant:       BiasLabel,
  pub agree_count:    usize,
  pub disagree_count: usize,
  pub total_count:    usize,
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
  left:   u32,
  center: u32,
  right:  u32,
}

impl Tally {
  fn credit(&mut self, label: BiasLabel) {
    match label {
      BiasLabel::Left => self.left += 1,
      BiasLabel::Center => self.center += 1,
      BiasLabel::Right => self.right += 1,
    }
  }

  fn total(&self) -> u32 { self.left + self.center + self.right }

  /// Strict maximum; every tie goes to center.
  fn dominant(&self) -> BiasLabel {
    if self.left > self.center && self.left > self.right {
      BiasLabel::Left
    } else if self.right > self.left && self.right > self.center {
      BiasLabel::Right
    } else {
      BiasLabel::Center
    }
  }
}

fn percent(count: u32, total: u32) -> u8 {
  // `f64::round` rounds half away from zero, which is half-up for
  // non-negative inputs.
  (f64::from(count) / f64::from(total) * 100.0).round() as u8
}

/// Aggregate a vote set into a three-bucket distribution.
///
/// An agree vote credits the article's own label. A disagree vote credits the
/// mirrored label (see [`BiasLabel::opposite`]). Percentages are rounded per
/// bucket with no renormalisation. An empty tally yields
/// [`DEFAULT_DISTRIBUTION`] with a center dominant.
pub fn compute_distribution(votes: &[BiasVote]) -> BiasSummary {
  let mut tally = Tally::default();
  let mut agree_count = 0;
  let mut disagree_count = 0;

  for vote in votes {
    if vote.agree {
      agree_count += 1;
      tally.credit(vote.article_bias);
    } else {
      disagree_count += 1;
      tally.credit(vote.article_bias.opposite());
    }
  }

  let total = tally.total();
  let scores = if total == 0 {
    DEFAULT_DISTRIBUTION
  } else {
    BiasDistribution {
      left:   percent(tally.left, total),
      center: percent(tally.center, total),
      right:  percent(tally.right, total),
    }
  };

  BiasSummary {
    scores,
    dominant: tally.dominant(),
    agree_count,
    disagree_count,
    total_count: votes.len(),
  }
}

/// Number of distinct articles across a vote set.
pub fn articles_read(votes: &[BiasVote]) -> usize {
  votes
    .iter()
    .map(|v| v.article_id)
    .collect::<HashSet<_>>()
    .len()
}
