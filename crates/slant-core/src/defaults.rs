//! Shared default values.
//!
//! Every handler and backend pulls its fallbacks from here rather than
//! restating them.

use crate::bias::BiasDistribution;

/// Distribution reported when a user has no effective votes. Not exactly
/// uniform; clients rely on these exact values.
pub const DEFAULT_DISTRIBUTION: BiasDistribution =
  BiasDistribution { left: 33, center: 34, right: 33 };

/// Number of opposite-leaning articles returned with a bias report.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 4;

/// Number of articles returned by the latest-articles listing.
pub const DEFAULT_LATEST_LIMIT: usize = 10;

/// Nickname assigned to a freshly created user.
pub const DEFAULT_NICKNAME: &str = "reader";

/// Category assigned to ingested articles that do not name one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Theme assigned to freshly created users.
pub const DEFAULT_THEME: &str = "system";
