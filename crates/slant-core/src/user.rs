//! Users, their preferences, and their self-declared bias profile.
//!
//! The self-declared [`UserBiasProfile`] is independent of the distribution
//! derived from votes; neither ever overwrites the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::DEFAULT_THEME;

// ─── Bias profile ────────────────────────────────────────────────────────────

/// A self-assigned leaning on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfLabel {
  Left,
  Center,
  Right,
  #[default]
  Neutral,
  Liberal,
  Conservative,
}

/// A user's declared leaning, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserBiasProfile {
  #[serde(default)]
  pub political: SelfLabel,
  #[serde(default)]
  pub economic:  SelfLabel,
  #[serde(default)]
  pub social:    SelfLabel,
}

// ─── Preferences ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
  pub email: bool,
  pub push:  bool,
}

impl Default for NotificationPreferences {
  fn default() -> Self { Self { email: true, push: true } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
  #[serde(default)]
  pub notifications: NotificationPreferences,
  /// `"system"`, `"light"`, `"dark"`, or anything a client understands.
  #[serde(default = "default_theme")]
  pub theme:         String,
}

fn default_theme() -> String { DEFAULT_THEME.to_owned() }

impl Default for Preferences {
  fn default() -> Self {
    Self {
      notifications: NotificationPreferences::default(),
      theme:         default_theme(),
    }
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:      Uuid,
  /// Subject identifier issued by the identity provider.
  pub external_id:  String,
  pub nickname:     String,
  pub preferences:  Preferences,
  pub bias_profile: UserBiasProfile,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Partial update for [`crate::store::NewsStore::update_user`]. `None` fields
/// are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
  pub nickname:     Option<String>,
  pub preferences:  Option<Preferences>,
  pub bias_profile: Option<UserBiasProfile>,
}

impl UserUpdate {
  pub fn is_empty(&self) -> bool {
    self.nickname.is_none()
      && self.preferences.is_none()
      && self.bias_profile.is_none()
  }
}
