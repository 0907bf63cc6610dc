//! HTTP server wiring for Slant.
//!
//! Owns the on-disk configuration shape and assembles the top-level router:
//! the JSON API under `/api` plus a health check.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use serde::Deserialize;
use slant_api::{AdminCredentials, ApiConfig, AppState, api_router};
use slant_core::{
  defaults::{DEFAULT_LATEST_LIMIT, DEFAULT_RECOMMENDATION_LIMIT},
  store::NewsStore,
};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SLANT_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  #[serde(default = "default_store_path")]
  pub store_path:            PathBuf,
  #[serde(default = "default_identity_header")]
  pub identity_header:       String,
  #[serde(default = "default_recommendation_limit")]
  pub recommendation_limit:  usize,
  #[serde(default = "default_latest_articles_limit")]
  pub latest_articles_limit: usize,
  /// Both admin fields must be set to enable article ingestion.
  pub admin_username:        Option<String>,
  pub admin_password_hash:   Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/slant/slant.db") }
fn default_identity_header() -> String { "x-user-id".to_string() }
fn default_recommendation_limit() -> usize { DEFAULT_RECOMMENDATION_LIMIT }
fn default_latest_articles_limit() -> usize { DEFAULT_LATEST_LIMIT }

impl ServerConfig {
  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      identity_header:       self.identity_header.to_ascii_lowercase(),
      recommendation_limit:  self.recommendation_limit,
      latest_articles_limit: self.latest_articles_limit,
    }
  }

  /// `None` unless both the username and the hash are configured.
  pub fn admin_credentials(&self) -> Option<AdminCredentials> {
    match (&self.admin_username, &self.admin_password_hash) {
      (Some(username), Some(hash)) if !username.is_empty() && !hash.is_empty() => {
        Some(AdminCredentials {
          username:      username.clone(),
          password_hash: hash.clone(),
        })
      }
      _ => None,
    }
  }

  /// Build handler state around an opened store.
  pub fn state<S: NewsStore>(&self, store: S) -> AppState<S> {
    AppState {
      store:  Arc::new(store),
      config: Arc::new(self.api_config()),
      admin:  self.admin_credentials().map(Arc::new),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: API under `/api`, `GET /health`, request tracing.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
