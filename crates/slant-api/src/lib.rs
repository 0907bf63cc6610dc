//! JSON REST API for Slant.
//!
//! Exposes an axum [`Router`] backed by any [`slant_core::store::NewsStore`].
//! End-user authentication happens upstream; TLS and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", slant_api::api_router(state))
//! ```

pub mod articles;
pub mod auth;
pub mod bias;
pub mod chats;
pub mod error;
pub mod users;
pub mod votes;

use std::sync::Arc;

use axum::{Router, routing::get};
use slant_core::{
  defaults::{DEFAULT_LATEST_LIMIT, DEFAULT_RECOMMENDATION_LIMIT},
  store::NewsStore,
};

pub use auth::AdminCredentials;
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Request-handling knobs, independent of transport.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Header carrying the identity provider's subject id.
  pub identity_header:       String,
  /// Opposite-leaning articles returned with a bias report.
  pub recommendation_limit:  usize,
  /// Default page size for `GET /articles`.
  pub latest_articles_limit: usize,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      identity_header:       "x-user-id".to_string(),
      recommendation_limit:  DEFAULT_RECOMMENDATION_LIMIT,
      latest_articles_limit: DEFAULT_LATEST_LIMIT,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: NewsStore> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
  /// `None` disables the admin routes.
  pub admin:  Option<Arc<AdminCredentials>>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: NewsStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Bias
    .route("/bias", get(bias::report::<S>).put(bias::put_profile::<S>))
    // Profile
    .route("/user", get(users::get_me::<S>).put(users::update_me::<S>))
    // Votes
    .route("/votes", get(votes::lookup::<S>).post(votes::cast::<S>))
    // Articles
    .route("/articles", get(articles::list::<S>).post(articles::ingest::<S>))
    .route("/articles/{id}", get(articles::get_one::<S>))
    // Chat histories
    .route(
      "/chat-history",
      get(chats::get_one::<S>)
        .post(chats::save::<S>)
        .delete(chats::delete_one::<S>),
    )
    .route("/chat-histories", get(chats::list::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use slant_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(b"secret", &salt)
      .unwrap()
      .to_string();

    AppState {
      store:  Arc::new(store),
      config: Arc::new(ApiConfig::default()),
      admin:  Some(Arc::new(AdminCredentials {
        username:      "ops".to_string(),
        password_hash: hash,
      })),
    }
  }

  fn admin_header() -> String {
    format!("Basic {}", B64.encode("ops:secret"))
  }

  async fn call(
    state:   &AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: &[(&str, &str)],
    body:    Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(*k, *v);
    }
    let req = match body {
      Some(b) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(b.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp   = api_router(state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes  = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value  = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
  }

  const ALICE: (&str, &str) = ("x-user-id", "idp|alice");

  async fn seed_articles(state: &AppState<SqliteStore>) -> Value {
    let auth = admin_header();
    let (status, body) = call(
      state,
      "POST",
      "/articles",
      &[("authorization", auth.as_str())],
      Some(json!([
        { "title": "Left take", "source": "Daily A", "bias": "left",
          "published_at": "2024-05-01T08:00:00Z" },
        { "title": "Right take", "source": "Daily B", "bias": "right",
          "published_at": "2024-05-02T08:00:00Z" },
        { "title": "Older right take", "source": "Daily B", "bias": "right",
          "published_at": "2024-04-02T08:00:00Z" },
      ])),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["saved"], 3);
    body["articles"].clone()
  }

  fn id_of(articles: &Value, title: &str) -> String {
    articles
      .as_array()
      .unwrap()
      .iter()
      .find(|a| a["title"] == title)
      .unwrap()["article_id"]
      .as_str()
      .unwrap()
      .to_string()
  }

  // ── Authentication ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_identity_returns_401() {
    let state = make_state().await;
    for uri in ["/bias", "/user", "/chat-histories"] {
      let (status, body) = call(&state, "GET", uri, &[], None).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
      assert_eq!(body["error"], "unauthenticated");
    }
  }

  #[tokio::test]
  async fn ingest_requires_admin() {
    let state = make_state().await;
    let req = Request::builder()
      .method("POST")
      .uri("/articles")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(r#"[{"title":"t","source":"s"}]"#))
      .unwrap();
    let resp = api_router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let bad = format!("Basic {}", B64.encode("ops:wrong"));
    let (status, _) = call(
      &state,
      "POST",
      "/articles",
      &[("authorization", bad.as_str())],
      Some(json!([{ "title": "t", "source": "s" }])),
    ).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Bias report ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_user_gets_default_report() {
    let state = make_state().await;
    seed_articles(&state).await;

    let (status, body) = call(&state, "GET", "/bias", &[ALICE], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["biasScores"], json!({ "left": 33, "center": 34, "right": 33 }));
    assert_eq!(body["dominantBias"], "center");
    assert_eq!(body["oppositeArticles"], json!([]));
    assert_eq!(body["stats"]["totalVotes"], 0);
  }

  #[tokio::test]
  async fn vote_shifts_report_and_recommends_opposite() {
    let state = make_state().await;
    let articles = seed_articles(&state).await;
    let left_id = id_of(&articles, "Left take");

    let (status, vote) = call(
      &state,
      "POST",
      "/votes",
      &[ALICE],
      Some(json!({ "articleId": left_id, "voteType": true })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vote["agree"], true);

    let (status, body) = call(&state, "GET", "/bias", &[ALICE], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["biasScores"], json!({ "left": 100, "center": 0, "right": 0 }));
    assert_eq!(body["dominantBias"], "left");
    assert_eq!(
      body["stats"],
      json!({ "totalVotes": 1, "agreeVotes": 1, "disagreeVotes": 0, "articlesRead": 1 })
    );

    let recommended = body["oppositeArticles"].as_array().unwrap();
    assert_eq!(recommended.len(), 2);
    assert_eq!(recommended[0]["title"], "Right take");
    assert_eq!(recommended[1]["title"], "Older right take");
    assert!(recommended.iter().all(|a| a["bias"] == "right"));
    assert!(recommended[0].get("id").is_some());
  }

  #[tokio::test]
  async fn known_user_without_votes_matches_unknown_user() {
    let state = make_state().await;
    seed_articles(&state).await;
    let (_, unknown) = call(&state, "GET", "/bias", &[ALICE], None).await;

    call(&state, "GET", "/user", &[ALICE], None).await;
    let (status, known) = call(&state, "GET", "/bias", &[ALICE], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(known, unknown);
    assert_eq!(known["oppositeArticles"], json!([]));
  }

  #[tokio::test]
  async fn tied_votes_recommend_left_or_right() {
    let state = make_state().await;
    let articles = seed_articles(&state).await;
    for title in ["Left take", "Right take"] {
      call(
        &state,
        "POST",
        "/votes",
        &[ALICE],
        Some(json!({ "articleId": id_of(&articles, title), "voteType": true })),
      ).await;
    }

    let (_, body) = call(&state, "GET", "/bias", &[ALICE], None).await;
    assert_eq!(body["biasScores"], json!({ "left": 50, "center": 0, "right": 50 }));
    assert_eq!(body["dominantBias"], "center");
    let recommended = body["oppositeArticles"].as_array().unwrap();
    assert!(!recommended.is_empty());
    let label = recommended[0]["bias"].clone();
    assert!(label == "left" || label == "right");
    assert!(recommended.iter().all(|a| a["bias"] == label));
  }

  #[tokio::test]
  async fn put_bias_profile_leaves_distribution_alone() {
    let state = make_state().await;
    let (status, body) = call(
      &state,
      "PUT",
      "/bias",
      &[ALICE],
      Some(json!({ "political": "liberal", "economic": "right", "social": "neutral" })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["political"], "liberal");

    let (_, user) = call(&state, "GET", "/user", &[ALICE], None).await;
    assert_eq!(user["bias_profile"]["economic"], "right");

    let (_, report) = call(&state, "GET", "/bias", &[ALICE], None).await;
    assert_eq!(report["biasScores"], json!({ "left": 33, "center": 34, "right": 33 }));
  }

  // ── Votes ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn vote_requires_article_id_and_vote_type() {
    let state = make_state().await;
    let (status, body) = call(
      &state,
      "POST",
      "/votes",
      &[ALICE],
      Some(json!({ "voteType": true })),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation error: articleId is required");

    let articles = seed_articles(&state).await;
    let (status, _) = call(
      &state,
      "POST",
      "/votes",
      &[ALICE],
      Some(json!({ "articleId": id_of(&articles, "Left take") })),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn vote_on_unknown_article_returns_404() {
    let state = make_state().await;
    let (status, _) = call(
      &state,
      "POST",
      "/votes",
      &[ALICE],
      Some(json!({ "articleId": uuid::Uuid::new_v4(), "voteType": false })),
    ).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn vote_lookup_reflects_latest_vote() {
    let state = make_state().await;
    let articles = seed_articles(&state).await;
    let id = id_of(&articles, "Right take");
    let uri = format!("/votes?articleId={id}");

    let (status, body) = call(&state, "GET", &uri, &[ALICE], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "vote": null }));

    for agree in [true, false] {
      call(
        &state,
        "POST",
        "/votes",
        &[ALICE],
        Some(json!({ "articleId": id, "voteType": agree })),
      ).await;
    }
    let (_, body) = call(&state, "GET", &uri, &[ALICE], None).await;
    assert_eq!(body, json!({ "vote": false }));

    let (status, _) = call(&state, "GET", "/votes", &[ALICE], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Users ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn user_profile_created_then_updated() {
    let state = make_state().await;
    let (status, user) = call(&state, "GET", "/user", &[ALICE], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["external_id"], "idp|alice");
    assert_eq!(user["nickname"], "reader");
    assert_eq!(user["preferences"]["theme"], "system");
    assert_eq!(user["bias_profile"]["political"], "neutral");

    let (status, updated) = call(
      &state,
      "PUT",
      "/user",
      &[ALICE],
      Some(json!({ "nickname": "alice", "preferences": { "theme": "dark" } })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["user_id"], user["user_id"]);
    assert_eq!(updated["nickname"], "alice");
    assert_eq!(updated["preferences"]["theme"], "dark");
    assert_eq!(updated["preferences"]["notifications"]["email"], true);

    let (status, _) = call(
      &state,
      "PUT",
      "/user",
      &[ALICE],
      Some(json!({ "nickname": "  " })),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Articles ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn article_listing_and_lookup() {
    let state = make_state().await;
    let articles = seed_articles(&state).await;

    let (status, list) = call(&state, "GET", "/articles?bias=right&limit=1", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "Right take");

    let id = id_of(&articles, "Left take");
    let (status, one) = call(&state, "GET", &format!("/articles/{id}"), &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["bias"], "left");
    assert_eq!(one["category"], "general");

    let missing = uuid::Uuid::new_v4();
    let (status, _) = call(&state, "GET", &format!("/articles/{missing}"), &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn reingest_skips_known_titles() {
    let state = make_state().await;
    seed_articles(&state).await;
    let auth = admin_header();
    let (status, body) = call(
      &state,
      "POST",
      "/articles",
      &[("authorization", auth.as_str())],
      Some(json!([
        { "title": "Left take", "source": "Daily A" },
        { "title": "Brand new", "source": "Daily C" },
      ])),
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["saved"], 1);
    assert_eq!(body["articles"][0]["title"], "Brand new");
    assert_eq!(body["articles"][0]["bias"], "center");
  }

  #[tokio::test]
  async fn ingest_rejects_blank_title() {
    let state = make_state().await;
    let auth = admin_header();
    let (status, _) = call(
      &state,
      "POST",
      "/articles",
      &[("authorization", auth.as_str())],
      Some(json!([{ "title": " ", "source": "Daily A" }])),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Chat histories ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn chat_history_lifecycle() {
    let state = make_state().await;
    let articles = seed_articles(&state).await;
    let id = id_of(&articles, "Left take");
    let uri = format!("/chat-history?articleId={id}");

    let (status, body) = call(&state, "GET", &uri, &[ALICE], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "history": null }));

    let (status, saved) = call(
      &state,
      "POST",
      "/chat-history",
      &[ALICE],
      Some(json!({
        "articleId": id,
        "messages": [
          { "role": "user", "content": "What is this about?" },
          { "role": "assistant", "content": "A left-leaning take." },
        ],
      })),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["messages"].as_array().unwrap().len(), 2);

    let (_, body) = call(&state, "GET", &uri, &[ALICE], None).await;
    assert_eq!(body["history"]["chat_id"], saved["chat_id"]);

    let (_, list) = call(&state, "GET", "/chat-histories", &[ALICE], None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["article"]["title"], "Left take");

    let (status, _) = call(&state, "DELETE", &uri, &[ALICE], None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&state, "DELETE", &uri, &[ALICE], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn chat_history_requires_messages() {
    let state = make_state().await;
    let articles = seed_articles(&state).await;
    let (status, body) = call(
      &state,
      "POST",
      "/chat-history",
      &[ALICE],
      Some(json!({ "articleId": id_of(&articles, "Right take") })),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation error: messages is required");
  }
}
