//! [`SqliteStore`], the SQLite implementation of [`NewsStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use slant_core::{
  article::{Article, NewArticle},
  chat::{ChatHistory, ChatHistorySummary, ChatMessage},
  defaults::DEFAULT_NICKNAME,
  store::{ArticleQuery, NewsStore},
  user::{Preferences, User, UserBiasProfile, UserUpdate},
  vote::{BiasVote, NewVote, Vote},
};

use crate::{
  Error, Result,
  encode::{
    ARTICLE_COLUMNS, CHAT_COLUMNS, RawArticle, RawBiasVote, RawChatHistory,
    RawChatSummary, RawUser, RawVote, USER_COLUMNS, encode_bias,
    encode_bias_profile, encode_dt, encode_messages, encode_preferences,
    encode_uuid, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Slant news store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Column values for one `articles` insert, encoded ahead of the blocking
/// call.
struct ArticleRow {
  article_id:   String,
  title:        String,
  body:         String,
  source:       String,
  source_url:   Option<String>,
  category:     String,
  bias:         &'static str,
  summary:      Option<String>,
  published_at: Option<String>,
  created_at:   String,
}

impl ArticleRow {
  fn encode(article: &Article) -> Self {
    Self {
      article_id:   encode_uuid(article.article_id),
      title:        article.title.clone(),
      body:         article.body.clone(),
      source:       article.source.clone(),
      source_url:   article.source_url.clone(),
      category:     article.category.clone(),
      bias:         encode_bias(article.bias),
      summary:      article.summary.clone(),
      published_at: article.published_at.map(encode_dt),
      created_at:   encode_dt(article.created_at),
    }
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── NewsStore impl ──────────────────────────────────────────────────────────

impl NewsStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn find_user(&self, external_id: &str) -> Result<Option<User>> {
    let external_id = external_id.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ?1"),
            rusqlite::params![external_id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn ensure_user(&self, external_id: &str) -> Result<User> {
    let external_id  = external_id.to_owned();
    let user_id_str  = encode_uuid(Uuid::new_v4());
    let prefs_str    = encode_preferences(&Preferences::default())?;
    let profile_str  = encode_bias_profile(&UserBiasProfile::default())?;
    let at_str       = encode_dt(now());

    // Insert-if-absent followed by a read keeps concurrent first requests
    // from the same identity down to a single row.
    let raw: RawUser = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, external_id, nickname, preferences, bias_profile,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
           ON CONFLICT (external_id) DO NOTHING",
          rusqlite::params![
            user_id_str,
            external_id,
            DEFAULT_NICKNAME,
            prefs_str,
            profile_str,
            at_str,
          ],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = ?1"),
          rusqlite::params![external_id],
          RawUser::from_row,
        )?)
      })
      .await?;

    raw.into_user()
  }

  async fn update_user(&self, user_id: Uuid, update: UserUpdate) -> Result<Option<User>> {
    let id_str      = encode_uuid(user_id);
    let nickname    = update.nickname;
    let prefs_str   = update.preferences.as_ref().map(encode_preferences).transpose()?;
    let profile_str = update
      .bias_profile
      .as_ref()
      .map(encode_bias_profile)
      .transpose()?;
    let at_str      = encode_dt(now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET
             nickname     = COALESCE(?2, nickname),
             preferences  = COALESCE(?3, preferences),
             bias_profile = COALESCE(?4, bias_profile),
             updated_at   = ?5
           WHERE user_id = ?1",
          rusqlite::params![id_str, nickname, prefs_str, profile_str, at_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn insert_articles(&self, articles: Vec<NewArticle>) -> Result<Vec<Article>> {
    let created_at = now();
    let candidates: Vec<Article> = articles
      .into_iter()
      .map(|input| Article {
        article_id:   Uuid::new_v4(),
        title:        input.title,
        body:         input.body,
        source:       input.source,
        source_url:   input.source_url,
        category:     input.category,
        bias:         input.bias,
        summary:      input.summary,
        published_at: input.published_at,
        created_at,
      })
      .collect();
    let rows: Vec<ArticleRow> = candidates.iter().map(ArticleRow::encode).collect();

    let stored: Vec<bool> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut stored = Vec::with_capacity(rows.len());
        {
          let mut stmt = tx.prepare(
            "INSERT INTO articles (
               article_id, title, body, source, source_url,
               category, bias, summary, published_at, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT (title) DO NOTHING",
          )?;
          for row in &rows {
            let changed = stmt.execute(rusqlite::params![
              row.article_id,
              row.title,
              row.body,
              row.source,
              row.source_url,
              row.category,
              row.bias,
              row.summary,
              row.published_at,
              row.created_at,
            ])?;
            stored.push(changed == 1);
          }
        }
        tx.commit()?;
        Ok(stored)
      })
      .await?;

    Ok(
      candidates
        .into_iter()
        .zip(stored)
        .filter_map(|(article, stored)| stored.then_some(article))
        .collect(),
    )
  }

  async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawArticle> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = ?1"),
            rusqlite::params![id_str],
            RawArticle::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }

  async fn latest_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
    let category  = query.category.clone();
    let bias_str  = query.bias.map(encode_bias);
    let limit_val = i64::try_from(query.limit).unwrap_or(i64::MAX);

    let raws: Vec<RawArticle> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTICLE_COLUMNS}
           FROM articles
           WHERE (?1 IS NULL OR category = ?1)
             AND (?2 IS NULL OR bias = ?2)
           ORDER BY published_at IS NULL, published_at DESC, created_at DESC
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![category, bias_str, limit_val],
            RawArticle::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArticle::into_article).collect()
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn cast_vote(&self, vote: NewVote) -> Result<Vote> {
    let vote = Vote {
      user_id:    vote.user_id,
      article_id: vote.article_id,
      agree:      vote.agree,
      cast_at:    now(),
    };

    let user_str    = encode_uuid(vote.user_id);
    let article_str = encode_uuid(vote.article_id);
    let at_str      = encode_dt(vote.cast_at);
    let agree       = vote.agree;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO votes (user_id, article_id, agree, cast_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (user_id, article_id) DO UPDATE SET
             agree   = excluded.agree,
             cast_at = excluded.cast_at",
          rusqlite::params![user_str, article_str, agree, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(vote)
  }

  async fn get_vote(&self, user_id: Uuid, article_id: Uuid) -> Result<Option<Vote>> {
    let user_str    = encode_uuid(user_id);
    let article_str = encode_uuid(article_id);

    let raw: Option<RawVote> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, article_id, agree, cast_at
             FROM votes WHERE user_id = ?1 AND article_id = ?2",
            rusqlite::params![user_str, article_str],
            |row| {
              Ok(RawVote {
                user_id:    row.get(0)?,
                article_id: row.get(1)?,
                agree:      row.get(2)?,
                cast_at:    row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawVote::into_vote).transpose()
  }

  async fn votes_with_bias(&self, user_id: Uuid) -> Result<Vec<BiasVote>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawBiasVote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT v.article_id, v.agree, a.bias
           FROM votes v
           JOIN articles a ON a.article_id = v.article_id
           WHERE v.user_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| {
            Ok(RawBiasVote {
              article_id: row.get(0)?,
              agree:      row.get(1)?,
              bias:       row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBiasVote::into_bias_vote).collect()
  }

  // ── Chat histories ────────────────────────────────────────────────────────

  async fn get_chat_history(
    &self,
    user_id:    Uuid,
    article_id: Uuid,
  ) -> Result<Option<ChatHistory>> {
    let user_str    = encode_uuid(user_id);
    let article_str = encode_uuid(article_id);

    let raw: Option<RawChatHistory> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {CHAT_COLUMNS} FROM chat_histories
               WHERE user_id = ?1 AND article_id = ?2"
            ),
            rusqlite::params![user_str, article_str],
            RawChatHistory::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawChatHistory::into_history).transpose()
  }

  async fn save_chat_history(
    &self,
    user_id:    Uuid,
    article_id: Uuid,
    messages:   Vec<ChatMessage>,
  ) -> Result<ChatHistory> {
    let chat_str     = encode_uuid(Uuid::new_v4());
    let user_str     = encode_uuid(user_id);
    let article_str  = encode_uuid(article_id);
    let messages_str = encode_messages(&messages)?;
    let at_str       = encode_dt(now());

    let raw: Option<RawChatHistory> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO chat_histories (
             chat_id, user_id, article_id, messages, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
           ON CONFLICT (user_id, article_id) DO UPDATE SET
             messages   = excluded.messages,
             updated_at = excluded.updated_at",
          rusqlite::params![chat_str, user_str, article_str, messages_str, at_str],
        )?;
        Ok(conn
          .query_row(
            &format!(
              "SELECT {CHAT_COLUMNS} FROM chat_histories
               WHERE user_id = ?1 AND article_id = ?2"
            ),
            rusqlite::params![user_str, article_str],
            RawChatHistory::from_row,
          )
          .optional()?)
      })
      .await?;

    raw
      .ok_or_else(|| Error::MissingRow(format!("chat history for article {article_id}")))?
      .into_history()
  }

  async fn delete_chat_history(&self, user_id: Uuid, article_id: Uuid) -> Result<bool> {
    let user_str    = encode_uuid(user_id);
    let article_str = encode_uuid(article_id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM chat_histories WHERE user_id = ?1 AND article_id = ?2",
          rusqlite::params![user_str, article_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn list_chat_histories(&self, user_id: Uuid) -> Result<Vec<ChatHistorySummary>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawChatSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             c.chat_id, c.user_id, c.article_id, c.messages,
             c.created_at, c.updated_at,
             a.title, a.source, a.bias
           FROM chat_histories c
           LEFT JOIN articles a ON a.article_id = c.article_id
           WHERE c.user_id = ?1
           ORDER BY c.updated_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| {
            Ok(RawChatSummary {
              history: RawChatHistory::from_row(row)?,
              title:   row.get(6)?,
              source:  row.get(7)?,
              bias:    row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChatSummary::into_summary).collect()
  }
}
