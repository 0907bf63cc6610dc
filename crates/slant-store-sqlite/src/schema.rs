//! SQL schema for the Slant SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    external_id   TEXT NOT NULL UNIQUE,  -- identity provider subject
    nickname      TEXT NOT NULL,
    preferences   TEXT NOT NULL,         -- JSON Preferences
    bias_profile  TEXT NOT NULL,         -- JSON UserBiasProfile
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS articles (
    article_id    TEXT PRIMARY KEY,
    title         TEXT NOT NULL UNIQUE,  -- ingestion dedupes on title
    body          TEXT NOT NULL,
    source        TEXT NOT NULL,
    source_url    TEXT,
    category      TEXT NOT NULL,
    bias          TEXT NOT NULL CHECK (bias IN ('left', 'center', 'right')),
    summary       TEXT,
    published_at  TEXT,
    created_at    TEXT NOT NULL
);

-- One row per (user, article); re-voting overwrites.
CREATE TABLE IF NOT EXISTS votes (
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    article_id    TEXT NOT NULL REFERENCES articles(article_id),
    agree         INTEGER NOT NULL,
    cast_at       TEXT NOT NULL,
    PRIMARY KEY (user_id, article_id)
);

CREATE TABLE IF NOT EXISTS chat_histories (
    chat_id       TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    article_id    TEXT NOT NULL REFERENCES articles(article_id),
    messages      TEXT NOT NULL,         -- JSON array of ChatMessage
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    UNIQUE (user_id, article_id)
);

CREATE INDEX IF NOT EXISTS articles_bias_published_idx
    ON articles(bias, published_at);
CREATE INDEX IF NOT EXISTS articles_published_idx ON articles(published_at);
CREATE INDEX IF NOT EXISTS chat_user_updated_idx
    ON chat_histories(user_id, updated_at);

PRAGMA user_version = 1;
";
