//! Core types and logic for the Slant news service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the domain model, the bias aggregation and opposite-recommendation logic,
//! and the [`store::NewsStore`] abstraction the other crates implement or
//! consume.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod article;
pub mod bias;
pub mod chat;
pub mod defaults;
pub mod error;
pub mod recommend;
pub mod report;
pub mod store;
pub mod user;
pub mod vote;

pub use error::{Error, Result};
