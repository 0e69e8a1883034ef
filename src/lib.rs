//! Batch sync of MLB player team history.
//!
//! Loads the valid team and player sets from PostgreSQL, fetches each
//! player's transactions from the MLB Stats API under a concurrency ceiling,
//! and upserts the surviving records in size-triggered flushes.

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod mlb;
pub mod sync;
pub mod utils;
