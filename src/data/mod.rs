//! Database models and access.

pub mod history;
pub mod models;
pub mod reference;
mod store;

pub use store::{HistoryStore, PgStore};
