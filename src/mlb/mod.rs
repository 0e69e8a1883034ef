//! MLB Stats API client.

pub mod client;
pub mod errors;
pub mod json;
pub mod models;

pub use client::{DEFAULT_TRANSACTIONS_URL, MlbClient};
pub use errors::FetchError;

use crate::data::models::{PlayerId, TeamId, TransactionRecord};
use async_trait::async_trait;
use std::collections::HashSet;

/// Source of per-player transaction history.
///
/// One call is one attempt; implementations do not retry.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch `player`'s transactions, keeping only entries that move the
    /// player to a team in `valid_teams` on a parseable date.
    async fn fetch_transactions(
        &self,
        player: PlayerId,
        valid_teams: &HashSet<TeamId>,
    ) -> Result<Vec<TransactionRecord>, FetchError>;
}
