//! The store seam the sync coordinator talks to.

use crate::data::history;
use crate::data::models::{PlayerId, PlayerRange, TeamId, TransactionRecord};
use crate::data::reference;
use crate::error::SyncError;
use crate::utils::log_if_slow;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};
use tracing::{error, info};

const SLOW_UPSERT_THRESHOLD: Duration = Duration::from_secs(5);

/// Reads the reference sets and writes history rows.
///
/// Every failure here is fatal to the run.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load_valid_teams(&self) -> Result<HashSet<TeamId>, SyncError>;

    async fn load_valid_players(
        &self,
        range: &PlayerRange,
    ) -> Result<BTreeSet<PlayerId>, SyncError>;

    /// Upsert `records` keyed by `(player, date)`. Empty input is a no-op.
    async fn upsert_history(&self, records: &[TransactionRecord]) -> Result<u64, SyncError>;
}

/// PostgreSQL-backed [`HistoryStore`]. Each call checks out its own pooled connection.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgStore {
    async fn load_valid_teams(&self) -> Result<HashSet<TeamId>, SyncError> {
        reference::load_valid_teams(&self.pool).await
    }

    async fn load_valid_players(
        &self,
        range: &PlayerRange,
    ) -> Result<BTreeSet<PlayerId>, SyncError> {
        reference::load_valid_players(&self.pool, range).await
    }

    async fn upsert_history(&self, records: &[TransactionRecord]) -> Result<u64, SyncError> {
        if records.is_empty() {
            info!("No records to upsert");
            return Ok(0);
        }

        info!(records = records.len(), "Upserting team history records");
        let start = Instant::now();

        match history::batch_upsert(&self.pool, records).await {
            Ok(rows) => {
                log_if_slow(start, SLOW_UPSERT_THRESHOLD, "team history upsert");
                info!(records = records.len(), rows, "Upserted team history records");
                Ok(rows)
            }
            Err(e) => {
                error!(records = records.len(), error = ?e, "Team history upsert failed, rolled back");
                Err(e)
            }
        }
    }
}
