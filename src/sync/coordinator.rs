use crate::data::HistoryStore;
use crate::data::models::{PlayerId, PlayerRange, TeamId, TransactionRecord};
use crate::error::SyncError;
use crate::mlb::{FetchError, TransactionSource};
use crate::sync::{Accumulator, SyncOptions, SyncSummary};
use crate::utils::{fmt_duration, percent};
use futures::future::join_all;
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// How many player ids to echo when the valid set is first loaded.
const PLAYER_SAMPLE_LEN: usize = 5;

/// Records and failure count gathered from one batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Records in batch order, then per-player response order.
    pub records: Vec<TransactionRecord>,
    pub failed: usize,
}

/// Drives one sync run over a player range.
///
/// Fetch futures for a batch are polled together on the calling task and never
/// spawned, so the accumulator is only touched between batches. The admission
/// gate is shared across batches and caps in-flight fetches at
/// `max_concurrent`.
pub struct Synchronizer<S, F> {
    store: S,
    source: F,
    options: SyncOptions,
    gate: Semaphore,
}

impl<S: HistoryStore, F: TransactionSource> Synchronizer<S, F> {
    pub fn new(store: S, source: F, options: SyncOptions) -> Self {
        // A zero batch size would panic in `chunks`, a zero gate would never admit
        let options = SyncOptions {
            batch_size: options.batch_size.max(1),
            max_concurrent: options.max_concurrent.max(1),
            flush_threshold: options.flush_threshold.max(1),
        };
        Self {
            store,
            source,
            gate: Semaphore::new(options.max_concurrent),
            options,
        }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Sync every valid player in `range`.
    ///
    /// Store failures and integrity violations abort the run. Unflushed
    /// records are lost in that case.
    pub async fn run(&self, range: &PlayerRange) -> Result<SyncSummary, SyncError> {
        let started = Instant::now();
        let mut summary = SyncSummary::default();

        let valid_teams = self.store.load_valid_teams().await?;
        let valid_players = self.store.load_valid_players(range).await?;

        if valid_players.is_empty() {
            warn!(range = %range, "No players found in mlb_player for range");
            info!("Nothing to process");
            return Ok(summary);
        }

        // BTreeSet iteration is ascending, which fixes the batch boundaries.
        let players: Vec<PlayerId> = valid_players.iter().copied().collect();
        summary.players_valid = players.len();
        info!(
            count = players.len(),
            sample = ?&players[..players.len().min(PLAYER_SAMPLE_LEN)],
            "Found valid players"
        );

        let mut accumulator = Accumulator::new(self.options.flush_threshold);

        for batch in players.chunks(self.options.batch_size) {
            let (first, last) = (batch[0], batch[batch.len() - 1]);
            info!(
                players = batch.len(),
                batch_start = %first,
                batch_end = %last,
                "Processing batch"
            );

            let outcome = self
                .process_batch(batch, &valid_players, &valid_teams)
                .await?;
            let yielded = outcome.records.len();

            summary.players_processed += batch.len();
            summary.failed_fetches += outcome.failed;
            summary.records_fetched += yielded;
            accumulator.extend(outcome.records);

            info!(
                processed = summary.players_processed,
                total = players.len(),
                percent = format!("{:.1}", percent(summary.players_processed, players.len())),
                batch_records = yielded,
                batch_failures = outcome.failed,
                accumulated = accumulator.len(),
                "Batch complete"
            );

            if accumulator.should_flush() {
                self.flush(&mut accumulator, &mut summary).await?;
            }
        }

        if !accumulator.is_empty() {
            self.flush(&mut accumulator, &mut summary).await?;
        }

        info!(
            players = summary.players_processed,
            failed_fetches = summary.failed_fetches,
            records_fetched = summary.records_fetched,
            records_flushed = summary.records_flushed,
            rows_written = summary.rows_written,
            flushes = summary.flushes,
            duration = fmt_duration(started.elapsed()),
            "Sync completed"
        );

        Ok(summary)
    }

    /// Fetch every player in `batch` under the admission gate.
    ///
    /// Fails with [`SyncError::DataIntegrity`] before any fetch if the batch
    /// holds a player outside `valid_players`. Individual fetch failures only
    /// bump [`BatchOutcome::failed`].
    pub async fn process_batch(
        &self,
        batch: &[PlayerId],
        valid_players: &BTreeSet<PlayerId>,
        valid_teams: &HashSet<TeamId>,
    ) -> Result<BatchOutcome, SyncError> {
        let invalid: Vec<PlayerId> = batch
            .iter()
            .copied()
            .filter(|p| !valid_players.contains(p))
            .collect();
        if !invalid.is_empty() {
            error!(invalid = ?invalid, "Batch contains unvalidated player ids");
            return Err(SyncError::DataIntegrity { invalid });
        }

        let results = join_all(
            batch
                .iter()
                .map(|&player| self.fetch_gated(player, valid_teams)),
        )
        .await;

        let mut outcome = BatchOutcome::default();
        for (&player, result) in batch.iter().zip(results) {
            match result {
                Ok(records) => outcome.records.extend(records),
                Err(e) => {
                    outcome.failed += 1;
                    log_fetch_failure(player, &e);
                }
            }
        }

        debug!(
            players = batch.len(),
            records = outcome.records.len(),
            failed = outcome.failed,
            "Batch fetched"
        );
        Ok(outcome)
    }

    async fn fetch_gated(
        &self,
        player: PlayerId,
        valid_teams: &HashSet<TeamId>,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        // The gate is owned here and never closed
        let _permit = self
            .gate
            .acquire()
            .await
            .expect("admission gate closed");
        self.source.fetch_transactions(player, valid_teams).await
    }

    async fn flush(
        &self,
        accumulator: &mut Accumulator,
        summary: &mut SyncSummary,
    ) -> Result<(), SyncError> {
        let records = accumulator.take();
        debug!(
            records = records.len(),
            threshold = accumulator.threshold(),
            "Flushing accumulated records"
        );

        let rows = self.store.upsert_history(&records).await?;

        summary.records_flushed += records.len();
        summary.rows_written += rows;
        summary.flushes += 1;
        Ok(())
    }
}

fn log_fetch_failure(player: PlayerId, err: &FetchError) {
    match err {
        FetchError::Timeout => {
            warn!(player = %player, "Transactions request timed out, skipping player");
        }
        FetchError::Status { status } => {
            warn!(player = %player, status, "Transactions request rejected, skipping player");
        }
        FetchError::Parse { url, source } => {
            warn!(
                player = %player,
                url,
                error = ?source,
                "Failed to parse transactions response, skipping player"
            );
        }
        FetchError::Request(_) => {
            warn!(player = %player, error = ?err, "Transactions request failed, skipping player");
        }
    }
}
