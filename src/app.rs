use crate::cli::Args;
use crate::config::Config;
use crate::data::PgStore;
use crate::error::SyncError;
use crate::mlb::MlbClient;
use crate::sync::{SyncOptions, SyncSummary, Synchronizer};
use crate::utils::fmt_duration;
use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Loader and sink run one at a time, so the pool never needs more than this.
const MAX_DB_CONNECTIONS: u32 = 2;

/// Fully wired sync run: store, API client and coordinator.
pub struct App {
    args: Args,
    synchronizer: Synchronizer<PgStore, MlbClient>,
}

impl App {
    /// Build the database pool and API client. No connection is opened until
    /// the first query, so a bad host surfaces as a store error from the loader.
    pub fn new(config: &Config, args: Args) -> Result<Self, SyncError> {
        let connect_options = PgConnectOptions::from_str(&config.database_url)
            .map_err(|e| SyncError::Configuration(format!("invalid DATABASE_URL: {e}")))?
            .log_statements(tracing::log::LevelFilter::Debug)
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(1));

        let db_pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(MAX_DB_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(60))
            .connect_lazy_with(connect_options);

        let client = MlbClient::new(
            config.mlb_api_url.clone(),
            config.api_timeout,
            config.max_concurrent_requests,
        )
        .map_err(|e| SyncError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let options = SyncOptions {
            batch_size: args.batch_size,
            max_concurrent: config.max_concurrent_requests,
            flush_threshold: config.flush_threshold,
        };

        info!(
            max_connections = MAX_DB_CONNECTIONS,
            api_url = client.transactions_url(),
            api_timeout = fmt_duration(config.api_timeout),
            "Clients configured"
        );

        Ok(Self {
            args,
            synchronizer: Synchronizer::new(PgStore::new(db_pool), client, options),
        })
    }

    pub async fn run(self) -> Result<SyncSummary, SyncError> {
        let range = self.args.player_range;
        let options = self.synchronizer.options();

        info!(
            version = env!("CARGO_PKG_VERSION"),
            commit = env!("GIT_COMMIT_SHORT"),
            "Starting MLB player team history sync"
        );
        info!(
            range = %range,
            players_requested = range.id_count(),
            batch_size = options.batch_size,
            max_concurrent = options.max_concurrent,
            flush_threshold = options.flush_threshold,
            "Run configuration"
        );

        self.synchronizer.run(&range).await
    }
}
