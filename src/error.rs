//! Fatal error taxonomy for a sync run.
//!
//! Everything in [`SyncError`] ends the run. Per-player fetch failures use
//! [`crate::mlb::FetchError`] instead, which deliberately has no conversion into
//! `SyncError`: the coordinator has to absorb them explicitly.

use crate::data::models::PlayerId;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("could not reach the data store")]
    StoreConnection(#[source] sqlx::Error),
    #[error("data store query failed: {context}")]
    StoreQuery {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("batch contains players outside the validated set: {invalid:?}")]
    DataIntegrity { invalid: Vec<PlayerId> },
}

impl SyncError {
    /// Classify a sqlx error as a connectivity failure or a query failure.
    pub fn from_store(context: &'static str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::StoreConnection(err),
            other => Self::StoreQuery {
                context,
                source: other,
            },
        }
    }
}

impl From<figment::Error> for SyncError {
    fn from(err: figment::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_a_connection_error() {
        let err = SyncError::from_store("load teams", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, SyncError::StoreConnection(_)));
    }

    #[test]
    fn missing_row_is_a_query_error() {
        let err = SyncError::from_store("load teams", sqlx::Error::RowNotFound);
        match err {
            SyncError::StoreQuery { context, .. } => assert_eq!(context, "load teams"),
            other => panic!("expected StoreQuery, got {other:?}"),
        }
    }

    #[test]
    fn integrity_error_lists_offending_players() {
        let err = SyncError::DataIntegrity {
            invalid: vec![PlayerId(7), PlayerId(9)],
        };
        let msg = err.to_string();
        assert!(msg.contains('7') && msg.contains('9'), "{msg}");
    }
}
