//! Wire types for the `/api/v1/transactions` endpoint.

use crate::data::models::{PlayerId, TeamId, TransactionRecord, normalize_description};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::trace;

/// Top-level payload. Entries stay raw so a mistyped field only costs that entry.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<serde_json::Value>,
}

/// One transaction entry. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub to_team: Option<TeamRef>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamRef {
    #[serde(default)]
    pub id: Option<i32>,
}

impl Transaction {
    /// Convert into a history record, or `None` when the entry has no
    /// destination team, names a team outside `valid_teams`, or carries a
    /// date that isn't `YYYY-MM-DD`.
    pub fn into_record(
        self,
        player: PlayerId,
        valid_teams: &HashSet<TeamId>,
    ) -> Option<TransactionRecord> {
        let team = TeamId(self.to_team?.id?);
        if !valid_teams.contains(&team) {
            return None;
        }

        let date = NaiveDate::parse_from_str(self.date.as_deref()?, "%Y-%m-%d").ok()?;

        Some(TransactionRecord {
            player,
            date,
            team,
            description: normalize_description(self.description.as_deref().unwrap_or_default()),
        })
    }
}

impl TransactionsResponse {
    /// Keep only the entries that decode as a [`Transaction`] and pass
    /// [`Transaction::into_record`], in order.
    pub fn into_records(
        self,
        player: PlayerId,
        valid_teams: &HashSet<TeamId>,
    ) -> Vec<TransactionRecord> {
        self.transactions
            .into_iter()
            .enumerate()
            .filter_map(
                |(index, raw)| match serde_json::from_value::<Transaction>(raw) {
                    Ok(entry) => entry.into_record(player, valid_teams),
                    Err(e) => {
                        trace!(player = %player, index, error = %e, "Skipping malformed entry");
                        None
                    }
                },
            )
            .collect()
    }
}
