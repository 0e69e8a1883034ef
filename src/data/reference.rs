//! Reference-set queries: which teams and players the history table may point at.

use crate::data::models::{PlayerId, PlayerRange, TeamId};
use crate::error::SyncError;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

/// Load every team id from `mlb_team`.
pub async fn load_valid_teams(pool: &PgPool) -> Result<HashSet<TeamId>, SyncError> {
    info!("Loading valid team ids");

    let rows = sqlx::query_scalar::<_, TeamId>("SELECT mlb_team FROM mlb_team")
        .fetch_all(pool)
        .await
        .map_err(|e| SyncError::from_store("failed to load valid teams", e))?;

    let teams: HashSet<TeamId> = rows.into_iter().collect();
    info!(count = teams.len(), "Loaded valid team ids");
    Ok(teams)
}

/// Load the player ids in `mlb_player` that fall inside `range` (inclusive).
///
/// An empty set is a normal outcome, not an error.
pub async fn load_valid_players(
    pool: &PgPool,
    range: &PlayerRange,
) -> Result<BTreeSet<PlayerId>, SyncError> {
    info!(range = %range, "Loading valid player ids");

    let rows = sqlx::query_scalar::<_, PlayerId>(
        "SELECT player FROM mlb_player WHERE player BETWEEN $1 AND $2",
    )
    .bind(range.start)
    .bind(range.end)
    .fetch_all(pool)
    .await
    .map_err(|e| SyncError::from_store("failed to load valid players", e))?;

    let players: BTreeSet<PlayerId> = rows.into_iter().collect();
    info!(count = players.len(), range = %range, "Loaded valid player ids");
    Ok(players)
}
