//! Database operations for the `mlb_player_team_history` table.

use crate::data::models::{PlayerId, TransactionRecord};
use crate::error::SyncError;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::HashMap;

/// Collapse records sharing a `(player, date)` key, keeping the last one.
///
/// Survivors keep the position of their key's first occurrence. A single
/// `INSERT ... ON CONFLICT` statement cannot update the same row twice, so
/// this must run before [`batch_upsert`] binds its arrays.
pub fn dedupe_last_wins(records: &[TransactionRecord]) -> Vec<&TransactionRecord> {
    let mut slots: HashMap<(PlayerId, NaiveDate), usize> = HashMap::with_capacity(records.len());
    let mut out: Vec<&TransactionRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(&record.key()) {
            Some(&idx) => out[idx] = record,
            None => {
                slots.insert(record.key(), out.len());
                out.push(record);
            }
        }
    }

    out
}

/// Bulk upsert history rows using the UNNEST pattern, inside one transaction.
///
/// On conflict (same player and date) the team and description are replaced.
/// Returns the number of rows written after de-duplication.
pub async fn batch_upsert(pool: &PgPool, records: &[TransactionRecord]) -> Result<u64, SyncError> {
    if records.is_empty() {
        return Ok(0);
    }

    let rows = dedupe_last_wins(records);

    let players: Vec<i32> = rows.iter().map(|r| r.player.0).collect();
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
    let teams: Vec<i32> = rows.iter().map(|r| r.team.0).collect();
    let descriptions: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| SyncError::from_store("failed to begin history transaction", e))?;

    // Dropping `tx` on the error path rolls the transaction back.
    let result = sqlx::query(
        r#"
        INSERT INTO mlb_player_team_history (mlb_player, date, mlb_team, description)
        SELECT * FROM UNNEST($1::int4[], $2::date[], $3::int4[], $4::text[])
        ON CONFLICT (mlb_player, date)
        DO UPDATE SET
            mlb_team = EXCLUDED.mlb_team,
            description = EXCLUDED.description
        "#,
    )
    .bind(&players)
    .bind(&dates)
    .bind(&teams)
    .bind(&descriptions)
    .execute(&mut *tx)
    .await
    .map_err(|e| SyncError::from_store("failed to upsert team history", e))?;

    tx.commit()
        .await
        .map_err(|e| SyncError::from_store("failed to commit team history", e))?;

    Ok(result.rows_affected())
}
