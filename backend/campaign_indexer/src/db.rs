//! Database layer: migrations, queries and cursor management.

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::errors::Result;
use crate::events::{CampaignEvent, EventRecord};

const EVENT_COLUMNS: &str = "id, event_type, campaign_id, milestone_index, actor, amount, \
                             ledger, timestamp, contract_id, tx_hash, created_at";

/// Open the SQLite pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };
    // Create the file on first start.
    let url = if url.contains('?') || url.contains(":memory:") {
        url
    } else {
        format!("{url}?mode=rwc")
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Where the previous run stopped: the last ledger and, if a page was
/// interrupted, the RPC pagination cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub last_ledger: i64,
    pub last_cursor: Option<String>,
}

pub async fn load_cursor(pool: &SqlitePool) -> Result<Cursor> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row
        .map(|(last_ledger, last_cursor)| Cursor {
            last_ledger,
            last_cursor,
        })
        .unwrap_or_default())
}

pub async fn save_cursor(pool: &SqlitePool, cursor: &Cursor) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(cursor.last_ledger)
        .bind(&cursor.last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events in one transaction and return how many
/// were new. Re-ingesting an event already stored is a no-op.
pub async fn insert_events(pool: &SqlitePool, events: &[CampaignEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_type, campaign_id, milestone_index, actor, amount,
                 ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&ev.event_type)
        .bind(&ev.campaign_id)
        .bind(ev.milestone_index)
        .bind(&ev.actor)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// All events, oldest first.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY ledger ASC, id ASC");
    Ok(sqlx::query_as::<_, EventRecord>(&sql)
        .fetch_all(pool)
        .await?)
}

/// Events of one campaign, oldest first.
pub async fn get_events_for_campaign(
    pool: &SqlitePool,
    campaign_id: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE campaign_id = ?1 ORDER BY ledger ASC, id ASC"
    );
    Ok(sqlx::query_as::<_, EventRecord>(&sql)
        .bind(campaign_id)
        .fetch_all(pool)
        .await?)
}

/// Proposal, votes and release of one milestone, oldest first.
pub async fn get_events_for_milestone(
    pool: &SqlitePool,
    campaign_id: &str,
    milestone_index: i64,
) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE campaign_id = ?1 AND milestone_index = ?2 \
         ORDER BY ledger ASC, id ASC"
    );
    Ok(sqlx::query_as::<_, EventRecord>(&sql)
        .bind(campaign_id)
        .bind(milestone_index)
        .fetch_all(pool)
        .await?)
}
