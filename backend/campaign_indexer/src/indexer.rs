//! Background task that polls the Soroban RPC and writes decoded campaign
//! events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db::{self, Cursor};
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Poll until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!(contract = %state.config.contract_id, "Indexer starting");

    let mut cursor = match db::load_cursor(&state.pool).await {
        Ok(cursor) => cursor,
        Err(e) => {
            error!("Could not read saved cursor, starting fresh: {e}");
            Cursor::default()
        }
    };
    if cursor.last_ledger == 0 {
        cursor.last_ledger = state.config.start_ledger as i64;
    }
    info!("Resuming from ledger {}", cursor.last_ledger);

    loop {
        match poll_once(&state, &cursor).await {
            Ok(next) => cursor = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
    info!("Indexer stopped at ledger {}", cursor.last_ledger);
}

/// Fetch one page, store it and persist the advanced cursor.
async fn poll_once(state: &IndexerState, cursor: &Cursor) -> crate::errors::Result<Cursor> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        cursor.last_ledger as u32,
        cursor.last_cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            raw = page.events.len(),
            inserted, "Stored campaign events"
        );
    }

    // Keep paginating with the RPC cursor; the ledger only moves forward.
    let next = Cursor {
        last_ledger: page
            .latest_ledger
            .map(|l| (l as i64).max(cursor.last_ledger))
            .unwrap_or(cursor.last_ledger),
        last_cursor: page.cursor.or_else(|| cursor.last_cursor.clone()),
    };
    db::save_cursor(&state.pool, &next).await?;
    Ok(next)
}
