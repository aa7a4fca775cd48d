//! Long-running background task that polls the Soroban RPC and writes
//! decoded governance ledger events to the database.
//!
//! This task is the only writer; the API only reads.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next poll starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub ledger: u32,
    pub cursor: Option<String>,
}

impl Position {
    /// Resume from a persisted cursor, or from `start_ledger` on a fresh
    /// database.
    pub fn resume(last_ledger: i64, cursor: Option<String>, start_ledger: u32) -> Self {
        let ledger = u32::try_from(last_ledger)
            .ok()
            .filter(|l| *l > 0)
            .unwrap_or(start_ledger);
        Self { ledger, cursor }
    }

    /// Position after a page: keep paginating with the returned cursor and
    /// never move the ledger backwards.
    pub fn advance(&self, page_cursor: Option<String>, latest_ledger: Option<u64>) -> Self {
        let ledger = latest_ledger
            .and_then(|l| u32::try_from(l).ok())
            .map(|l| l.max(self.ledger))
            .unwrap_or(self.ledger);
        Self {
            ledger,
            cursor: page_cursor.or_else(|| self.cursor.clone()),
        }
    }
}

/// Run the indexer loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting for contract {}", state.config.contract_id);

    let mut position = starting_position(&state.pool, state.config.start_ledger).await;

    info!("Resuming from ledger {}", position.ledger);

    loop {
        match poll_once(&state, &position).await {
            Ok(next) => position = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Indexer stopping at ledger {}", position.ledger);
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
}

/// Load the persisted position. A failed read is logged and the indexer
/// starts over from `start_ledger`; inserts are idempotent so replaying is safe.
async fn starting_position(pool: &SqlitePool, start_ledger: u32) -> Position {
    let (last_ledger, cursor) = match db::load_cursor(pool).await {
        Ok(saved) => saved,
        Err(e) => {
            warn!("Failed to load saved cursor, starting from ledger {start_ledger}: {e}");
            (0, None)
        }
    };
    Position::resume(last_ledger, cursor, start_ledger)
}

/// Perform a single poll iteration and return the next position.
async fn poll_once(state: &IndexerState, position: &Position) -> Result<Position> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next = position.advance(page.cursor, page.latest_ledger);

    // Persist cursor so restarts are deterministic.
    db::save_cursor(&state.pool, next.ledger as i64, next.cursor.as_deref()).await?;

    Ok(next)
}
