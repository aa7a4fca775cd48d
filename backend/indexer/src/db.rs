//! Database layer: migrations, queries, and cursor management.

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, EventRecord, LedgerEvent, ProposalTally, VOTE_NO, VOTE_YES};

/// Establish a SQLite connection pool and run pending migrations.
///
/// The database file is created if it does not exist yet.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations in `./migrations`.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the persisted `(last_ledger, last_cursor)` pair.
/// Returns `(0, None)` when nothing has been persisted yet.
pub async fn load_cursor(pool: &SqlitePool) -> Result<(i64, Option<String>)> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT last_ledger, last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.unwrap_or((0, None)))
}

/// Persist the last-seen ledger (and optionally a pagination cursor string).
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO indexer_cursor (id, last_ledger, last_cursor) VALUES (1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET last_ledger = excluded.last_ledger,
                                      last_cursor = excluded.last_cursor
        "#,
    )
    .bind(last_ledger)
    .bind(last_cursor)
    .execute(pool)
    .await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events in one transaction.
///
/// Rows are keyed by `event_id`; an event seen twice (for example after a
/// restart re-polls the last page) is silently ignored. Returns the number
/// of newly stored rows.
pub async fn insert_events(pool: &SqlitePool, events: &[LedgerEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, project_id, proposal_id, actor, detail,
                 ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.project_id)
        .bind(&ev.proposal_id)
        .bind(&ev.actor)
        .bind(&ev.detail)
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

const SELECT_EVENTS: &str = r#"
    SELECT id, event_id, event_type, project_id, proposal_id, actor, detail,
           ledger, timestamp, contract_id, tx_hash, created_at
    FROM   events
"#;

/// Fetch all events, in commit order.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch every event for a project, including its proposals' events.
pub async fn get_events_for_project(
    pool: &SqlitePool,
    project_id: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!("{SELECT_EVENTS} WHERE project_id = ?1 ORDER BY ledger ASC, id ASC");
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(project_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetch the events of one proposal. Proposal ids are only unique within a
/// project, so both ids are required.
pub async fn get_events_for_proposal(
    pool: &SqlitePool,
    project_id: &str,
    proposal_id: &str,
) -> Result<Vec<EventRecord>> {
    let sql = format!(
        "{SELECT_EVENTS} WHERE project_id = ?1 AND proposal_id = ?2 ORDER BY ledger ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, EventRecord>(&sql)
        .bind(project_id)
        .bind(proposal_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Rebuild a proposal's vote totals from the audit log.
///
/// Fails with [`IndexerError::NotFound`] if no `proposal_created` event has
/// been indexed for the pair.
pub async fn get_proposal_tally(
    pool: &SqlitePool,
    project_id: &str,
    proposal_id: &str,
) -> Result<ProposalTally> {
    let created: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM events WHERE event_type = ?1 AND project_id = ?2 AND proposal_id = ?3",
    )
    .bind(EventKind::ProposalCreated.as_str())
    .bind(project_id)
    .bind(proposal_id)
    .fetch_optional(pool)
    .await?;
    if created.is_none() {
        return Err(IndexerError::NotFound(format!(
            "proposal {proposal_id} of project {project_id}"
        )));
    }

    let (yes_votes, no_votes, voters): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(CASE WHEN detail = ?1 THEN 1 ELSE 0 END), 0),
               COALESCE(SUM(CASE WHEN detail = ?2 THEN 1 ELSE 0 END), 0),
               COUNT(DISTINCT actor)
        FROM   events
        WHERE  event_type = ?3 AND project_id = ?4 AND proposal_id = ?5
        "#,
    )
    .bind(VOTE_YES)
    .bind(VOTE_NO)
    .bind(EventKind::VoteCast.as_str())
    .bind(project_id)
    .bind(proposal_id)
    .fetch_one(pool)
    .await?;

    let outcome: Option<(Option<String>,)> = sqlx::query_as(
        r#"
        SELECT detail FROM events
        WHERE  event_type = ?1 AND project_id = ?2 AND proposal_id = ?3
        ORDER  BY ledger ASC, id ASC
        LIMIT  1
        "#,
    )
    .bind(EventKind::ProposalFinalized.as_str())
    .bind(project_id)
    .bind(proposal_id)
    .fetch_optional(pool)
    .await?;

    Ok(ProposalTally {
        project_id: project_id.to_string(),
        proposal_id: proposal_id.to_string(),
        yes_votes,
        no_votes,
        voters,
        outcome: outcome.and_then(|(detail,)| detail),
    })
}
