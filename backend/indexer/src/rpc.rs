//! Soroban RPC client: polls `getEvents` and decodes governance ledger events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * JSON-RPC codes `-32600` (invalid request) and `-32601` (unknown method)
//!   are returned as [`IndexerError::Rpc`] without retrying.
//!
//! ## Decoding
//!
//! Topic layout per event kind:
//!
//! | Kind                  | topic[0]    | topic[1]     | topic[2]      |
//! |-----------------------|-------------|--------------|---------------|
//! | project events        | symbol      | `project_id` |               |
//! | proposal/vote events  | symbol      | `project_id` | `proposal_id` |
//! | `admin_set`           | symbol      |              |               |
//!
//! Events from failed contract calls were rolled back on-chain and are
//! dropped.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, LedgerEvent, VOTE_NO, VOTE_YES};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// JSON-RPC codes that will never succeed on retry.
const HARD_ERROR_CODES: [i64; 2] = [-32600, -32601];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawEvent {
    /// XDR-decoded topic list
    pub topic: Vec<String>,
    /// XDR-decoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

/// One page of `getEvents` output.
#[derive(Debug, Default)]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    /// Opaque cursor to continue from, if the RPC returned one.
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

/// Doubling retry delay capped at [`MAX_BACKOFF_SECS`].
struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    async fn wait(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events for `contract_id`.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive); ignored
///   when `cursor` is set.
/// * `cursor`: optional opaque pagination cursor from a previous response.
/// * `limit`: maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventsPage> {
    let mut backoff = Backoff::new();
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {}s): {e}", backoff.secs);
                backoff.wait().await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {}s)", backoff.secs);
            backoff.wait().await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if HARD_ERROR_CODES.contains(&err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            warn!(
                "RPC soft error (will retry in {}s): {} {}",
                backoff.secs, err.code, err.message
            );
            backoff.wait().await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventsPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a page of raw RPC events into [`LedgerEvent`]s, preserving order.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<LedgerEvent> {
    raw.iter()
        .enumerate()
        .filter_map(|(idx, e)| decode_single(e, idx, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, idx: usize, contract_id: &str) -> Option<LedgerEvent> {
    if raw.in_successful_contract_call == Some(false) {
        trace!("Skipping event from failed call: {:?}", raw.id);
        return None;
    }

    let kind = EventKind::from_topic(&topic_text(raw.topic.first()?));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let (project_id, proposal_id) = match kind {
        EventKind::AdminChanged => (None, None),
        k if k.has_proposal_topic() => (
            raw.topic.get(1).map(|t| topic_text(t)),
            raw.topic.get(2).map(|t| topic_text(t)),
        ),
        _ => (raw.topic.get(1).map(|t| topic_text(t)), None),
    };

    let (actor, detail) = decode_data(&raw.value, kind);

    // The RPC id is unique per event; fall back to the paging token, then to
    // a position-derived key so re-polls of the same page still dedupe.
    let event_id = raw
        .id
        .clone()
        .or_else(|| raw.paging_token.clone())
        .unwrap_or_else(|| {
            format!(
                "{ledger}:{}:{idx}",
                raw.tx_hash.as_deref().unwrap_or("-")
            )
        });

    Some(LedgerEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        project_id,
        proposal_id,
        actor,
        detail,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pull `(actor, detail)` out of the event data blob.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::ProjectCreated => (field(value, "creator"), field(value, "name")),
        EventKind::ProjectStatusChanged => (field(value, "caller"), field(value, "new_status")),
        EventKind::ProposalCreated => (field(value, "proposer"), field(value, "description")),
        EventKind::VoteCast => {
            let choice = field(value, "vote").map(|v| {
                if v == "true" {
                    VOTE_YES.to_string()
                } else {
                    VOTE_NO.to_string()
                }
            });
            (field(value, "voter"), choice)
        }
        EventKind::ProposalFinalized => (field(value, "caller"), field(value, "status")),
        EventKind::AdminChanged => (field(value, "admin"), field(value, "previous")),
        EventKind::Unknown => (None, None),
    }
}

/// Look up `key` at the top level or anywhere below it.
fn field(value: &Value, key: &str) -> Option<String> {
    if let Value::Object(map) = value {
        if let Some(v) = map.get(key) {
            return as_text(v);
        }
        return map.values().find_map(|v| field(v, key));
    }
    None
}

/// Flatten the RPC's JSON rendering of a Soroban value into plain text.
///
/// Handles bare scalars, single-key wrappers such as `{"symbol": "Approved"}`
/// or `{"type": "u64", "value": "1"}`, and enum variants rendered as a
/// one-element vector (`["Approved"]`).
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.first().and_then(as_text),
        Value::Object(map) => map
            .get("value")
            .and_then(as_text)
            .or_else(|| match map.len() {
                1 => map.values().next().and_then(as_text),
                _ => None,
            }),
        Value::Null => None,
    }
}

/// Extract the text of a topic entry, which may be a JSON wrapper or a raw
/// string.
fn topic_text(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .as_ref()
        .and_then(as_text)
        .unwrap_or_else(|| raw.to_string())
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
