//! Soroban RPC client: polls `getEvents` and decodes crowdfund events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//!
//! ## Topic encoding
//!
//! Depending on the RPC version, topics arrive either as JSON
//! (`{"type":"symbol","value":"donated"}`) or as base64 `ScVal` XDR. Both are
//! accepted; for XDR only the two shapes the contract publishes (symbol and
//! `u64`) are understood.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CampaignEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// `ScVal` discriminants for the topic shapes the contract emits.
const SCV_U64: u32 = 5;
const SCV_SYMBOL: u32 = 15;

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

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    pub topic: Vec<String>,
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
}

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Fetching
// ─────────────────────────────────────────────────────────

struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Backoff {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    async fn wait(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }
}

/// Fetch a page of contract events.
///
/// Scans from `start_ledger` unless a `cursor` from a previous page is given,
/// in which case pagination continues from there.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = Backoff::new();
    let params = build_params(contract_id, start_ledger, cursor, limit);

    loop {
        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        let resp = match response {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (retrying in {}s): {e}", backoff.secs);
                backoff.wait().await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (retrying in {}s)", backoff.secs);
            backoff.wait().await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            if is_hard_error(err.code) {
                return Err(IndexerError::EventParse(format!(
                    "RPC hard error {}: {}",
                    err.code, err.message
                )));
            }
            warn!(
                "RPC soft error (retrying in {}s): {} {}",
                backoff.secs, err.code, err.message
            );
            backoff.wait().await;
            continue;
        }

        let result = body.result.ok_or_else(|| {
            IndexerError::EventParse("Empty result from getEvents".to_string())
        })?;

        debug!(
            events = result.events.len(),
            latest_ledger = ?result.latest_ledger,
            "Fetched event page"
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

/// Invalid request / unknown method: retrying cannot help.
fn is_hard_error(code: i64) -> bool {
    code == -32600 || code == -32601
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [{ "type": "contract", "contractIds": [contract_id] }],
        "pagination": { "limit": limit }
    });

    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }
    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode raw RPC events into [`CampaignEvent`]s.
///
/// Events from rolled-back invocations are dropped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CampaignEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<CampaignEvent> {
    let kind = EventKind::from_topic(&topic_symbol(raw.topic.first()?)?);

    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let campaign_id = raw.topic.get(1).and_then(|t| topic_u64(t));
    let milestone_index = if kind.is_milestone_scoped() {
        field_i64(&raw.value, "milestone_index")
    } else {
        None
    };
    let (actor, amount) = decode_data(&raw.value, kind);

    Some(CampaignEvent {
        event_type: kind.as_str().to_string(),
        campaign_id,
        milestone_index,
        actor,
        amount,
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.as_deref().map(normalize_tx_hash),
    })
}

/// Pick the actor and amount out of the event's data struct.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::CampaignCreated => (
            extract_field(value, &["creator"]),
            extract_field(value, &["goal_settlement"]),
        ),
        EventKind::DonationReceived => (
            extract_field(value, &["donor"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::MilestoneProposed => (None, None),
        EventKind::VoteCast => (extract_field(value, &["voter"]), None),
        EventKind::MilestoneReleased => (
            extract_field(value, &["recipient"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::RefundIssued => (
            extract_field(value, &["donor"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn field_i64(value: &Value, key: &str) -> Option<i64> {
    match value.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// The symbol carried by a topic entry.
fn topic_symbol(raw: &str) -> Option<String> {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        return v.get("value").and_then(Value::as_str).map(String::from);
    }
    if let Some(symbol) = xdr_symbol(raw) {
        return Some(symbol);
    }
    // Plain symbol text.
    Some(raw.to_string())
}

/// The campaign id carried by a topic entry.
fn topic_u64(raw: &str) -> Option<String> {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        let inner = v.get("value")?;
        return inner
            .as_u64()
            .map(|n| n.to_string())
            .or_else(|| inner.as_str().map(String::from));
    }
    xdr_u64(raw).map(|n| n.to_string())
}

fn xdr_symbol(raw: &str) -> Option<String> {
    let bytes = STANDARD.decode(raw).ok()?;
    if read_u32(&bytes, 0)? != SCV_SYMBOL {
        return None;
    }
    let len = read_u32(&bytes, 4)? as usize;
    let body = bytes.get(8..8 + len)?;
    String::from_utf8(body.to_vec()).ok()
}

fn xdr_u64(raw: &str) -> Option<u64> {
    let bytes = STANDARD.decode(raw).ok()?;
    if read_u32(&bytes, 0)? != SCV_U64 {
        return None;
    }
    let body: [u8; 8] = bytes.get(4..12)?.try_into().ok()?;
    Some(u64::from_be_bytes(body))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let word: [u8; 4] = bytes.get(at..at + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(word))
}

/// Lower-case hex for well-formed 32-byte hashes; anything else as given.
fn normalize_tx_hash(raw: &str) -> String {
    match hex::decode(raw) {
        Ok(bytes) if bytes.len() == 32 => hex::encode(bytes),
        _ => raw.to_string(),
    }
}

/// Parse an RFC 3339 timestamp into Unix seconds.
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
