//! Axum REST API over the indexed event log.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::{IndexerError, Result};
use crate::events::EventRecord;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/campaigns/:id/events", get(get_campaign_events))
        .route(
            "/campaigns/:id/milestones/:index/events",
            get(get_milestone_events),
        )
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_index: Option<u32>,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

impl EventsResponse {
    fn new(events: Vec<EventRecord>) -> Self {
        EventsResponse {
            campaign_id: None,
            milestone_index: None,
            count: events.len(),
            events,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Campaign ids are `u64` on chain; reject anything else before querying.
fn parse_campaign_id(raw: &str) -> Result<String> {
    raw.parse::<u64>()
        .map(|id| id.to_string())
        .map_err(|_| IndexerError::BadRequest(format!("invalid campaign id: {raw}")))
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Result<Json<EventsResponse>> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(EventsResponse::new(events)))
}

/// `GET /campaigns/:id/events`
pub async fn get_campaign_events(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<EventsResponse>> {
    let campaign_id = parse_campaign_id(&id)?;
    let events = db::get_events_for_campaign(&state.pool, &campaign_id).await?;
    Ok(Json(EventsResponse {
        campaign_id: Some(campaign_id),
        ..EventsResponse::new(events)
    }))
}

/// `GET /campaigns/:id/milestones/:index/events`
///
/// Proposal, votes and release of a single milestone.
pub async fn get_milestone_events(
    State(state): State<Arc<ApiState>>,
    Path((id, index)): Path<(String, u32)>,
) -> Result<Json<EventsResponse>> {
    let campaign_id = parse_campaign_id(&id)?;
    let events = db::get_events_for_milestone(&state.pool, &campaign_id, index as i64).await?;
    Ok(Json(EventsResponse {
        campaign_id: Some(campaign_id),
        milestone_index: Some(index),
        ..EventsResponse::new(events)
    }))
}
