//! Axum REST API handlers.
//!
//! All routes are read-only views over the indexed audit log.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db;
use crate::errors::Result;
use crate::events::{EventRecord, ProposalTally};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the application router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/projects/:id/events", get(get_project_events))
        .route(
            "/projects/:id/proposals/:proposal_id/events",
            get(get_proposal_events),
        )
        .route(
            "/projects/:id/proposals/:proposal_id/tally",
            get(get_proposal_tally),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
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
///
/// Returns all indexed events across all projects.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Result<Json<AllEventsResponse>> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /projects/:id/events`
///
/// Returns all indexed events for the given project, proposal events included.
pub async fn get_project_events(
    State(state): State<Arc<ApiState>>,
    Path(project_id): Path<String>,
) -> Result<Json<EventsResponse>> {
    let events = db::get_events_for_project(&state.pool, &project_id).await?;
    Ok(Json(EventsResponse {
        project_id,
        proposal_id: None,
        count: events.len(),
        events,
    }))
}

/// `GET /projects/:id/proposals/:proposal_id/events`
pub async fn get_proposal_events(
    State(state): State<Arc<ApiState>>,
    Path((project_id, proposal_id)): Path<(String, String)>,
) -> Result<Json<EventsResponse>> {
    let events = db::get_events_for_proposal(&state.pool, &project_id, &proposal_id).await?;
    Ok(Json(EventsResponse {
        project_id,
        proposal_id: Some(proposal_id),
        count: events.len(),
        events,
    }))
}

/// `GET /projects/:id/proposals/:proposal_id/tally`
///
/// Vote totals rebuilt from `vote_cast` events; `404` if the proposal has
/// not been indexed.
pub async fn get_proposal_tally(
    State(state): State<Arc<ApiState>>,
    Path((project_id, proposal_id)): Path<(String, String)>,
) -> Result<Json<ProposalTally>> {
    let tally = db::get_proposal_tally(&state.pool, &project_id, &proposal_id).await?;
    Ok(Json(tally))
}
