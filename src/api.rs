// src/api.rs
// Thin HTTP surface over the aggregation engine. Handlers are glue: strategy
// selection, degradation, and ranking all live in the aggregator.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::aggregator::Aggregator;
use crate::health::{self, SourceHealth};
use crate::sources::SourceRegistry;
use crate::topic::{AggregationRequest, Topic};

#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
    registry: Arc<SourceRegistry>,
}

impl AppState {
    pub fn new(aggregator: Arc<Aggregator>, registry: Arc<SourceRegistry>) -> Self {
        Self {
            aggregator,
            registry,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/trends", get(trends))
        .route("/api/health", get(source_health))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// `GET /api/trends?platform=..&search=..`
///
/// Never an error response: per-source failures degrade to fewer items or
/// fallback entries, and the worst case is an empty list.
async fn trends(
    State(state): State<AppState>,
    Query(req): Query<AggregationRequest>,
) -> Json<Vec<Topic>> {
    Json(state.aggregator.trending(&req).await)
}

/// `GET /api/health` lists configuration state per source, the only place a
/// caller can distinguish "source down" from "source returned nothing".
async fn source_health(State(state): State<AppState>) -> Json<Vec<SourceHealth>> {
    Json(health::check(&state.registry))
}
