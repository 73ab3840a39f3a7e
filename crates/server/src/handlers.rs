//! # Request Handlers

use crate::state::AppState;
use axum::{extract::State, Json};
use textcde::{EnrichmentRequest, EnrichmentResponse};
use tracing::info;

/// The root handler.
pub async fn root() -> &'static str {
    "textcde server is running."
}

/// The health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for the `/enrich` endpoint.
///
/// Always answers with a well-formed response: enrichment failures fall back to
/// the caller's original metadata instead of becoming HTTP errors.
pub async fn enrich_handler(
    State(app_state): State<AppState>,
    Json(request): Json<EnrichmentRequest>,
) -> Json<EnrichmentResponse> {
    info!(
        "Received event: {}",
        serde_json::to_string(&request).unwrap_or_default()
    );
    info!(
        "Region is: {}",
        app_state.config.region.as_deref().unwrap_or("unset")
    );

    let response = app_state.enricher.enrich(&request).await;
    Json(response)
}
