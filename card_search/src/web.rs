//! Web API for card search
//!
//! Exposes the aggregator to UI code over HTTP.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tcg_common::CardCandidate;

use crate::aggregator::{Aggregator, SearchOptions};

/// Shared application state
#[derive(Clone)]
struct AppState {
    aggregator: Arc<Aggregator>,
}

/// Search query parameters
#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    allow_expired: bool,
    #[serde(default = "default_use_cache")]
    use_cache: bool,
}

fn default_use_cache() -> bool {
    true
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// GET /api/health
async fn health_handler() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse {
        success: true,
        data: Some("ok"),
        error: None,
    })
}

/// GET /api/search?q={query}&limit={limit}&allow_expired={bool}&use_cache={bool}
async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<ApiResponse<Vec<CardCandidate>>>) {
    if params.q.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse {
                success: false,
                data: None,
                error: Some("Query parameter 'q' must not be empty".to_string()),
            }),
        );
    }

    let options = SearchOptions {
        use_cache: params.use_cache,
        allow_expired: params.allow_expired,
        max_results: params.limit,
    };
    let results = state.aggregator.search(&params.q, options).await;

    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(results),
            error: None,
        }),
    )
}

/// Build the web server router
pub fn create_router(aggregator: Arc<Aggregator>) -> Router {
    let state = AppState { aggregator };

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/search", get(search_handler))
        .with_state(state)
}

/// Start the web server
///
/// Binds to 0.0.0.0 (all interfaces) to work with Docker port mapping.
pub async fn serve(aggregator: Arc<Aggregator>, port: u16) -> std::io::Result<()> {
    let app = create_router(aggregator);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Search API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
