//! HTTP API module - REST endpoints
//!
//! Thin marshalling layer: JSON in, JSON out. All validation and game
//! logic lives in the dice and encounter modules; handlers only map their
//! error kinds onto client-error responses.

mod dice;
mod encounter;

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::bestiary::Bestiary;
use crate::dice::Roller;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub roller: Arc<Roller>,
    pub bestiary: Arc<Bestiary>,
}

/// Error payload returned for validation failures
///
/// `kind` is a stable discriminator so callers can tell bad syntax from a
/// value that is merely out of policy.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub error: String,
}

/// Build the API router
pub fn router(roller: Arc<Roller>, bestiary: Arc<Bestiary>) -> Router {
    let state = AppState { roller, bestiary };

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(dice::router())
        .merge(encounter::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "tabletopd",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        creatures: state.bestiary.len(),
        rolls_recorded: state.roller.history_len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    creatures: usize,
    rolls_recorded: usize,
}
