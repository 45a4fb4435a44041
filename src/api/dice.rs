//! Dice API - rolls, averages, and roll history

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{AppState, ErrorResponse};
use crate::dice::{DiceError, RollMode, RollOutcome};

/// Request to roll a single expression
#[derive(Debug, Deserialize)]
struct RollRequest {
    /// Dice expression, e.g. "2d6+3"
    expression: String,
    /// normal, advantage, or disadvantage (advantage/disadvantage: 1d20 only)
    #[serde(default)]
    mode: RollMode,
}

/// Request to roll the same expression several times
#[derive(Debug, Deserialize)]
struct RollMultipleRequest {
    expression: String,
    times: usize,
}

/// A batch of roll outcomes
#[derive(Debug, Serialize)]
struct RollsResponse {
    rolls: Vec<RollOutcome>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct AverageResponse {
    expression: String,
    average: f64,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    limit: usize,
}

fn default_history_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
struct ClearedResponse {
    message: &'static str,
}

/// Build the dice router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dice/roll", post(roll))
        .route("/dice/roll/multiple", post(roll_multiple))
        .route("/dice/average/{expression}", get(average))
        .route("/dice/history", get(history).delete(clear_history))
}

fn dice_error(e: DiceError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            kind: e.kind(),
            error: e.to_string(),
        }),
    )
}

/// POST /dice/roll
async fn roll(
    State(state): State<AppState>,
    Json(request): Json<RollRequest>,
) -> impl IntoResponse {
    match state.roller.roll(&request.expression, request.mode) {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => dice_error(e).into_response(),
    }
}

/// POST /dice/roll/multiple
async fn roll_multiple(
    State(state): State<AppState>,
    Json(request): Json<RollMultipleRequest>,
) -> impl IntoResponse {
    match state.roller.roll_multiple(&request.expression, request.times) {
        Ok(rolls) => Json(RollsResponse {
            count: rolls.len(),
            rolls,
        })
        .into_response(),
        Err(e) => dice_error(e).into_response(),
    }
}

/// GET /dice/average/{expression}
async fn average(
    State(state): State<AppState>,
    Path(expression): Path<String>,
) -> impl IntoResponse {
    match state.roller.average(&expression) {
        Ok(average) => Json(AverageResponse {
            expression,
            average,
        })
        .into_response(),
        Err(e) => dice_error(e).into_response(),
    }
}

/// GET /dice/history?limit=N
async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let rolls = state.roller.history(query.limit);
    Json(RollsResponse {
        count: rolls.len(),
        rolls,
    })
}

/// DELETE /dice/history
async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    state.roller.clear_history();
    Json(ClearedResponse {
        message: "Roll history cleared",
    })
}
