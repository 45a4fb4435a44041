//! Encounter API - generation and bestiary lookups

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{AppState, ErrorResponse};
use crate::bestiary::Creature;
use crate::encounter::{self, Difficulty, EncounterError, GeneratedEncounter};

/// Request to generate an encounter
#[derive(Debug, Deserialize)]
struct EncounterRequest {
    /// Average party level, 1-20
    party_level: u32,
    /// Number of characters, 1-10
    #[serde(default = "default_party_size")]
    party_size: u32,
    /// trivial, low, moderate, severe, or extreme
    #[serde(default = "default_difficulty")]
    difficulty: String,
}

fn default_party_size() -> u32 {
    4
}

fn default_difficulty() -> String {
    "moderate".to_string()
}

/// XP-cost filter for bestiary listings
#[derive(Debug, Deserialize)]
struct BestiaryQuery {
    min_xp: Option<u32>,
    max_xp: Option<u32>,
}

#[derive(Debug, Serialize)]
struct CreaturesResponse {
    creatures: Vec<Creature>,
    count: usize,
}

/// Build the encounter router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/encounter/generate", post(generate_encounter))
        .route("/bestiary", get(list_creatures))
        .route("/bestiary/{name}", get(get_creature))
}

/// POST /encounter/generate
async fn generate_encounter(
    State(state): State<AppState>,
    Json(request): Json<EncounterRequest>,
) -> impl IntoResponse {
    match process_encounter_request(request, &state) {
        Ok(encounter) => Json(encounter).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                kind: e.kind(),
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Validate the request and run one generation
fn process_encounter_request(
    request: EncounterRequest,
    state: &AppState,
) -> Result<GeneratedEncounter, EncounterError> {
    let difficulty: Difficulty = request.difficulty.parse()?;
    let budget = encounter::compute_budget(request.party_level, request.party_size, difficulty)?;
    encounter::generate(&budget, &state.bestiary, &mut rand::rng())
}

/// GET /bestiary?min_xp=N&max_xp=M
async fn list_creatures(
    State(state): State<AppState>,
    Query(query): Query<BestiaryQuery>,
) -> impl IntoResponse {
    let creatures: Vec<Creature> = state
        .bestiary
        .by_xp_range(query.min_xp.unwrap_or(0), query.max_xp.unwrap_or(u32::MAX))
        .into_iter()
        .cloned()
        .collect();
    Json(CreaturesResponse {
        count: creatures.len(),
        creatures,
    })
}

/// GET /bestiary/{name}
async fn get_creature(State(state): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    match state.bestiary.get(&name) {
        Some(creature) => Json(creature.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                kind: "creature_not_found",
                error: format!("creature {:?} is not in the bestiary", name),
            }),
        )
            .into_response(),
    }
}
