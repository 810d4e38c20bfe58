use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{from_mutate, from_roster, AppError};
use crate::response::Envelope;
use crate::state::AppState;
use expohall_catalog::expo::Attendee;
use expohall_catalog::repository::mutate;
use expohall_registration::roster::{self, Registration};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub expo_id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub attendee_count: usize,
    pub attendees: Vec<Attendee>,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/expo/attendee-register", post(register))
}

// ============================================================================
// Handlers
// ============================================================================

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Response, AppError> {
    let (outcome, attendees) = mutate(state.expos.as_ref(), payload.expo_id, |expo| {
        let outcome = roster::register_attendee(expo, &payload.name, &payload.email)?;
        Ok::<_, roster::RosterError>((outcome, expo.attendees.clone()))
    })
    .await
    .map_err(|e| from_mutate(e, from_roster))?;

    match outcome {
        Registration::Added(count) => {
            info!("Attendee registered on expo {} ({} total)", payload.expo_id, count);
            Ok(Envelope::ok(
                "Successfully registered for the expo",
                RosterResponse {
                    attendee_count: count,
                    attendees,
                },
            )
            .into_response())
        }
        // Well-formed request, negative answer: 200 with status=false,
        // and the roster is left exactly as it was.
        Registration::AlreadyRegistered => {
            Ok(Envelope::soft("Attendee already registered for this expo").into_response())
        }
    }
}
