use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{from_mutate, from_workflow, AppError};
use crate::response::Envelope;
use crate::state::AppState;
use expohall_catalog::booths;
use expohall_catalog::expo::BoothRequest;
use expohall_catalog::repository::mutate;
use expohall_core::identity::ExhibitorId;
use expohall_registration::workflow;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoothRequestPayload {
    pub booth_number: u32,
    /// Exhibitor account id as issued at signup.
    pub exhibitor_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableBoothsResponse {
    pub booth_capacity: u32,
    pub available_booths: Vec<u32>,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/expo/{id}/available-booths", get(available_booths))
        .route("/api/expo/{id}/booth-request", post(request_booth))
}

// ============================================================================
// Handlers
// ============================================================================

async fn available_booths(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<AvailableBoothsResponse>>, AppError> {
    let stored = state.expos.fetch(id).await?;
    let Some(versioned) = stored else {
        return Err(AppError::NotFoundError("Expo not found".to_string()));
    };
    let response = AvailableBoothsResponse {
        booth_capacity: versioned.expo.booth_capacity,
        available_booths: booths::available_booths(&versioned.expo),
    };
    Ok(Envelope::ok("Available booths fetched successfully", response))
}

async fn request_booth(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BoothRequestPayload>,
) -> Result<(StatusCode, Json<Envelope<BoothRequest>>), AppError> {
    let exhibitor = ExhibitorId::parse(&payload.exhibitor_id)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let request = mutate(state.expos.as_ref(), id, |expo| {
        workflow::submit_booth_request(expo, payload.booth_number, exhibitor)
    })
    .await
    .map_err(|e| from_mutate(e, from_workflow))?;

    info!(
        "Booth {} requested on expo {} by {}",
        request.booth_number, id, exhibitor
    );
    Ok((
        StatusCode::CREATED,
        Envelope::ok("Booth request submitted successfully", request),
    ))
}
