use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::response::Envelope;
use crate::state::AppState;
use expohall_core::feedback::{Feedback, FeedbackWrite};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub expo_id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/feedback", post(submit))
        .route("/api/feedback/{expo_id}", get(list_for_expo))
}

// ============================================================================
// Handlers
// ============================================================================

async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<FeedbackPayload>,
) -> Result<(StatusCode, Json<Envelope<Feedback>>), AppError> {
    for (field, value) in [
        ("name", &payload.name),
        ("email", &payload.email),
        ("message", &payload.message),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::ValidationError(format!("{} is required", field)));
        }
    }

    let (write, entry) = state
        .feedback
        .upsert(payload.expo_id, &payload.name, &payload.email, &payload.message)
        .await?;

    let (status, message) = match write {
        FeedbackWrite::Created => (StatusCode::CREATED, "Feedback submitted successfully"),
        FeedbackWrite::Updated => (StatusCode::OK, "Feedback updated successfully"),
    };
    Ok((status, Envelope::ok(message, entry)))
}

async fn list_for_expo(
    State(state): State<AppState>,
    Path(expo_id): Path<Uuid>,
) -> Result<Json<Envelope<Vec<Feedback>>>, AppError> {
    let entries = state.feedback.list_for_expo(expo_id).await?;
    Ok(Envelope::ok("Feedback fetched successfully", entries))
}
