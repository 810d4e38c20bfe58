use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{from_expo, from_mutate, AppError};
use crate::middleware::auth::require_organizer;
use crate::response::Envelope;
use crate::state::AppState;
use expohall_catalog::expo::{Expo, ExpoDraft, ScheduleDraft};
use expohall_catalog::repository::mutate;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpoPayload {
    pub title: String,
    pub image_url: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub booth_capacity: u32,
}

impl ExpoPayload {
    fn into_draft(self) -> ExpoDraft {
        ExpoDraft {
            title: self.title,
            image_url: self.image_url,
            date: self.date,
            location: self.location,
            description: self.description,
            booth_capacity: self.booth_capacity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SchedulePayload {
    pub title: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub speaker: String,
    pub location: String,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(state: AppState) -> Router<AppState> {
    let guarded = Router::new()
        .route("/api/expo", axum::routing::post(create_expo))
        .route("/api/expo/{id}", put(update_expo).delete(delete_expo))
        .route("/api/expo/{id}/schedule", put(schedule_expo))
        .route_layer(from_fn_with_state(state, require_organizer));

    Router::new()
        .route("/api/expo", get(list_expos))
        .route("/api/expo/{id}", get(get_expo))
        .merge(guarded)
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_expo(
    State(state): State<AppState>,
    Json(payload): Json<ExpoPayload>,
) -> Result<(StatusCode, Json<Envelope<Expo>>), AppError> {
    let expo = Expo::new(payload.into_draft()).map_err(from_expo)?;
    state.expos.insert(&expo).await?;
    info!("Expo created: {} ({})", expo.title, expo.id);
    Ok((
        StatusCode::CREATED,
        Envelope::ok("Expo created successfully!", expo),
    ))
}

async fn list_expos(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Expo>>>, AppError> {
    let expos = state.expos.list().await?;
    Ok(Envelope::ok("Expos fetched successfully", expos))
}

async fn get_expo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Expo>>, AppError> {
    let stored = state.expos.fetch(id).await?;
    match stored {
        Some(versioned) => Ok(Envelope::ok("Expo fetched successfully", versioned.expo)),
        None => Err(AppError::NotFoundError("Expo not found".to_string())),
    }
}

async fn update_expo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpoPayload>,
) -> Result<Json<Envelope<Expo>>, AppError> {
    let draft = payload.into_draft();
    let expo = mutate(state.expos.as_ref(), id, |expo| {
        expo.apply_update(&draft)?;
        Ok::<_, expohall_catalog::expo::ExpoError>(expo.clone())
    })
    .await
    .map_err(|e| from_mutate(e, from_expo))?;
    Ok(Envelope::ok("Expo updated successfully", expo))
}

async fn schedule_expo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SchedulePayload>,
) -> Result<Json<Envelope<Expo>>, AppError> {
    let draft = ScheduleDraft {
        title: payload.title,
        date: payload.date,
        time: payload.time,
        speaker: payload.speaker,
        location: payload.location,
    };
    let expo = mutate(state.expos.as_ref(), id, |expo| {
        expo.set_schedule(&draft)?;
        Ok::<_, expohall_catalog::expo::ExpoError>(expo.clone())
    })
    .await
    .map_err(|e| from_mutate(e, from_expo))?;
    Ok(Envelope::ok("Expo schedule updated successfully", expo))
}

async fn delete_expo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, AppError> {
    if !state.expos.delete(id).await? {
        return Err(AppError::NotFoundError("Expo not found".to_string()));
    }
    info!("Expo deleted: {}", id);
    Ok(Envelope::message("Expo deleted successfully"))
}
