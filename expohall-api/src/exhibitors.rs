use axum::{
    extract::State, http::StatusCode, middleware::from_fn_with_state, routing::post, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{from_mutate, from_workflow, AppError};
use crate::middleware::auth::require_organizer;
use crate::response::Envelope;
use crate::state::AppState;
use expohall_catalog::expo::{BoothRequest, ExhibitorProfile};
use expohall_catalog::repository::mutate;
use expohall_core::identity::ExhibitorId;
use expohall_registration::workflow::{self, ApplicationDraft};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub expo_id: Uuid,
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub products_services: String,
    pub documents: String,
    pub booth_number: u32,
    pub exhibitor_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload {
    pub expo_id: Uuid,
    /// Id of the pending exhibitor application being decided on.
    pub request_id: Uuid,
    /// Rejection only: also drop the linked pending booth request,
    /// returning its booth to the free pool.
    #[serde(default)]
    pub cancel_booth_request: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub profile: ExhibitorProfile,
    pub booth_request: BoothRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResponse {
    pub profile: ExhibitorProfile,
    pub assigned_booth: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionResponse {
    pub profile: ExhibitorProfile,
    pub cancelled_request: Option<BoothRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApplications {
    pub expo_id: Uuid,
    pub title: String,
    pub requests: Vec<ExhibitorProfile>,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(state: AppState) -> Router<AppState> {
    let guarded = Router::new()
        .route("/api/expo/exhibitor-request/approve", post(approve))
        .route("/api/expo/exhibitor-request/reject", post(reject))
        .route_layer(from_fn_with_state(state, require_organizer));

    Router::new()
        .route(
            "/api/expo/exhibitor-request",
            post(apply).get(list_pending),
        )
        .merge(guarded)
}

// ============================================================================
// Handlers
// ============================================================================

/// One call records the business profile and its linked booth request;
/// both land or neither does.
async fn apply(
    State(state): State<AppState>,
    Json(payload): Json<ApplicationPayload>,
) -> Result<(StatusCode, Json<Envelope<ApplicationResponse>>), AppError> {
    let exhibitor = ExhibitorId::parse(&payload.exhibitor_id)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let draft = ApplicationDraft {
        name: payload.name,
        email: payload.email,
        company_name: payload.company_name,
        products_services: payload.products_services,
        documents: payload.documents,
    };

    let (profile, booth_request) = mutate(state.expos.as_ref(), payload.expo_id, |expo| {
        workflow::submit_application(expo, draft.clone(), payload.booth_number, exhibitor)
    })
    .await
    .map_err(|e| from_mutate(e, from_workflow))?;

    info!(
        "Exhibitor application {} submitted on expo {} for booth {}",
        profile.id, payload.expo_id, booth_request.booth_number
    );
    Ok((
        StatusCode::CREATED,
        Envelope::ok(
            "Exhibitor application and booth request submitted successfully",
            ApplicationResponse {
                profile,
                booth_request,
            },
        ),
    ))
}

/// Pending applications across every expo, for the organizer console.
async fn list_pending(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<PendingApplications>>>, AppError> {
    let expos = state.expos.list().await?;
    let pending: Vec<PendingApplications> = expos
        .into_iter()
        .filter(|expo| !expo.exhibitor_requests.is_empty())
        .map(|expo| PendingApplications {
            expo_id: expo.id,
            title: expo.title,
            requests: expo.exhibitor_requests,
        })
        .collect();
    Ok(Envelope::ok(
        "Exhibitor requests fetched successfully",
        pending,
    ))
}

async fn approve(
    State(state): State<AppState>,
    Json(payload): Json<DecisionPayload>,
) -> Result<Json<Envelope<ApprovalResponse>>, AppError> {
    let approval = mutate(state.expos.as_ref(), payload.expo_id, |expo| {
        workflow::approve_exhibitor(expo, payload.request_id)
    })
    .await
    .map_err(|e| from_mutate(e, from_workflow))?;

    let message = match approval.assigned_booth {
        Some(n) => format!("Exhibitor approved and booth {} assigned", n),
        None => "Exhibitor approved".to_string(),
    };
    info!(
        "Exhibitor application {} approved on expo {}",
        payload.request_id, payload.expo_id
    );
    Ok(Envelope::ok(
        message,
        ApprovalResponse {
            profile: approval.profile,
            assigned_booth: approval.assigned_booth,
        },
    ))
}

async fn reject(
    State(state): State<AppState>,
    Json(payload): Json<DecisionPayload>,
) -> Result<Json<Envelope<RejectionResponse>>, AppError> {
    let cancel = payload.cancel_booth_request;
    let (profile, cancelled_request) = mutate(state.expos.as_ref(), payload.expo_id, |expo| {
        let profile = workflow::reject_exhibitor(expo, payload.request_id)?;
        let cancelled = if cancel {
            workflow::cancel_booth_request(expo, payload.request_id)
        } else {
            None
        };
        Ok::<_, workflow::WorkflowError>((profile, cancelled))
    })
    .await
    .map_err(|e| from_mutate(e, from_workflow))?;

    info!(
        "Exhibitor application {} rejected on expo {} (booth request cancelled: {})",
        payload.request_id,
        payload.expo_id,
        cancelled_request.is_some()
    );
    Ok(Envelope::ok(
        "Exhibitor request rejected",
        RejectionResponse {
            profile,
            cancelled_request,
        },
    ))
}
