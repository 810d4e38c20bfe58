use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use expohall_catalog::booths::LedgerError;
use expohall_catalog::expo::ExpoError;
use expohall_catalog::repository::MutateError;
use expohall_registration::roster::RosterError;
use expohall_registration::workflow::WorkflowError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": false,
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}

// Domain errors carry their HTTP class here, not in the domain crates.

pub fn from_expo(err: ExpoError) -> AppError {
    match err {
        ExpoError::MissingField(_) | ExpoError::ZeroCapacity => {
            AppError::ValidationError(err.to_string())
        }
        ExpoError::CapacityLocked | ExpoError::CapacityBelowRequest(_) => {
            AppError::ConflictError(err.to_string())
        }
    }
}

pub fn from_workflow(err: WorkflowError) -> AppError {
    match err {
        WorkflowError::Ledger(LedgerError::OutOfRange { .. }) => {
            AppError::ValidationError(err.to_string())
        }
        WorkflowError::Ledger(LedgerError::AlreadyAssigned(_)) => {
            AppError::ConflictError(err.to_string())
        }
        WorkflowError::AlreadyRequested(_) => AppError::ConflictError(err.to_string()),
        WorkflowError::MissingField(_) => AppError::ValidationError(err.to_string()),
        WorkflowError::RequestNotFound => AppError::NotFoundError(err.to_string()),
    }
}

pub fn from_roster(err: RosterError) -> AppError {
    match err {
        RosterError::MissingField(_) => AppError::ValidationError(err.to_string()),
    }
}

/// Maps commit failures, delegating domain errors to the supplied
/// classifier.
pub fn from_mutate<E>(err: MutateError<E>, map: impl FnOnce(E) -> AppError) -> AppError {
    match err {
        MutateError::NotFound => AppError::NotFoundError("Expo not found".to_string()),
        MutateError::Contention(_) => AppError::ConflictError(
            "Expo is receiving concurrent updates, please retry".to_string(),
        ),
        MutateError::Domain(e) => map(e),
        MutateError::Store(e) => AppError::InternalServerError(e.to_string()),
    }
}
