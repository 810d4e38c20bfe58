use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::response::Envelope;
use crate::state::AppState;
use expohall_core::users::{Role, User, UserUpdate};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Answer to the account recovery question, hashed at rest.
    pub security_answer: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordPayload {
    pub email: String,
    pub security_answer: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: Option<String>,
}

/// Public view of an account; hashes never leave the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/signup", post(signup))
        .route("/api/user/login", post(login))
        .route("/api/user/forgot-password", post(forgot_password))
        .route("/api/user", get(list_users))
        .route("/api/user/{id}", get(get_user).put(update_user).delete(delete_user))
}

// ============================================================================
// Handlers
// ============================================================================

fn require_field(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(())
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<Envelope<UserResponse>>), AppError> {
    require_field("name", &payload.name)?;
    require_field("email", &payload.email)?;
    require_field("password", &payload.password)?;
    require_field("securityAnswer", &payload.security_answer)?;

    let user = User {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        password_hash: hash(&payload.password, DEFAULT_COST)?,
        role: payload.role,
        security_answer_hash: hash(&payload.security_answer, DEFAULT_COST)?,
        created_at: Utc::now(),
    };

    if !state.users.insert(&user).await? {
        return Err(AppError::ConflictError(
            "User already exists with this email address".to_string(),
        ));
    }

    info!("User signed up: {} ({})", user.id, user.role.as_str());
    Ok((
        StatusCode::CREATED,
        Envelope::ok("User created successfully", user.into()),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Envelope<LoginResponse>>, AppError> {
    let user = state
        .users
        .fetch_by_email(&payload.email)
        .await?
        .ok_or_else(|| {
            AppError::AuthenticationError(
                "Account does not exist, please sign up first".to_string(),
            )
        })?;

    if !verify(&payload.password, &user.password_hash)? {
        return Err(AppError::AuthenticationError(
            "Incorrect password".to_string(),
        ));
    }

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    info!("User logged in: {}", user.id);
    Ok(Envelope::ok(
        "Logged in successfully",
        LoginResponse {
            token,
            user: user.into(),
        },
    ))
}

/// Account recovery without email delivery: the stored security answer
/// is the proof of ownership.
async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<Envelope<()>>, AppError> {
    require_field("newPassword", &payload.new_password)?;

    let user = state
        .users
        .fetch_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;

    if !verify(&payload.security_answer, &user.security_answer_hash)? {
        return Err(AppError::AuthenticationError(
            "Security answer is incorrect".to_string(),
        ));
    }

    let new_hash = hash(&payload.new_password, DEFAULT_COST)?;
    state.users.set_password(user.id, &new_hash).await?;
    info!("Password reset for user {}", user.id);
    Ok(Envelope::message("Password has been reset successfully"))
}

async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<UserResponse>>>, AppError> {
    let users = state.users.list().await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Envelope::ok("Users fetched successfully", users))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<UserResponse>>, AppError> {
    let user = state
        .users
        .fetch(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;
    Ok(Envelope::ok("User fetched successfully", user.into()))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<Envelope<UserResponse>>, AppError> {
    require_field("name", &payload.name)?;
    require_field("email", &payload.email)?;

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            require_field("password", password)?;
            Some(hash(password, DEFAULT_COST)?)
        }
        None => None,
    };

    let updated = state
        .users
        .update(
            id,
            UserUpdate {
                name: payload.name,
                email: payload.email,
                role: payload.role,
                password_hash,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;

    Ok(Envelope::ok("User updated successfully", updated.into()))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, AppError> {
    if !state.users.delete(id).await? {
        return Err(AppError::NotFoundError("User not found".to_string()));
    }
    info!("User deleted: {}", id);
    Ok(Envelope::message("User deleted successfully"))
}
