//! Authentication Endpoints
//! Mission: Signup, login, and password updates behind one error shape
//!
//! Login failures for unknown email and wrong password are byte-identical
//! on the wire; nothing here lets a caller enumerate accounts.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{error::ApiError, AppState};
use crate::auth::middleware::AuthSession;
use crate::auth::password::{hash_password, verify_password};
use crate::models::{Role, User};
use crate::validation::{
    validate_address, validate_email, validate_login_password, validate_name, validate_password,
};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public user summary returned next to a fresh token
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl UserSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// POST /api/auth/signup - public; role is always USER
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_address(&payload.address)?;
    validate_password(&payload.password)?;

    let password_hash = hash_password(&payload.password)?;

    // The unique email index arbitrates duplicates, not a prior read
    let user = state
        .db
        .create_user(
            &payload.name,
            &payload.email,
            &payload.address,
            &password_hash,
            Role::User,
        )?
        .ok_or(ApiError::Conflict("Email already exists"))?;

    let token = state.jwt.generate_token(user.id, user.role)?;

    info!(user_id = %user.id, "✅ Signup: {}", user.email);

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": UserSummary::from_user(&user),
        }
    })))
}

/// POST /api/auth/login - public
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_email(&payload.email)?;
    validate_login_password(&payload.password)?;

    let user = match state.db.get_user_by_email(&payload.email)? {
        Some(user) => user,
        None => {
            warn!("❌ Login failed for {}", payload.email);
            return Err(ApiError::Unauthorized("Invalid credentials"));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!("❌ Login failed for {}", payload.email);
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let token = state.jwt.generate_token(user.id, user.role)?;

    info!(user_id = %user.id, role = user.role.as_str(), "🔐 Login: {}", user.email);

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": UserSummary::from_user(&user),
        }
    })))
}

/// POST /api/auth/update-password - any authenticated role.
///
/// Replaces the stored hash only; previously issued tokens stay valid until
/// natural expiry.
pub async fn update_password(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_password(&payload.new_password)?;

    let user = state
        .db
        .get_user_by_id(&session.user_id)?
        .ok_or(ApiError::NotFound("User not found"))?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("Current password is incorrect"));
    }

    let new_hash = hash_password(&payload.new_password)?;
    state.db.update_password_hash(&user.id, &new_hash)?;

    info!(user_id = %user.id, "🔑 Password updated");

    Ok(Json(json!({
        "success": true,
        "message": "Password updated successfully",
    })))
}
