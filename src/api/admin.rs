//! Admin Endpoints
//! Mission: Platform statistics plus user and store management

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::api::{error::ApiError, AppState};
use crate::auth::api::UserSummary;
use crate::auth::password::hash_password;
use crate::models::{Role, User};
use crate::validation::{
    validate_address, validate_email, validate_name, validate_password, validate_role,
    validate_store_name,
};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name: String,
    pub address: String,
    pub owner_email_id: String,
}

/// User listing row; no hash, no timestamps
#[derive(Debug, Serialize)]
pub struct UserListEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
}

impl From<User> for UserListEntry {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            role: user.role,
        }
    }
}

/// GET /api/admin/dashboard - total users, stores, and ratings
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let counts = state.db.dashboard_counts()?;

    Ok(Json(json!({ "success": true, "data": counts })))
}

/// GET /api/admin/users
pub async fn get_all_users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users: Vec<UserListEntry> = state
        .db
        .list_users()?
        .into_iter()
        .map(UserListEntry::from)
        .collect();

    Ok(Json(json!({ "success": true, "data": { "users": users } })))
}

/// POST /api/admin/users - unlike signup, the role is chosen explicitly
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_address(&payload.address)?;
    validate_password(&payload.password)?;
    let role = validate_role(&payload.role)?;

    let password_hash = hash_password(&payload.password)?;

    let user = state
        .db
        .create_user(
            &payload.name,
            &payload.email,
            &payload.address,
            &password_hash,
            role,
        )?
        .ok_or(ApiError::Conflict("Email already exists"))?;

    info!(user_id = %user.id, role = user.role.as_str(), "✅ Admin created user {}", user.email);

    Ok(Json(json!({
        "success": true,
        "data": { "user": UserSummary::from_user(&user) },
    })))
}

/// GET /api/admin/stores - every store with its average rating
pub async fn get_all_stores(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let stores = state.db.list_stores_with_average()?;

    Ok(Json(json!({ "success": true, "data": { "stores": stores } })))
}

/// POST /api/admin/stores - create a store on behalf of an owner.
///
/// Three gates, in order: the email must resolve to a user, that user must
/// be a STORE_OWNER, and the owner must not already have a store. The last
/// gate is the unique owner index, not a read.
pub async fn create_store(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoreRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_store_name(&payload.name)?;
    validate_address(&payload.address)?;
    validate_email(&payload.owner_email_id)?;

    let owner = state
        .db
        .get_user_by_email(&payload.owner_email_id)?
        .ok_or(ApiError::NotFound("Owner not found"))?;

    if owner.role != Role::StoreOwner {
        return Err(ApiError::BadRequest("Email is not a store owner"));
    }

    let store = state
        .db
        .create_store(&payload.name, &payload.address, owner.id)?
        .ok_or(ApiError::BadRequest("Owner already has a store"))?;

    info!(store_id = %store.id, owner_id = %owner.id, "🏪 Admin created store {}", store.name);

    Ok(Json(json!({ "success": true, "data": { "store": store } })))
}
