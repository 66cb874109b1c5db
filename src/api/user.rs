//! User Endpoints
//! Mission: Store browsing with per-user ratings, and the rating upsert

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::api::{error::ApiError, AppState};
use crate::auth::middleware::AuthSession;
use crate::validation::{validate_rating, ValidationError};

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: i64,
}

/// GET /api/user/stores - every store with its average and the caller's own
/// rating (null when they have not rated it)
pub async fn get_stores(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Value>, ApiError> {
    let stores = state.db.list_stores_for_user(&session.user_id)?;

    Ok(Json(json!({ "success": true, "data": { "stores": stores } })))
}

/// PUT /api/user/ratings/:storeId - upsert the caller's rating.
///
/// The value is range-checked before any storage access; the write itself is
/// one conditional statement, so repeated or concurrent submissions always
/// converge to a single row holding the latest value.
pub async fn update_rating(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(store_id): Path<String>,
    Json(payload): Json<RatingRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_rating(payload.rating)?;

    let store_id = Uuid::parse_str(&store_id).map_err(|_| ValidationError {
        field: "storeId",
        message: "Invalid UUID",
    })?;

    if !state.db.store_exists(&store_id)? {
        return Err(ApiError::NotFound("Store not found"));
    }

    let rating = state
        .db
        .upsert_rating(store_id, session.user_id, payload.rating)?;

    info!(store_id = %store_id, user_id = %session.user_id, value = rating.rating, "⭐ Rating saved");

    Ok(Json(json!({ "success": true, "data": rating })))
}
