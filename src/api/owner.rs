//! Store-Owner Endpoints
//! Mission: Self-service store creation and rating visibility for one store

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::api::{error::ApiError, AppState};
use crate::auth::middleware::AuthSession;
use crate::models::Rating;
use crate::validation::{validate_address, validate_store_name};

#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    pub name: String,
    pub address: String,
}

/// Rating as shown to the store owner: rater exposed as an id only
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRatingEntry {
    pub id: Uuid,
    pub rating: i64,
    pub user_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Rating> for StoreRatingEntry {
    fn from(r: Rating) -> Self {
        Self {
            id: r.id,
            rating: r.rating,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// POST /api/store - self-service creation for the authenticated owner
pub async fn create_store(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate_store_name(&payload.name)?;
    validate_address(&payload.address)?;

    let store = state
        .db
        .create_store(&payload.name, &payload.address, session.user_id)?
        .ok_or(ApiError::BadRequest("User already owns a store"))?;

    info!(store_id = %store.id, owner_id = %session.user_id, "🏪 Store created: {}", store.name);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": store })),
    ))
}

/// GET /api/store - own store with average rating and total count
pub async fn get_my_store(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Value>, ApiError> {
    let summary = state
        .db
        .get_owner_store_summary(&session.user_id)?
        .ok_or(ApiError::NotFound("Store not found"))?;

    Ok(Json(json!({ "success": true, "data": summary })))
}

/// GET /api/store/ratings - all ratings for the owner's store, lowest first
pub async fn get_my_store_ratings(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Value>, ApiError> {
    let store = state
        .db
        .get_store_by_owner(&session.user_id)?
        .ok_or(ApiError::NotFound("Store not found"))?;

    let ratings: Vec<StoreRatingEntry> = state
        .db
        .list_store_ratings(&store.id)?
        .into_iter()
        .map(StoreRatingEntry::from)
        .collect();

    Ok(Json(json!({ "success": true, "data": ratings })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtHandler;
    use crate::db::test_util::create_test_db;
    use crate::models::Role;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn test_state() -> (AppState, NamedTempFile) {
        let (db, temp) = create_test_db();
        let state = AppState {
            db: Arc::new(db),
            jwt: Arc::new(JwtHandler::new("test-secret".to_string())),
        };
        (state, temp)
    }

    fn owner_session(state: &AppState, email: &str) -> AuthSession {
        let owner = state
            .db
            .create_user("Owner Person", email, "1 Shop St", "hash", Role::StoreOwner)
            .unwrap()
            .unwrap();
        AuthSession {
            user_id: owner.id,
            role: Role::StoreOwner,
        }
    }

    fn store_payload() -> CreateStoreRequest {
        CreateStoreRequest {
            name: "Corner Shop".to_string(),
            address: "2 Market Sq".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_store_then_second_rejected() {
        let (state, _temp) = test_state();
        let session = owner_session(&state, "o@example.com");

        let (status, body) = create_store(
            State(state.clone()),
            Extension(session.clone()),
            Json(store_payload()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.0["data"]["name"], "Corner Shop");

        let err = create_store(State(state.clone()), Extension(session), Json(store_payload()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest("User already owns a store")));
        assert_eq!(state.db.dashboard_counts().unwrap().total_stores, 1);
    }

    #[tokio::test]
    async fn test_get_my_store_missing_is_not_found() {
        let (state, _temp) = test_state();
        let session = owner_session(&state, "o@example.com");

        let err = get_my_store(State(state.clone()), Extension(session.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Store not found")));

        let err = get_my_store_ratings(State(state), Extension(session))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Store not found")));
    }

    #[tokio::test]
    async fn test_ratings_listing_sorted_and_id_only() {
        let (state, _temp) = test_state();
        let session = owner_session(&state, "o@example.com");
        create_store(State(state.clone()), Extension(session.clone()), Json(store_payload()))
            .await
            .unwrap();

        let store = state.db.get_store_by_owner(&session.user_id).unwrap().unwrap();
        for (i, value) in [5_i64, 2].iter().enumerate() {
            let rater = state
                .db
                .create_user(
                    "Rater Person",
                    &format!("rater{i}@example.com"),
                    "9 Rate Rd",
                    "hash",
                    Role::User,
                )
                .unwrap()
                .unwrap();
            state.db.upsert_rating(store.id, rater.id, *value).unwrap();
        }

        let body = get_my_store_ratings(State(state.clone()), Extension(session.clone()))
            .await
            .unwrap()
            .0;
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        // Ascending by rating value
        assert_eq!(entries[0]["rating"], 2);
        assert_eq!(entries[1]["rating"], 5);
        // Rater identity is an id, nothing more
        assert!(entries[0].get("userId").is_some());
        assert!(entries[0].get("name").is_none());
        assert!(entries[0].get("email").is_none());

        let summary = get_my_store(State(state), Extension(session)).await.unwrap().0;
        assert_eq!(summary["data"]["averageRating"], 3.5);
        assert_eq!(summary["data"]["totalRatings"], 2);
    }
}
