//! API Router
//! Mission: Wire role-gated route groups onto the shared state
//!
//! Each group declares its accepted role set once, as a route_layer; the
//! handlers themselves never re-check roles.

use axum::{
    extract::{Request, State},
    middleware,
    middleware::Next,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use super::{admin, owner, user, AppState};
use crate::auth::api as auth_api;
use crate::auth::middleware::{require_role, ADMIN_ONLY, ANY_ROLE, OWNER_ONLY, USER_ONLY};
use crate::middleware::request_logging;

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/signup", post(auth_api::signup))
        .route("/api/auth/login", post(auth_api::login));

    let password_routes = Router::new()
        .route("/api/auth/update-password", post(auth_api::update_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |s: State<AppState>, req: Request, next: Next| require_role(s, ANY_ROLE, req, next),
        ));

    let admin_routes = Router::new()
        .route("/api/admin/dashboard", get(admin::get_dashboard))
        .route(
            "/api/admin/users",
            get(admin::get_all_users).post(admin::create_user),
        )
        .route(
            "/api/admin/stores",
            get(admin::get_all_stores).post(admin::create_store),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |s: State<AppState>, req: Request, next: Next| require_role(s, ADMIN_ONLY, req, next),
        ));

    let owner_routes = Router::new()
        .route(
            "/api/store",
            get(owner::get_my_store).post(owner::create_store),
        )
        .route("/api/store/ratings", get(owner::get_my_store_ratings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |s: State<AppState>, req: Request, next: Next| require_role(s, OWNER_ONLY, req, next),
        ));

    let user_routes = Router::new()
        .route("/api/user/stores", get(user::get_stores))
        .route("/api/user/ratings/:store_id", put(user::update_rating))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |s: State<AppState>, req: Request, next: Next| require_role(s, USER_ONLY, req, next),
        ));

    Router::new()
        .merge(public_routes)
        .merge(password_routes)
        .merge(admin_routes)
        .merge(owner_routes)
        .merge(user_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
