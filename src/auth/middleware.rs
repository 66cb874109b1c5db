//! Authorization Middleware
//! Mission: Per-route role allow-lists over bearer-token authentication
//!
//! Every rejection is the same 401 regardless of cause (no token, bad token,
//! wrong role); callers cannot probe which check failed.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::{error::ApiError, AppState};
use crate::models::Role;

/// Authenticated identity, injected into request extensions once the
/// token and role checks pass
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub role: Role,
}

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const USER_ONLY: &[Role] = &[Role::User];
pub const OWNER_ONLY: &[Role] = &[Role::StoreOwner];
pub const ANY_ROLE: &[Role] = &[Role::User, Role::StoreOwner, Role::Admin];

const REJECTION: ApiError = ApiError::Unauthorized("Authentication required");

/// Route guard: verify the bearer token, check the embedded role against the
/// route's allow-list, and bind the identity to the request.
///
/// Wire it up per route group:
/// `middleware::from_fn_with_state(state, |s, req, next| require_role(s, ADMIN_ONLY, req, next))`
pub async fn require_role(
    State(state): State<AppState>,
    allowed: &'static [Role],
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(REJECTION)?;

    let claims = state.jwt.verify_token(token).map_err(|_| REJECTION)?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| REJECTION)?;

    if !allowed.contains(&claims.role) {
        return Err(REJECTION);
    }

    req.extensions_mut().insert(AuthSession {
        user_id,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtHandler;
    use crate::db::test_util::create_test_db;
    use axum::{
        body::Body,
        extract::Extension,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use tower::ServiceExt;

    async fn whoami(Extension(session): Extension<AuthSession>) -> String {
        session.user_id.to_string()
    }

    fn test_app(allowed: &'static [Role]) -> (Router, Arc<JwtHandler>, NamedTempFile) {
        let (db, temp) = create_test_db();
        let jwt = Arc::new(JwtHandler::new("test-secret".to_string()));
        let state = AppState {
            db: Arc::new(db),
            jwt: jwt.clone(),
        };

        let app = Router::new()
            .route("/protected", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                move |s: State<AppState>, req: Request, next: Next| {
                    require_role(s, allowed, req, next)
                },
            ))
            .with_state(state);

        (app, jwt, temp)
    }

    fn get_with_auth(header: Option<String>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri("/protected");
        if let Some(h) = header {
            builder = builder.header("Authorization", h);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let (app, _jwt, _temp) = test_app(ADMIN_ONLY);

        let response = app.oneshot(get_with_auth(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_header_rejected() {
        let (app, _jwt, _temp) = test_app(ADMIN_ONLY);

        let response = app
            .oneshot(get_with_auth(Some("Basic dXNlcjpwYXNz".to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_rejected() {
        let (app, _jwt, _temp) = test_app(ADMIN_ONLY);

        let response = app
            .oneshot(get_with_auth(Some("Bearer not.a.token".to_string())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_role_rejected_with_same_status() {
        let (app, jwt, _temp) = test_app(ADMIN_ONLY);

        let token = jwt.generate_token(Uuid::new_v4(), Role::User).unwrap();
        let response = app
            .oneshot(get_with_auth(Some(format!("Bearer {token}"))))
            .await
            .unwrap();

        // Indistinguishable from the missing/invalid-token cases
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_allowed_role_proceeds_with_identity() {
        let (app, jwt, _temp) = test_app(ADMIN_ONLY);

        let user_id = Uuid::new_v4();
        let token = jwt.generate_token(user_id, Role::Admin).unwrap();
        let response = app
            .oneshot(get_with_auth(Some(format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_any_role_allows_all_three() {
        for role in [Role::Admin, Role::User, Role::StoreOwner] {
            let (app, jwt, _temp) = test_app(ANY_ROLE);
            let token = jwt.generate_token(Uuid::new_v4(), role).unwrap();
            let response = app
                .oneshot(get_with_auth(Some(format!("Bearer {token}"))))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
