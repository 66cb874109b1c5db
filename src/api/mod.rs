//! HTTP API
//! Mission: Role-scoped JSON endpoints over the platform database

pub mod admin;
pub mod error;
pub mod owner;
pub mod routes;
pub mod user;

use std::sync::Arc;

use crate::auth::JwtHandler;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub jwt: Arc<JwtHandler>,
}

pub use routes::create_router;
