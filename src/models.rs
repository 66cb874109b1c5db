//! Domain Models
//! Mission: Define the platform's core data structures and configuration

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Runtime configuration, loaded from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./storerate.db".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .unwrap_or(3001);

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let token_ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .unwrap_or(1);

        let seed_demo_data = std::env::var("SEED_DEMO_DATA")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(false);

        Ok(Self {
            database_path,
            port,
            jwt_secret,
            token_ttl_hours,
            seed_demo_data,
        })
    }
}

/// Account roles for route-level access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "STORE_OWNER")]
    StoreOwner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::StoreOwner => "STORE_OWNER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            "STORE_OWNER" => Some(Role::StoreOwner),
            _ => None,
        }
    }
}

/// User account row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

/// Store row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub owner_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

/// Rating row: one per (store, user) pair, value in 1..=5
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub store_id: Uuid,
    pub user_id: Uuid,
    pub rating: i64,
    pub created_at: String,
    pub updated_at: String,
}
