//! StoreRate - Role-Based Store Rating Platform
//! Mission: Serve the rating API; everything durable lives in SQLite

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storerate_backend::{
    api::{create_router, AppState},
    auth::JwtHandler,
    db::Database,
    models::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storerate_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let db = Arc::new(Database::new(&config.database_path)?);
    info!("💾 Database ready at {}", config.database_path);

    if config.seed_demo_data {
        db.seed_demo_data().context("Failed to seed demo data")?;
    }

    let jwt = Arc::new(JwtHandler::new(config.jwt_secret.clone()).with_ttl_hours(config.token_ttl_hours));

    let app = create_router(AppState { db, jwt });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
