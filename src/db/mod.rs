//! Data Access Layer
//! Mission: Typed access to users, stores, and ratings over SQLite
//!
//! All relational invariants live in the schema: unique emails, the
//! one-store-per-owner index, the composite (store, user) rating index, and
//! cascade-delete foreign keys. Handlers never re-check what a constraint
//! already enforces; conditional inserts surface violations as `Ok(None)`.

pub mod ratings;
pub mod stores;
pub mod users;

use anyhow::{Context, Result};
use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::Role;

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    address TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'USER',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stores (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    owner_id TEXT UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ratings (
    id TEXT PRIMARY KEY,
    store_id TEXT NOT NULL REFERENCES stores(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    rating INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- a user can only rate a store once
CREATE UNIQUE INDEX IF NOT EXISTS unique_rating ON ratings(store_id, user_id);

CREATE INDEX IF NOT EXISTS idx_ratings_store ON ratings(store_id, rating);
"#;

/// Platform database over a single SQLite connection
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// Aggregate row counts for the admin dashboard
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
}

impl Database {
    /// Open (or create) the database and apply the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX; // connection is guarded by our own mutex

        let conn = Connection::open_with_flags(db_path, flags)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to apply database schema")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn conn(&self) -> parking_lot::MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Independent aggregate counts of users, stores, and ratings
    pub fn dashboard_counts(&self) -> Result<DashboardCounts> {
        let conn = self.conn();

        let total_users: i64 =
            conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        let total_stores: i64 =
            conn.query_row("SELECT COUNT(*) FROM stores", [], |row| row.get(0))?;
        let total_ratings: i64 =
            conn.query_row("SELECT COUNT(*) FROM ratings", [], |row| row.get(0))?;

        Ok(DashboardCounts {
            total_users,
            total_stores,
            total_ratings,
        })
    }

    /// Populate demo fixtures on an empty database.
    ///
    /// No-op when any user already exists, so it is safe to leave enabled
    /// across restarts.
    pub fn seed_demo_data(&self) -> Result<()> {
        let user_count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if user_count > 0 {
            return Ok(());
        }

        // One hash shared by every demo account (password: User@123)
        let password_hash = hash("User@123", DEFAULT_COST).context("Failed to hash password")?;

        let admin = self
            .create_user(
                "System Administrator User",
                "admin@example.com",
                "100 Admin Way, Tech City",
                &password_hash,
                Role::Admin,
            )?
            .context("seed: admin email collision on empty database")?;

        let owner1 = self
            .create_user(
                "First Store Owner User Name",
                "owner1@example.com",
                "12 Baker Street, Gotham",
                &password_hash,
                Role::StoreOwner,
            )?
            .context("seed: owner email collision on empty database")?;

        let owner2 = self
            .create_user(
                "Second Store Owner Full Name",
                "owner2@example.com",
                "34 Elm Avenue, Metropolis",
                &password_hash,
                Role::StoreOwner,
            )?
            .context("seed: owner email collision on empty database")?;

        let user1 = self
            .create_user(
                "Normal Platform User One",
                "user1@example.com",
                "56 Oak Lane, Star City",
                &password_hash,
                Role::User,
            )?
            .context("seed: user email collision on empty database")?;

        let user2 = self
            .create_user(
                "Normal Platform User Two",
                "user2@example.com",
                "78 Pine Road, Central City",
                &password_hash,
                Role::User,
            )?
            .context("seed: user email collision on empty database")?;

        let store1 = self
            .create_store("Baker Street Books", "12 Baker Street, Gotham", owner1.id)?
            .context("seed: duplicate store for fresh owner")?;
        let store2 = self
            .create_store("Elm Avenue Grocers", "34 Elm Avenue, Metropolis", owner2.id)?
            .context("seed: duplicate store for fresh owner")?;

        self.upsert_rating(store1.id, user1.id, 4)?;
        self.upsert_rating(store1.id, user2.id, 5)?;
        self.upsert_rating(store2.id, user1.id, 3)?;

        info!(
            admin = %admin.email,
            "🌱 Seeded demo data (2 owners, 2 users, 2 stores, 3 ratings)"
        );

        Ok(())
    }
}

/// RFC 3339 timestamp for created_at / updated_at columns
pub(crate) fn now() -> String {
    Utc::now().to_rfc3339()
}

/// True when an INSERT was rejected by a UNIQUE constraint
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Parse a TEXT column into a Uuid inside a row-mapping closure
pub(crate) fn parse_uuid(idx: usize, value: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a role TEXT column inside a row-mapping closure
pub(crate) fn parse_role(idx: usize, value: String) -> rusqlite::Result<Role> {
    Role::from_str(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unknown role: {value}").into(),
        )
    })
}


#[cfg(test)]
mod tests {
    use super::test_util::create_test_db;
    use super::*;
    use rusqlite::params;

    #[test]
    fn test_empty_database_counts() {
        let (db, _temp) = create_test_db();

        let counts = db.dashboard_counts().unwrap();
        assert_eq!(counts.total_users, 0);
        assert_eq!(counts.total_stores, 0);
        assert_eq!(counts.total_ratings, 0);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (db, _temp) = create_test_db();

        db.seed_demo_data().unwrap();
        let first = db.dashboard_counts().unwrap();
        assert_eq!(first.total_users, 5);
        assert_eq!(first.total_stores, 2);
        assert_eq!(first.total_ratings, 3);

        // Second run must not add rows
        db.seed_demo_data().unwrap();
        let second = db.dashboard_counts().unwrap();
        assert_eq!(second.total_users, first.total_users);
        assert_eq!(second.total_stores, first.total_stores);
        assert_eq!(second.total_ratings, first.total_ratings);
    }

    #[test]
    fn test_deleting_user_cascades_to_store_and_ratings() {
        let (db, _temp) = create_test_db();
        db.seed_demo_data().unwrap();

        let owner = db
            .get_user_by_email("owner1@example.com")
            .unwrap()
            .unwrap();

        {
            let conn = db.conn();
            conn.execute("DELETE FROM users WHERE id = ?1", params![owner.id.to_string()])
                .unwrap();
        }

        let counts = db.dashboard_counts().unwrap();
        assert_eq!(counts.total_users, 4);
        // owner1's store and both of its ratings are gone
        assert_eq!(counts.total_stores, 1);
        assert_eq!(counts.total_ratings, 1);
    }
}
