//! Store Storage
//! Mission: Store rows plus the aggregate-rating views built on them
//!
//! The one-store-per-owner rule is the unique index on owner_id; creation
//! goes through a single conditional INSERT rather than a read-then-write.

use anyhow::{Context, Result};
use rusqlite::params;
use serde::Serialize;
use uuid::Uuid;

use super::{is_unique_violation, now, parse_uuid, Database};
use crate::models::Store;

/// Admin listing row: store joined with its average rating
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreWithAverage {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub average_rating: Option<f64>,
    pub owner_id: Option<Uuid>,
}

/// Owner's own store with its rating aggregates
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerStoreSummary {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub average_rating: Option<f64>,
    pub total_ratings: i64,
}

/// Browsing row: average rating plus the requesting user's own rating
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreForUser {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub average_rating: Option<f64>,
    pub user_rating: Option<i64>,
}

impl Database {
    /// Insert a store for an owner.
    ///
    /// Returns `Ok(None)` when the owner already has a store; the unique
    /// owner_id index rejects the row, so concurrent creations cannot both
    /// land.
    pub fn create_store(&self, name: &str, address: &str, owner_id: Uuid) -> Result<Option<Store>> {
        let store = Store {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: address.to_string(),
            owner_id: Some(owner_id),
            created_at: now(),
            updated_at: now(),
        };

        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO stores (id, name, address, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                store.id.to_string(),
                store.name,
                store.address,
                owner_id.to_string(),
                store.created_at,
                store.updated_at,
            ],
        );

        match result {
            Ok(_) => Ok(Some(store)),
            Err(ref e) if is_unique_violation(e) => Ok(None),
            Err(e) => Err(e).context("Failed to insert store"),
        }
    }

    pub fn get_store_by_owner(&self, owner_id: &Uuid) -> Result<Option<Store>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, address, owner_id, created_at, updated_at
             FROM stores WHERE owner_id = ?1",
        )?;

        let result = stmt.query_row(params![owner_id.to_string()], |row| {
            Ok(Store {
                id: parse_uuid(0, row.get::<_, String>(0)?)?,
                name: row.get(1)?,
                address: row.get(2)?,
                owner_id: row
                    .get::<_, Option<String>>(3)?
                    .map(|s| parse_uuid(3, s))
                    .transpose()?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
            })
        });

        match result {
            Ok(store) => Ok(Some(store)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn store_exists(&self, store_id: &Uuid) -> Result<bool> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM stores WHERE id = ?1",
            params![store_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All stores with their average rating (NULL average when unrated)
    pub fn list_stores_with_average(&self) -> Result<Vec<StoreWithAverage>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.address, AVG(r.rating), s.owner_id
             FROM stores s
             LEFT JOIN ratings r ON r.store_id = s.id
             GROUP BY s.id
             ORDER BY s.created_at",
        )?;

        let stores = stmt
            .query_map([], |row| {
                Ok(StoreWithAverage {
                    id: parse_uuid(0, row.get::<_, String>(0)?)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    average_rating: row.get(3)?,
                    owner_id: row
                        .get::<_, Option<String>>(4)?
                        .map(|s| parse_uuid(4, s))
                        .transpose()?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stores)
    }

    /// The owner's store with average rating and total rating count
    pub fn get_owner_store_summary(&self, owner_id: &Uuid) -> Result<Option<OwnerStoreSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.address, AVG(r.rating), COUNT(r.id)
             FROM stores s
             LEFT JOIN ratings r ON r.store_id = s.id
             WHERE s.owner_id = ?1
             GROUP BY s.id",
        )?;

        let result = stmt.query_row(params![owner_id.to_string()], |row| {
            Ok(OwnerStoreSummary {
                id: parse_uuid(0, row.get::<_, String>(0)?)?,
                name: row.get(1)?,
                address: row.get(2)?,
                average_rating: row.get(3)?,
                total_ratings: row.get(4)?,
            })
        });

        match result {
            Ok(summary) => Ok(Some(summary)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Every store with its average and the requesting user's own rating.
    ///
    /// The per-user value rides the same join as the average: a conditional
    /// aggregate keyed on the caller's id, NULL when they have not rated.
    pub fn list_stores_for_user(&self, user_id: &Uuid) -> Result<Vec<StoreForUser>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.address, AVG(r.rating),
                    MAX(CASE WHEN r.user_id = ?1 THEN r.rating ELSE NULL END)
             FROM stores s
             LEFT JOIN ratings r ON r.store_id = s.id
             GROUP BY s.id
             ORDER BY s.created_at",
        )?;

        let stores = stmt
            .query_map(params![user_id.to_string()], |row| {
                Ok(StoreForUser {
                    id: parse_uuid(0, row.get::<_, String>(0)?)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    average_rating: row.get(3)?,
                    user_rating: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(stores)
    }
}
