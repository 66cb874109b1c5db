//! Rating Storage
//! Mission: One rating per (store, user), enforced by the composite index
//!
//! The write path is a single ON CONFLICT upsert: the row id and created_at
//! survive the first insert (first write wins on identity), the value and
//! updated_at track the latest call (last write wins on the value). Two
//! concurrent submissions by one user can never leave two rows or fail with
//! a duplicate-key error.

use anyhow::{Context, Result};
use rusqlite::{params, Row};
use uuid::Uuid;

use super::{now, parse_uuid, Database};
use crate::models::Rating;

fn rating_from_row(row: &Row<'_>) -> rusqlite::Result<Rating> {
    Ok(Rating {
        id: parse_uuid(0, row.get::<_, String>(0)?)?,
        store_id: parse_uuid(1, row.get::<_, String>(1)?)?,
        user_id: parse_uuid(2, row.get::<_, String>(2)?)?,
        rating: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl Database {
    /// Insert or update the caller's rating for a store.
    ///
    /// The caller is responsible for range-checking the value and for the
    /// store's existence; a dangling store id still fails closed on the
    /// foreign key.
    pub fn upsert_rating(&self, store_id: Uuid, user_id: Uuid, rating: i64) -> Result<Rating> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "INSERT INTO ratings (id, store_id, user_id, rating, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(store_id, user_id)
             DO UPDATE SET rating = excluded.rating, updated_at = excluded.updated_at
             RETURNING id, store_id, user_id, rating, created_at, updated_at",
        )?;

        let row = stmt
            .query_row(
                params![
                    Uuid::new_v4().to_string(),
                    store_id.to_string(),
                    user_id.to_string(),
                    rating,
                    now(),
                ],
                rating_from_row,
            )
            .context("Failed to upsert rating")?;

        Ok(row)
    }

    /// All ratings for a store, ordered by rating value ascending
    pub fn list_store_ratings(&self, store_id: &Uuid) -> Result<Vec<Rating>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, store_id, user_id, rating, created_at, updated_at
             FROM ratings WHERE store_id = ?1
             ORDER BY rating ASC",
        )?;

        let ratings = stmt
            .query_map(params![store_id.to_string()], rating_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ratings)
    }

    pub fn get_rating(&self, store_id: &Uuid, user_id: &Uuid) -> Result<Option<Rating>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, store_id, user_id, rating, created_at, updated_at
             FROM ratings WHERE store_id = ?1 AND user_id = ?2",
        )?;

        let result = stmt.query_row(
            params![store_id.to_string(), user_id.to_string()],
            rating_from_row,
        );

        match result {
            Ok(rating) => Ok(Some(rating)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
