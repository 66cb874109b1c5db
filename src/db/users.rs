//! User Storage
//! Mission: Account rows with a globally unique email

use anyhow::{Context, Result};
use rusqlite::{params, Row};
use uuid::Uuid;

use super::{is_unique_violation, now, parse_role, parse_uuid, Database};
use crate::models::{Role, User};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: parse_uuid(0, row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        address: row.get(3)?,
        password_hash: row.get(4)?,
        role: parse_role(5, row.get::<_, String>(5)?)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const USER_COLUMNS: &str = "id, name, email, address, password_hash, role, created_at, updated_at";

impl Database {
    /// Insert a new user.
    ///
    /// Returns `Ok(None)` when the email is already taken; the unique index
    /// is the sole arbiter, so two concurrent signups for one email cannot
    /// both succeed.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        address: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<User>> {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now(),
            updated_at: now(),
        };

        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO users (id, name, email, address, password_hash, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.address,
                user.password_hash,
                user.role.as_str(),
                user.created_at,
                user.updated_at,
            ],
        );

        match result {
            Ok(_) => Ok(Some(user)),
            Err(ref e) if is_unique_violation(e) => Ok(None),
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))?;

        match stmt.query_row(params![email], user_from_row) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_user_by_id(&self, user_id: &Uuid) -> Result<Option<User>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;

        match stmt.query_row(params![user_id.to_string()], user_from_row) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))?;

        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Replace a user's stored password hash
    pub fn update_password_hash(&self, user_id: &Uuid, password_hash: &str) -> Result<()> {
        let conn = self.conn();
        let rows = conn.execute(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
            params![password_hash, now(), user_id.to_string()],
        )?;

        if rows == 0 {
            anyhow::bail!("User not found");
        }
        Ok(())
    }
}
