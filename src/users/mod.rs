//! Persistence for user accounts.
//!
//! All reads and writes of the `users` table go through [`UserStore`]. Each
//! operation borrows one connection from the bounded pool for the span of a
//! single statement; nothing is retried here, transient failures surface to
//! the caller.

use sqlx::{postgres::PgDatabaseError, PgPool, Row};
use thiserror::Error;
use tracing::{info_span, Instrument};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("datastore unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}

// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err
                .as_error()
                .downcast_ref::<PgDatabaseError>()
                .map(PgDatabaseError::code)
                == Some(UNIQUE_VIOLATION)
        }
        _ => false,
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id").map_err(StoreError::Unavailable)?,
        username: row.try_get("username").map_err(StoreError::Unavailable)?,
        password_hash: row
            .try_get("password_hash")
            .map_err(StoreError::Unavailable)?,
    })
}

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the datastore cannot be reached
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let query = "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "CREATE TABLE"
        );

        sqlx::query(query)
            .execute(&self.pool)
            .instrument(span)
            .await
            .map_err(StoreError::Unavailable)?;

        Ok(())
    }

    /// Insert a new user row.
    ///
    /// The uniqueness constraint is the final authority for duplicate
    /// usernames, including races with concurrent registrations.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateUsername` if the username is taken, `Unavailable`
    /// if the datastore cannot be reached
    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<(), StoreError> {
        let query = "INSERT INTO users (username, password_hash) VALUES ($1, $2)";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );

        match sqlx::query(query)
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .instrument(span)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateUsername),
            Err(err) => Err(StoreError::Unavailable(err)),
        }
    }

    /// Look up a user by username; absent is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the datastore cannot be reached
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let query = "SELECT id, username, password_hash FROM users WHERE username = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );

        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(StoreError::Unavailable)?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Look up a user by id; absent is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the datastore cannot be reached
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let query = "SELECT id, username, password_hash FROM users WHERE id = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(StoreError::Unavailable)?;

        row.as_ref().map(row_to_user).transpose()
    }
}
