//! Local user records.
//!
//! Stores must enforce uniqueness on `email` themselves (a unique index); the
//! reconciliation procedure never re-checks after its initial lookup.

use crate::provider::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, Connection, PgPool, Row};
use thiserror::Error;
use tracing::{info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a user record already exists for this email")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document store error: {0}")]
    Provider(#[from] ProviderError),
    #[error("invalid user record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub record_id: String,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub full_name: String,
    pub email: String,
    pub avatar: String,
    pub account_id: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// First record whose email equals `email` exactly.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, StoreError>;

    async fn health(&self) -> Result<(), StoreError>;
}

/// User records in PostgreSQL, see `db/sql/01_accord.sql`.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn record_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    let record_id: Uuid = row.try_get("record_id")?;
    Ok(UserRecord {
        record_id: record_id.to_string(),
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        avatar: row.try_get("avatar")?,
        account_id: row.try_get("account_id")?,
    })
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = r"
            SELECT record_id, full_name, email, avatar, account_id
            FROM users
            WHERE email = $1
            ORDER BY created_at
            LIMIT 1
        ";
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "SELECT");
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn create(&self, record: NewUserRecord) -> Result<UserRecord, StoreError> {
        let query = r"
            INSERT INTO users (record_id, full_name, email, avatar, account_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING record_id, full_name, email, avatar, account_id
        ";
        let span = info_span!("db.query", db.system = "postgresql", db.operation = "INSERT");
        let row = sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(&record.full_name)
            .bind(&record.email)
            .bind(&record.avatar)
            .bind(&record.account_id)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Conflict
                } else {
                    StoreError::Database(err)
                }
            })?;

        Ok(record_from_row(&row)?)
    }

    async fn health(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self.pool.acquire().instrument(acquire_span).await?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping().instrument(ping_span).await?;

        Ok(())
    }
}
