//! Account validity repository.
//!
//! Stores per-user expiration stamps for the built-in account validity
//! policy module. Timestamps are milliseconds since the epoch.

use super::DbError;
use hearth_ident::UserId;
use sqlx::SqlitePool;

/// Repository for account expiration stamps.
pub struct AccountValidityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountValidityRepository<'a> {
    /// Create a new account validity repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a user's expiration stamp.
    pub async fn expiration_ts(&self, user_id: &UserId) -> Result<Option<i64>, DbError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT expiration_ts FROM account_validity WHERE user_id = ?")
                .bind(user_id.as_str())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(|(ts,)| ts))
    }

    /// Set a user's expiration stamp, replacing any previous one.
    pub async fn set_expiration_ts(&self, user_id: &UserId, ts: i64) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO account_validity (user_id, expiration_ts)
            VALUES (?, ?)
            "#,
        )
        .bind(user_id.as_str())
        .bind(ts)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Stamp a user that has no expiration row yet, returning the effective
    /// stamp. A concurrent stamp wins over ours; the returned value is
    /// whatever ended up stored.
    pub async fn stamp_if_absent(&self, user_id: &UserId, ts: i64) -> Result<i64, DbError> {
        sqlx::query(
            r#"
            INSERT INTO account_validity (user_id, expiration_ts)
            VALUES (?, ?)
            ON CONFLICT(user_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_str())
        .bind(ts)
        .execute(self.pool)
        .await?;

        let (stored,): (i64,) =
            sqlx::query_as("SELECT expiration_ts FROM account_validity WHERE user_id = ?")
                .bind(user_id.as_str())
                .fetch_one(self.pool)
                .await?;

        Ok(stored)
    }
}
