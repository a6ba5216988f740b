//! Room repository.
//!
//! The room table itself is owned by the room-creation path of the
//! homeserver; the directory only checks existence through it. The
//! repository still exposes `create` so single-store deployments and tests
//! can seed rooms.

use super::DbError;
use hearth_ident::RoomId;
use sqlx::SqlitePool;

/// Repository for room rows.
pub struct RoomRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RoomRepository<'a> {
    /// Create a new room repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a room. Re-recording an existing room is a no-op.
    pub async fn create(&self, room_id: &RoomId) -> Result<(), DbError> {
        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query("INSERT OR IGNORE INTO rooms (room_id, created_at) VALUES (?, ?)")
            .bind(room_id.as_str())
            .bind(now)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Whether a room exists.
    pub async fn exists(&self, room_id: &RoomId) -> Result<bool, DbError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM rooms WHERE room_id = ?")
            .bind(room_id.as_str())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use hearth_ident::RoomId;

    #[tokio::test]
    async fn test_create_and_exists() {
        let db = Database::new(":memory:").await.unwrap();
        let r: RoomId = "!r:example.org".parse().unwrap();

        assert!(!db.rooms().exists(&r).await.unwrap());
        db.rooms().create(&r).await.unwrap();
        db.rooms().create(&r).await.unwrap();
        assert!(db.rooms().exists(&r).await.unwrap());
    }
}
