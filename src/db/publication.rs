//! Publication repository for directory listing entries.
//!
//! A row in `published_rooms` means the room is public in that scope; the
//! global client-facing list uses empty appservice and network columns.
//! Writing `private` deletes the row, which keeps both write directions
//! idempotent.

use super::DbError;
use hearth_ident::{RoomId, Visibility};
use sqlx::SqlitePool;

/// Repository for publication entries.
pub struct PublicationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PublicationRepository<'a> {
    /// Create a new publication repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Set the visibility of a room within one scope.
    pub async fn set_visibility(
        &self,
        room_id: &RoomId,
        appservice_id: &str,
        network_id: &str,
        visibility: Visibility,
    ) -> Result<(), DbError> {
        match visibility {
            Visibility::Public => {
                let now = chrono::Utc::now().timestamp_millis();
                sqlx::query(
                    r#"
                    INSERT OR REPLACE INTO published_rooms (room_id, appservice_id, network_id, published_at)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(room_id.as_str())
                .bind(appservice_id)
                .bind(network_id)
                .bind(now)
                .execute(self.pool)
                .await?;
            }
            Visibility::Private => {
                sqlx::query(
                    r#"
                    DELETE FROM published_rooms
                    WHERE room_id = ? AND appservice_id = ? AND network_id = ?
                    "#,
                )
                .bind(room_id.as_str())
                .bind(appservice_id)
                .bind(network_id)
                .execute(self.pool)
                .await?;
            }
        }

        Ok(())
    }

    /// Read the visibility of a room within one scope.
    pub async fn visibility(
        &self,
        room_id: &RoomId,
        appservice_id: &str,
        network_id: &str,
    ) -> Result<Visibility, DbError> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT 1 FROM published_rooms
            WHERE room_id = ? AND appservice_id = ? AND network_id = ?
            "#,
        )
        .bind(room_id.as_str())
        .bind(appservice_id)
        .bind(network_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(if row.is_some() {
            Visibility::Public
        } else {
            Visibility::Private
        })
    }

    /// All rooms published in one scope, ordered by room ID.
    pub async fn list_published(
        &self,
        appservice_id: &str,
        network_id: &str,
    ) -> Result<Vec<RoomId>, DbError> {
        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT room_id FROM published_rooms
            WHERE appservice_id = ? AND network_id = ?
            ORDER BY room_id ASC
            "#,
        )
        .bind(appservice_id)
        .bind(network_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(room_id,)| {
                room_id
                    .parse::<RoomId>()
                    .map_err(|e| DbError::Corrupt(format!("room {:?}: {}", room_id, e)))
            })
            .collect()
    }
}
