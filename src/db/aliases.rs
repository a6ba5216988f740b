//! Alias repository for the alias -> room mapping.

use super::DbError;
use hearth_ident::{RoomAlias, RoomId, ServerName, UserId};
use sqlx::SqlitePool;

/// A stored alias association.
#[derive(Debug, Clone)]
pub struct AliasRecord {
    pub alias: RoomAlias,
    pub room_id: RoomId,
    pub creator: UserId,
    /// Candidate servers to join the room through, in preference order.
    pub servers_hint: Option<Vec<ServerName>>,
    pub created_at: i64,
}

/// Repository for alias operations.
pub struct AliasRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AliasRepository<'a> {
    /// Create a new alias repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Bind an alias to a room.
    ///
    /// Returns `false` when the alias is already bound to a different room.
    /// Re-binding an alias to the room it already points at replaces the
    /// record. This is a single statement against the alias primary key, so
    /// concurrent racers resolve at the storage layer: readers observe either
    /// the old record or the new one, and exactly one racer wins.
    pub async fn create(
        &self,
        alias: &RoomAlias,
        room_id: &RoomId,
        creator: &UserId,
        servers: Option<&[ServerName]>,
    ) -> Result<bool, DbError> {
        let now = chrono::Utc::now().timestamp_millis();
        let servers_json = match servers {
            Some(list) => Some(
                serde_json::to_string(&list.iter().map(ServerName::as_str).collect::<Vec<_>>())
                    .map_err(|e| DbError::Corrupt(format!("servers hint: {}", e)))?,
            ),
            None => None,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO room_aliases (alias, room_id, creator, servers, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(alias) DO UPDATE SET
                creator = excluded.creator,
                servers = excluded.servers,
                created_at = excluded.created_at
            WHERE room_aliases.room_id = excluded.room_id
            "#,
        )
        .bind(alias.as_str())
        .bind(room_id.as_str())
        .bind(creator.as_str())
        .bind(servers_json)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find the record for an alias.
    pub async fn find(&self, alias: &RoomAlias) -> Result<Option<AliasRecord>, DbError> {
        let row = sqlx::query_as::<_, (String, String, String, Option<String>, i64)>(
            r#"
            SELECT alias, room_id, creator, servers, created_at
            FROM room_aliases
            WHERE alias = ?
            "#,
        )
        .bind(alias.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(parse_record).transpose()
    }

    /// Remove the record for an alias. Returns `true` if a record existed.
    pub async fn delete(&self, alias: &RoomAlias) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM room_aliases WHERE alias = ?")
            .bind(alias.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All aliases currently bound to a room, oldest binding first.
    pub async fn list_for_room(&self, room_id: &RoomId) -> Result<Vec<RoomAlias>, DbError> {
        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT alias
            FROM room_aliases
            WHERE room_id = ?
            ORDER BY created_at ASC, alias ASC
            "#,
        )
        .bind(room_id.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(alias,)| {
                alias
                    .parse::<RoomAlias>()
                    .map_err(|e| DbError::Corrupt(format!("alias {:?}: {}", alias, e)))
            })
            .collect()
    }
}

fn parse_record(
    (alias, room_id, creator, servers, created_at): (String, String, String, Option<String>, i64),
) -> Result<AliasRecord, DbError> {
    let servers_hint = match servers {
        Some(json) => {
            let names: Vec<String> = serde_json::from_str(&json)
                .map_err(|e| DbError::Corrupt(format!("servers hint for {:?}: {}", alias, e)))?;
            let mut parsed = Vec::with_capacity(names.len());
            for name in names {
                parsed.push(
                    name.parse::<ServerName>()
                        .map_err(|e| DbError::Corrupt(format!("server {:?}: {}", name, e)))?,
                );
            }
            Some(parsed)
        }
        None => None,
    };

    Ok(AliasRecord {
        alias: alias
            .parse()
            .map_err(|e| DbError::Corrupt(format!("alias {:?}: {}", alias, e)))?,
        room_id: room_id
            .parse()
            .map_err(|e| DbError::Corrupt(format!("room {:?}: {}", room_id, e)))?,
        creator: creator
            .parse()
            .map_err(|e| DbError::Corrupt(format!("creator {:?}: {}", creator, e)))?,
        servers_hint,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use hearth_ident::{RoomAlias, RoomId, ServerName, UserId};

    fn alias(s: &str) -> RoomAlias {
        s.parse().unwrap()
    }

    fn room(s: &str) -> RoomId {
        s.parse().unwrap()
    }

    fn user(s: &str) -> UserId {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = Database::new(":memory:").await.unwrap();
        let servers: Vec<ServerName> = vec!["one.example".parse().unwrap()];

        let created = db
            .aliases()
            .create(
                &alias("#lobby:example.org"),
                &room("!abc:example.org"),
                &user("@ada:example.org"),
                Some(&servers[..]),
            )
            .await
            .unwrap();
        assert!(created);

        let record = db
            .aliases()
            .find(&alias("#lobby:example.org"))
            .await
            .unwrap()
            .expect("record should exist");
        assert_eq!(record.room_id, room("!abc:example.org"));
        assert_eq!(record.creator, user("@ada:example.org"));
        assert_eq!(record.servers_hint.as_deref(), Some(&servers[..]));
    }

    #[tokio::test]
    async fn test_create_conflict_on_different_room() {
        let db = Database::new(":memory:").await.unwrap();
        let a = alias("#lobby:example.org");

        assert!(
            db.aliases()
                .create(&a, &room("!r1:example.org"), &user("@ada:example.org"), None)
                .await
                .unwrap()
        );
        // Different room loses.
        assert!(
            !db.aliases()
                .create(&a, &room("!r2:example.org"), &user("@bob:example.org"), None)
                .await
                .unwrap()
        );
        // Old mapping intact.
        let record = db.aliases().find(&a).await.unwrap().unwrap();
        assert_eq!(record.room_id, room("!r1:example.org"));
        assert_eq!(record.creator, user("@ada:example.org"));

        // Same room replaces the record.
        assert!(
            db.aliases()
                .create(&a, &room("!r1:example.org"), &user("@bob:example.org"), None)
                .await
                .unwrap()
        );
        let record = db.aliases().find(&a).await.unwrap().unwrap();
        assert_eq!(record.creator, user("@bob:example.org"));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let db = Database::new(":memory:").await.unwrap();
        let r = room("!r:example.org");

        for name in ["#a:example.org", "#b:example.org"] {
            db.aliases()
                .create(&alias(name), &r, &user("@ada:example.org"), None)
                .await
                .unwrap();
        }

        let listed = db.aliases().list_for_room(&r).await.unwrap();
        assert_eq!(listed.len(), 2);

        assert!(db.aliases().delete(&alias("#a:example.org")).await.unwrap());
        assert!(!db.aliases().delete(&alias("#a:example.org")).await.unwrap());
        assert_eq!(db.aliases().list_for_room(&r).await.unwrap().len(), 1);
    }
}
