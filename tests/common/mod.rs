//! Shared helpers for integration tests.

#![allow(dead_code)] // not every test file uses every helper

use hearth_directory::{
    AliasDirectory, Database, PublicationRegistry, RoomAlias, RoomId, RoomStore, UserId,
};
use std::sync::Arc;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a subscriber once so `RUST_LOG=debug` surfaces directory logs.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    });
}

/// Fresh in-memory database with migrations applied.
pub async fn test_db() -> Database {
    init_tracing();
    Database::new(":memory:")
        .await
        .expect("Failed to open in-memory database")
}

/// The database doubling as the room store collaborator.
pub fn room_store(db: &Database) -> Arc<dyn RoomStore> {
    Arc::new(db.clone())
}

pub fn alias_directory(db: &Database) -> AliasDirectory {
    AliasDirectory::new(db.clone(), room_store(db))
}

pub fn publication_registry(db: &Database) -> PublicationRegistry {
    PublicationRegistry::new(db.clone(), room_store(db))
}

/// Seed a room into the room store.
pub async fn seed_room(db: &Database, room_id: &RoomId) {
    db.rooms().create(room_id).await.expect("Failed to seed room");
}

pub fn alias(s: &str) -> RoomAlias {
    s.parse().expect("valid alias")
}

pub fn room(s: &str) -> RoomId {
    s.parse().expect("valid room id")
}

pub fn user(s: &str) -> UserId {
    s.parse().expect("valid user id")
}
