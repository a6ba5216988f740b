//! Directory services: alias resolution and room publication.
//!
//! This module is split into logical submodules:
//! - [`requester`]: the authenticated caller identity supplied by the
//!   transport layer, including appservice namespaces
//! - [`authorization`]: the pure allow/deny decision function consulted by
//!   every mutating operation
//! - [`aliases`]: the alias -> room mapping service
//! - [`publication`]: the scope-partitioned room list service

mod aliases;
mod authorization;
mod publication;
mod requester;

pub use aliases::AliasDirectory;
pub use authorization::{Decision, DirectoryOp, decide};
pub use publication::{PublicationRegistry, PublicationScope};
pub use requester::{AppserviceIdentity, Requester};

pub use crate::db::AliasRecord;

use crate::db::{Database, DbError};
use async_trait::async_trait;
use hearth_ident::RoomId;

/// Collaborator contract for the room store.
///
/// Room lifecycle is owned elsewhere in the homeserver; the directory only
/// needs to know whether a referenced room exists. [`Database`] implements
/// this against its own room table for single-store deployments; tests may
/// substitute an in-memory stub.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Whether the room exists.
    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, DbError>;
}

#[async_trait]
impl RoomStore for Database {
    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, DbError> {
        self.rooms().exists(room_id).await
    }
}
