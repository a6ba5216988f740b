//! The scope-partitioned room publication service.

use super::authorization::{Decision, DirectoryOp, decide};
use super::requester::Requester;
use super::RoomStore;
use crate::db::Database;
use crate::error::{DirectoryError, DirectoryResult};
use crate::metrics;
use hearth_ident::{RoomId, Visibility};
use std::sync::Arc;
use tracing::info;

/// A partition of the publication registry.
///
/// Scopes are independent: a room may be listed in the global scope and in
/// any number of appservice network scopes at once; no cross-scope invariant
/// is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublicationScope {
    /// The server's single public client-facing directory.
    Global,
    /// A list private to one bridging integration's network namespace.
    AppserviceNetwork {
        /// The owning appservice's registered ID.
        appservice_id: String,
        /// The third-party network within that appservice.
        network_id: String,
    },
}

impl PublicationScope {
    /// Storage columns for this scope. The global scope is the empty pair.
    fn columns(&self) -> (&str, &str) {
        match self {
            PublicationScope::Global => ("", ""),
            PublicationScope::AppserviceNetwork {
                appservice_id,
                network_id,
            } => (appservice_id, network_id),
        }
    }
}

/// Room publication registry service.
#[derive(Clone)]
pub struct PublicationRegistry {
    db: Database,
    rooms: Arc<dyn RoomStore>,
}

impl PublicationRegistry {
    /// Create the service over a database and a room store collaborator.
    pub fn new(db: Database, rooms: Arc<dyn RoomStore>) -> Self {
        Self { db, rooms }
    }

    /// Read a room's visibility in the global client-facing directory.
    ///
    /// A room absent from the room store fails with `NotFound`; a room with
    /// no publication entry reads `Private`.
    pub async fn get_visibility(&self, room_id: &RoomId) -> DirectoryResult<Visibility> {
        let res = async {
            if !self.rooms.room_exists(room_id).await? {
                return Err(DirectoryError::NotFound);
            }
            Ok(self.db.publication().visibility(room_id, "", "").await?)
        }
        .await;
        metrics::record_directory_op("get_visibility", &res);
        res
    }

    /// Edit the global published room list.
    ///
    /// Any authenticated requester passes this layer; room membership and
    /// power-level checks are the room permissions collaborator's concern.
    pub async fn edit_published_room_list(
        &self,
        requester: &Requester,
        room_id: &RoomId,
        visibility: Visibility,
    ) -> DirectoryResult<()> {
        let res = self
            .edit_published_room_list_inner(requester, room_id, visibility)
            .await;
        metrics::record_directory_op("edit_published_room_list", &res);
        res
    }

    async fn edit_published_room_list_inner(
        &self,
        requester: &Requester,
        room_id: &RoomId,
        visibility: Visibility,
    ) -> DirectoryResult<()> {
        decide(requester, DirectoryOp::EditRoomList)?;

        if !self.rooms.room_exists(room_id).await? {
            return Err(DirectoryError::BadRequest("room does not exist".to_string()));
        }

        self.db
            .publication()
            .set_visibility(room_id, "", "", visibility)
            .await?;

        info!(
            user = %requester.user,
            room = %room_id,
            visibility = %visibility,
            "Edited published room list"
        );
        Ok(())
    }

    /// Edit a per-appservice published room list.
    ///
    /// The scope's appservice ID is resolved by the authorization decision:
    /// an appservice requester is pinned to its own namespace, and a server
    /// admin may only delist (with the empty sentinel namespace).
    pub async fn edit_published_appservice_room_list(
        &self,
        requester: &Requester,
        network_id: &str,
        room_id: &RoomId,
        visibility: Visibility,
    ) -> DirectoryResult<()> {
        let res = self
            .edit_published_appservice_room_list_inner(requester, network_id, room_id, visibility)
            .await;
        metrics::record_directory_op("edit_published_appservice_room_list", &res);
        res
    }

    async fn edit_published_appservice_room_list_inner(
        &self,
        requester: &Requester,
        network_id: &str,
        room_id: &RoomId,
        visibility: Visibility,
    ) -> DirectoryResult<()> {
        // The appservice edit decision always resolves to a scoped grant.
        let appservice_id = match decide(
            requester,
            DirectoryOp::EditAppserviceRoomList { visibility },
        )? {
            Decision::GrantedForAppservice { appservice_id } => appservice_id,
            Decision::Granted => String::new(),
        };

        self.db
            .publication()
            .set_visibility(room_id, &appservice_id, network_id, visibility)
            .await?;

        info!(
            user = %requester.user,
            appservice = %appservice_id,
            network = %network_id,
            room = %room_id,
            visibility = %visibility,
            "Edited appservice published room list"
        );
        Ok(())
    }

    /// All rooms published in one scope, ordered by room ID.
    pub async fn list_published_rooms(
        &self,
        scope: &PublicationScope,
    ) -> DirectoryResult<Vec<RoomId>> {
        let (appservice_id, network_id) = scope.columns();
        Ok(self
            .db
            .publication()
            .list_published(appservice_id, network_id)
            .await?)
    }
}
