//! The alias -> room mapping service.

use super::authorization::{DirectoryOp, decide};
use super::requester::{AppserviceIdentity, Requester};
use super::RoomStore;
use crate::db::{AliasRecord, Database};
use crate::error::{DirectoryError, DirectoryResult};
use crate::metrics;
use hearth_ident::{RoomAlias, RoomId, ServerName};
use std::sync::Arc;
use tracing::info;

/// Alias directory service.
///
/// Owns creation, lookup, and deletion of alias associations. Deletion is
/// bifurcated into a user path and an appservice path at the entry boundary:
/// the transport probes [`delete_appservice_association`] first and falls
/// through to [`delete_association`] when the caller did not present
/// appservice credentials, so users and admins always retain ordinary
/// deletion rights over their aliases.
///
/// [`delete_appservice_association`]: AliasDirectory::delete_appservice_association
/// [`delete_association`]: AliasDirectory::delete_association
#[derive(Clone)]
pub struct AliasDirectory {
    db: Database,
    rooms: Arc<dyn RoomStore>,
}

impl AliasDirectory {
    /// Create the service over a database and a room store collaborator.
    pub fn new(db: Database, rooms: Arc<dyn RoomStore>) -> Self {
        Self { db, rooms }
    }

    /// Resolve an alias to its record.
    pub async fn get_association(&self, alias: &RoomAlias) -> DirectoryResult<AliasRecord> {
        let res = async {
            self.db
                .aliases()
                .find(alias)
                .await?
                .ok_or(DirectoryError::NotFound)
        }
        .await;
        metrics::record_directory_op("get_association", &res);
        res
    }

    /// Bind an alias to a room.
    ///
    /// The target room must already exist in the room store. Binding an
    /// alias that already points at a different room fails with `Conflict`;
    /// the losing side of a concurrent race observes the same failure.
    pub async fn create_association(
        &self,
        requester: &Requester,
        alias: &RoomAlias,
        room_id: &RoomId,
        servers_hint: Option<&[ServerName]>,
    ) -> DirectoryResult<()> {
        let res = self
            .create_association_inner(requester, alias, room_id, servers_hint)
            .await;
        metrics::record_directory_op("create_association", &res);
        res
    }

    async fn create_association_inner(
        &self,
        requester: &Requester,
        alias: &RoomAlias,
        room_id: &RoomId,
        servers_hint: Option<&[ServerName]>,
    ) -> DirectoryResult<()> {
        if !self.rooms.room_exists(room_id).await? {
            return Err(DirectoryError::BadRequest("room does not exist".to_string()));
        }

        decide(requester, DirectoryOp::CreateAlias { alias })?;

        let created = self
            .db
            .aliases()
            .create(alias, room_id, &requester.user, servers_hint)
            .await?;
        if !created {
            return Err(DirectoryError::Conflict);
        }

        info!(
            user = %requester.user,
            alias = %alias,
            room = %room_id,
            "Created alias association"
        );
        Ok(())
    }

    /// Remove an alias through the ordinary user path.
    ///
    /// Allowed for the record's creator or a server admin. Appservices use
    /// [`delete_appservice_association`](AliasDirectory::delete_appservice_association).
    pub async fn delete_association(
        &self,
        requester: &Requester,
        alias: &RoomAlias,
    ) -> DirectoryResult<()> {
        let res = self.delete_association_inner(requester, alias).await;
        metrics::record_directory_op("delete_association", &res);
        res
    }

    async fn delete_association_inner(
        &self,
        requester: &Requester,
        alias: &RoomAlias,
    ) -> DirectoryResult<()> {
        let record = self
            .db
            .aliases()
            .find(alias)
            .await?
            .ok_or(DirectoryError::NotFound)?;

        decide(
            requester,
            DirectoryOp::DeleteAlias {
                record_creator: &record.creator,
            },
        )?;

        if !self.db.aliases().delete(alias).await? {
            return Err(DirectoryError::NotFound);
        }

        info!(user = %requester.user, alias = %alias, "User deleted alias");
        Ok(())
    }

    /// Remove an alias on behalf of a verified appservice.
    ///
    /// The caller is expected to have verified the appservice credentials
    /// already; there is no fallback to user-level authorization inside this
    /// path, and no creator check: the namespace reservation is the
    /// authority.
    pub async fn delete_appservice_association(
        &self,
        appservice: &AppserviceIdentity,
        alias: &RoomAlias,
    ) -> DirectoryResult<()> {
        let res = self
            .delete_appservice_association_inner(appservice, alias)
            .await;
        metrics::record_directory_op("delete_appservice_association", &res);
        res
    }

    async fn delete_appservice_association_inner(
        &self,
        appservice: &AppserviceIdentity,
        alias: &RoomAlias,
    ) -> DirectoryResult<()> {
        if !appservice.is_interested_in_alias(alias) {
            return Err(DirectoryError::BadRequest(
                "this application service has not reserved this alias".to_string(),
            ));
        }

        if !self.db.aliases().delete(alias).await? {
            return Err(DirectoryError::NotFound);
        }

        info!(appservice = %appservice.id, alias = %alias, "Application service deleted alias");
        Ok(())
    }

    /// All aliases currently bound to a room.
    pub async fn list_room_aliases(&self, room_id: &RoomId) -> DirectoryResult<Vec<RoomAlias>> {
        Ok(self.db.aliases().list_for_room(room_id).await?)
    }
}
