//! Directory authorization decisions.
//!
//! A pure function from (requester, operation) to an allow/deny decision.
//! Mutating directory operations consult this before touching state; a
//! denial aborts the operation with `Forbidden` (or `BadRequest` for
//! namespace violations) before any write.

use super::requester::Requester;
use crate::error::DirectoryError;
use hearth_ident::{RoomAlias, UserId, Visibility};

/// A directory operation subject to authorization.
#[derive(Debug, Clone, Copy)]
pub enum DirectoryOp<'a> {
    /// Bind an alias to a room.
    CreateAlias {
        /// The alias being created.
        alias: &'a RoomAlias,
    },
    /// Remove an alias through the ordinary user path.
    DeleteAlias {
        /// Creator recorded on the alias.
        record_creator: &'a UserId,
    },
    /// Edit the global published room list.
    EditRoomList,
    /// Edit a per-appservice published room list.
    EditAppserviceRoomList {
        /// The visibility being written.
        visibility: Visibility,
    },
}

/// A positive authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed.
    Granted,
    /// The operation may proceed, pinned to one appservice namespace.
    ///
    /// An empty `appservice_id` is the sentinel for "no real appservice
    /// namespace" (an admin delisting).
    GrantedForAppservice {
        /// The namespace the write is scoped to.
        appservice_id: String,
    },
}

/// Decide whether `requester` may perform `op`.
pub fn decide(requester: &Requester, op: DirectoryOp<'_>) -> Result<Decision, DirectoryError> {
    match op {
        DirectoryOp::CreateAlias { alias } => {
            if let Some(service) = &requester.app_service
                && !service.is_interested_in_alias(alias)
            {
                return Err(DirectoryError::BadRequest(
                    "this application service has not reserved this alias".to_string(),
                ));
            }
            Ok(Decision::Granted)
        }

        DirectoryOp::DeleteAlias { record_creator } => {
            if requester.is_server_admin || requester.user == *record_creator {
                Ok(Decision::Granted)
            } else {
                Err(DirectoryError::Forbidden(
                    "you are not permitted to delete this alias".to_string(),
                ))
            }
        }

        // Room membership and power-level checks belong to the room
        // permissions collaborator; any authenticated user passes here.
        DirectoryOp::EditRoomList => Ok(Decision::Granted),

        DirectoryOp::EditAppserviceRoomList { visibility } => {
            if let Some(service) = &requester.app_service {
                // An appservice always writes to its own namespace; admins
                // cannot impersonate one.
                return Ok(Decision::GrantedForAppservice {
                    appservice_id: service.id.clone(),
                });
            }

            if requester.is_server_admin && visibility == Visibility::Private {
                // Admins may remove entries from an appservice room list but
                // never add them: listing requires a real namespace identity
                // that an admin request cannot supply.
                return Ok(Decision::GrantedForAppservice {
                    appservice_id: String::new(),
                });
            }

            Err(DirectoryError::Forbidden(
                "only appservices can edit the appservice published room list".to_string(),
            ))
        }
    }
}
