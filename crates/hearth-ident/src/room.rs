//! Room identifiers.

use crate::common::split_sigil;
use crate::error::IdentError;
use std::fmt;
use std::str::FromStr;

/// An opaque room identifier, e.g. `!qWkZdpS:hearth.example.org`.
///
/// Unlike an alias, the localpart carries no meaning; it is minted by the
/// homeserver that created the room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct RoomId {
    full: String,
    colon: usize,
}

impl RoomId {
    /// Sigil prefix for room IDs.
    pub const SIGIL: char = '!';

    /// View the complete room ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// The opaque part between the sigil and the server name separator.
    pub fn localpart(&self) -> &str {
        &self.full[1..self.colon]
    }

    /// The homeserver that minted this room ID.
    pub fn server_name(&self) -> &str {
        &self.full[self.colon + 1..]
    }
}

impl FromStr for RoomId {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (localpart, _server) = split_sigil(Self::SIGIL, s)?;
        Ok(RoomId {
            colon: 1 + localpart.len(),
            full: s.to_string(),
        })
    }
}

impl TryFrom<String> for RoomId {
    type Error = IdentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (localpart, _server) = split_sigil(Self::SIGIL, &s)?;
        Ok(RoomId {
            colon: 1 + localpart.len(),
            full: s,
        })
    }
}

impl From<RoomId> for String {
    fn from(room_id: RoomId) -> String {
        room_id.full
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}
