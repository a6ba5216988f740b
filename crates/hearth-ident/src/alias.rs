//! Room alias identifiers.

use crate::common::split_sigil;
use crate::error::IdentError;
use std::fmt;
use std::str::FromStr;

/// A human-readable room alias, e.g. `#lobby:hearth.example.org`.
///
/// An alias resolves to exactly one room ID at any instant; an alias with no
/// mapping does not exist as a record. The stored form is the full
/// `#localpart:server` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct RoomAlias {
    full: String,
    colon: usize,
}

impl RoomAlias {
    /// Sigil prefix for room aliases.
    pub const SIGIL: char = '#';

    /// View the complete alias as a string slice.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// The part between the sigil and the server name separator.
    pub fn localpart(&self) -> &str {
        &self.full[1..self.colon]
    }

    /// The homeserver the alias is scoped to.
    pub fn server_name(&self) -> &str {
        &self.full[self.colon + 1..]
    }
}

impl FromStr for RoomAlias {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (localpart, _server) = split_sigil(Self::SIGIL, s)?;
        Ok(RoomAlias {
            colon: 1 + localpart.len(),
            full: s.to_string(),
        })
    }
}

impl TryFrom<String> for RoomAlias {
    type Error = IdentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let (localpart, _server) = split_sigil(Self::SIGIL, &s)?;
        Ok(RoomAlias {
            colon: 1 + localpart.len(),
            full: s,
        })
    }
}

impl From<RoomAlias> for String {
    fn from(alias: RoomAlias) -> String {
        alias.full
    }
}

impl fmt::Display for RoomAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}
