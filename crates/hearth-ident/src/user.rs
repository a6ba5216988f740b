//! User identifiers.

use crate::common::split_sigil;
use crate::error::IdentError;
use std::fmt;
use std::str::FromStr;

/// Characters permitted in a user localpart.
///
/// The restricted grammar (lowercase letters, digits, and a small set of
/// punctuation) keeps user IDs case-insensitively unique across federation.
fn is_localpart_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '=' | '-' | '/')
}

/// A user identifier, e.g. `@ada:hearth.example.org`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct UserId {
    full: String,
    colon: usize,
}

impl UserId {
    /// Sigil prefix for user IDs.
    pub const SIGIL: char = '@';

    /// View the complete user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// The part between the sigil and the server name separator.
    pub fn localpart(&self) -> &str {
        &self.full[1..self.colon]
    }

    /// The homeserver this user is registered on.
    pub fn server_name(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    fn parse(s: &str) -> Result<usize, IdentError> {
        let (localpart, _server) = split_sigil(Self::SIGIL, s)?;
        if !localpart.chars().all(is_localpart_char) {
            return Err(IdentError::InvalidLocalpart);
        }
        Ok(1 + localpart.len())
    }
}

impl FromStr for UserId {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colon = Self::parse(s)?;
        Ok(UserId {
            colon,
            full: s.to_string(),
        })
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let colon = Self::parse(&s)?;
        Ok(UserId { colon, full: s })
    }
}

impl From<UserId> for String {
    fn from(user_id: UserId) -> String {
        user_id.full
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}
