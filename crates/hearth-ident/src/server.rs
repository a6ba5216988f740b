//! Homeserver name handling.

use crate::error::{IdentError, MAX_IDENT_LEN};
use std::fmt;
use std::str::FromStr;

/// Validate a server name: a hostname or IP literal with an optional port.
///
/// This is deliberately permissive (DNS resolution policy belongs to the
/// federation layer); it only rejects names that could corrupt an identifier:
/// empty strings, whitespace, and control characters.
pub(crate) fn validate_server_name(s: &str) -> Result<(), IdentError> {
    if s.is_empty() || s.len() > MAX_IDENT_LEN {
        return Err(IdentError::InvalidServerName);
    }
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(IdentError::InvalidServerName);
    }
    Ok(())
}

/// The name of a homeserver, e.g. `hearth.example.org` or `hearth.example.org:8448`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ServerName(String);

impl ServerName {
    /// View the server name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ServerName {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_server_name(s)?;
        Ok(ServerName(s.to_string()))
    }
}

impl TryFrom<String> for ServerName {
    type Error = IdentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        validate_server_name(&s)?;
        Ok(ServerName(s))
    }
}

impl From<ServerName> for String {
    fn from(name: ServerName) -> String {
        name.0
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
