//! Error types for identifier parsing.

use thiserror::Error;

/// Maximum length of a complete identifier, in bytes.
pub const MAX_IDENT_LEN: usize = 255;

/// Errors produced when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IdentError {
    /// The input was empty.
    #[error("identifier is empty")]
    Empty,

    /// The identifier does not start with the expected sigil.
    #[error("expected leading '{0}'")]
    WrongSigil(char),

    /// The identifier is longer than [`MAX_IDENT_LEN`] bytes.
    #[error("identifier is {0} bytes, limit is {MAX_IDENT_LEN}")]
    TooLong(usize),

    /// No ':' separates the localpart from the server name.
    #[error("missing server name")]
    MissingServerName,

    /// The localpart is empty or contains a forbidden character.
    #[error("invalid localpart")]
    InvalidLocalpart,

    /// The server name is empty or contains a forbidden character.
    #[error("invalid server name")]
    InvalidServerName,

    /// Unknown visibility keyword.
    #[error("unknown visibility {0:?}")]
    UnknownVisibility(String),
}
