//! Shared parsing helpers for sigil identifiers.

use crate::error::{IdentError, MAX_IDENT_LEN};
use crate::server;

/// Split `<sigil>localpart:server` into its localpart and server name.
///
/// The first ':' terminates the localpart, so server names carrying an
/// explicit port (`host:8448`) survive intact.
pub(crate) fn split_sigil(sigil: char, raw: &str) -> Result<(&str, &str), IdentError> {
    if raw.is_empty() {
        return Err(IdentError::Empty);
    }
    if raw.len() > MAX_IDENT_LEN {
        return Err(IdentError::TooLong(raw.len()));
    }

    let rest = raw
        .strip_prefix(sigil)
        .ok_or(IdentError::WrongSigil(sigil))?;
    let (localpart, server_name) = rest.split_once(':').ok_or(IdentError::MissingServerName)?;

    if localpart.is_empty() {
        return Err(IdentError::InvalidLocalpart);
    }
    if localpart
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(IdentError::InvalidLocalpart);
    }

    server::validate_server_name(server_name)?;

    Ok((localpart, server_name))
}
