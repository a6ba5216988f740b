//! Room directory visibility.

use crate::error::IdentError;
use std::fmt;
use std::str::FromStr;

/// Whether a room is advertised in a directory listing.
///
/// Absence of a publication entry for a room in a given scope reads as
/// [`Visibility::Private`]; writing `Private` removes the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Visibility {
    /// Listed in the directory.
    Public,
    /// Not listed in the directory.
    Private,
}

impl Visibility {
    /// Wire keyword for this visibility.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    /// True for [`Visibility::Public`].
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(IdentError::UnknownVisibility(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_round_trip() {
        assert_eq!("public".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!("private".parse::<Visibility>().unwrap(), Visibility::Private);
        assert_eq!(Visibility::Public.as_str(), "public");
        assert!("hidden".parse::<Visibility>().is_err());
    }
}
