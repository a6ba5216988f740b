//! Authenticated caller identity.

use hearth_ident::{RoomAlias, UserId};
use regex::Regex;

/// A registered appservice (third-party bridging integration).
///
/// Appservices reserve alias namespaces at registration time; an alias is
/// "reserved" when any namespace pattern matches the full alias string.
#[derive(Debug, Clone)]
pub struct AppserviceIdentity {
    /// The appservice's registered ID.
    pub id: String,
    alias_namespaces: Vec<Regex>,
}

impl AppserviceIdentity {
    /// Create an appservice identity with no reserved namespaces.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alias_namespaces: Vec::new(),
        }
    }

    /// Reserve an alias namespace, given as an anchored regular expression
    /// over the full alias string (e.g. `^#bridge_.*:example\.org$`).
    pub fn with_alias_namespace(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.alias_namespaces.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Whether the appservice has reserved this alias.
    ///
    /// An appservice with no alias namespaces is interested in nothing.
    pub fn is_interested_in_alias(&self, alias: &RoomAlias) -> bool {
        self.alias_namespaces
            .iter()
            .any(|ns| ns.is_match(alias.as_str()))
    }
}

/// The authenticated caller of one directory operation.
///
/// Produced by the transport layer's auth collaborator; immutable for the
/// duration of the operation. The directory never parses credentials itself.
#[derive(Debug, Clone)]
pub struct Requester {
    /// The user the request is acting as.
    pub user: UserId,
    /// Present when the request was authenticated with appservice credentials.
    pub app_service: Option<AppserviceIdentity>,
    /// Whether the user is a server administrator.
    pub is_server_admin: bool,
}

impl Requester {
    /// An ordinary authenticated user.
    pub fn user(user: UserId) -> Self {
        Self {
            user,
            app_service: None,
            is_server_admin: false,
        }
    }

    /// A server administrator.
    pub fn admin(user: UserId) -> Self {
        Self {
            user,
            app_service: None,
            is_server_admin: true,
        }
    }

    /// A request made with appservice credentials.
    pub fn appservice(user: UserId, app_service: AppserviceIdentity) -> Self {
        Self {
            user,
            app_service: Some(app_service),
            is_server_admin: false,
        }
    }
}
