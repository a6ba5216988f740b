//! Account validity policy modules.
//!
//! Account expiry is decided by an ordered chain of pluggable modules,
//! assembled once at startup from configuration and never mutated at
//! runtime. This module is split into logical submodules:
//! - [`chain`]: the evaluation chain (first decisive answer wins)
//! - [`loader`]: the registry mapping descriptor identifiers to factories
//! - [`legacy`]: the built-in module synthesized from the deprecated
//!   single-policy configuration shape

mod chain;
mod legacy;
mod loader;

pub use chain::PolicyModuleChain;
pub use legacy::LegacyAccountValidity;
pub use loader::{ModuleContext, ModuleRegistry};

use crate::db::DbError;
use async_trait::async_trait;
use hearth_ident::UserId;
use thiserror::Error;

/// Errors raised by account validity modules.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A module call failed outright.
    #[error("module {module}: {message}")]
    Module {
        /// Name of the failing module.
        module: String,
        /// What went wrong.
        message: String,
    },

    /// Underlying storage failure, propagated verbatim.
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// An account validity policy module.
///
/// Modules are trait objects assembled into a [`PolicyModuleChain`] at
/// startup. A module answers an expiry check decisively with `Some(expired)`
/// or passes with `None`, in which case the next module in configured order
/// is consulted. A module that fails while it would have been the decisive
/// one returns `Err` instead, which the chain surfaces to the caller.
#[async_trait]
pub trait AccountValidityModule: Send + Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &str;

    /// Whether the user's account has expired, if this module can tell.
    async fn user_expired(&self, user_id: &UserId) -> Result<Option<bool>, PolicyError>;

    /// Called after every successful registration.
    async fn on_user_registration(&self, user_id: &UserId) -> Result<(), PolicyError>;
}

impl std::fmt::Debug for dyn AccountValidityModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountValidityModule")
            .field("name", &self.name())
            .finish()
    }
}
