//! Account validity configuration.
//!
//! The `account_validity` value is shape-polymorphic: a table configures the
//! deprecated single-policy implementation, a list of `{ module, config }`
//! descriptors configures the module chain. The shapes are mutually
//! exclusive and both normalize to a module chain here, with the legacy form
//! synthesized as a one-element chain; downstream code never branches on
//! which shape was given.

use super::types::ConfigError;
use serde::Deserialize;
use std::sync::Once;
use tracing::warn;

static LEGACY_WARNING: Once = Once::new();

const LEGACY_ACCOUNT_VALIDITY_IN_USE: &str = "\
The account_validity section is using the deprecated single-policy form. \
Configure one or more account validity modules instead; the legacy form \
will be removed in a future release.";

/// The raw `account_validity` section, as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AccountValidityConfig {
    /// A list of module descriptors, evaluated in order.
    Modules(Vec<ModuleDescriptor>),
    /// The deprecated single-policy scalar form.
    Legacy(LegacyValidityConfig),
}

/// One `{ module, config }` descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDescriptor {
    /// Registered module identifier.
    pub module: String,
    /// Opaque module configuration, passed to the module's factory.
    #[serde(default)]
    pub config: toml::Table,
}

/// The deprecated scalar configuration shape.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyValidityConfig {
    /// Whether the built-in policy is active.
    #[serde(default)]
    pub enabled: bool,
    /// Validity period in seconds.
    pub period: Option<u64>,
    /// Seconds before expiry at which a renewal reminder becomes due.
    pub renew_at: Option<u64>,
    /// Subject line for renewal reminder emails.
    #[serde(default = "default_renew_email_subject")]
    pub renew_email_subject: String,
}

fn default_renew_email_subject() -> String {
    "Renew your %(app)s account".to_string()
}

/// One entry of the normalized module chain.
#[derive(Debug, Clone)]
pub enum ResolvedModule {
    /// The built-in policy synthesized from the legacy shape.
    Legacy(LegacyValidityConfig),
    /// A module resolved by name through the registry.
    Registered {
        /// Registered module identifier.
        module: String,
        /// Opaque module configuration.
        config: toml::Table,
    },
}

/// Normalize the section into an ordered module list.
///
/// The legacy shape emits a one-shot deprecation warning and validates its
/// scalar fields; renewal emails are implied by `renew_at` even when the
/// policy itself is disabled, and require a public base URL.
pub(super) fn resolve(
    config: Option<&AccountValidityConfig>,
    public_baseurl: Option<&str>,
) -> Result<Vec<ResolvedModule>, ConfigError> {
    let Some(config) = config else {
        return Ok(Vec::new());
    };

    match config {
        AccountValidityConfig::Modules(descriptors) => Ok(descriptors
            .iter()
            .map(|d| ResolvedModule::Registered {
                module: d.module.clone(),
                config: d.config.clone(),
            })
            .collect()),

        AccountValidityConfig::Legacy(legacy) => {
            LEGACY_WARNING.call_once(|| warn!("{}", LEGACY_ACCOUNT_VALIDITY_IN_USE));

            if legacy.enabled && legacy.period.is_none() {
                return Err(ConfigError::MissingValidityPeriod);
            }
            if legacy.renew_at.is_some() && public_baseurl.is_none() {
                return Err(ConfigError::MissingPublicBaseurl);
            }
            if !legacy.enabled {
                return Ok(Vec::new());
            }

            Ok(vec![ResolvedModule::Legacy(legacy.clone())])
        }
    }
}
