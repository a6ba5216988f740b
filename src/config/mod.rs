//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, DatabaseConfig)
//! - [`account_validity`]: The shape-polymorphic `account_validity` section
//!   and its normalization into an ordered module list

mod account_validity;
mod types;

pub use account_validity::{
    AccountValidityConfig, LegacyValidityConfig, ModuleDescriptor, ResolvedModule,
};
pub use types::{Config, ConfigError, DatabaseConfig, ServerConfig};
