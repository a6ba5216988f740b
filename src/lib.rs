//! # hearth-directory
//!
//! Room alias resolution, directory publication, and account validity policy
//! for the Hearth chat homeserver.
//!
//! This crate is the storage-backed core behind the client directory
//! endpoints: it maps human-readable room aliases to opaque room IDs, tracks
//! which rooms are advertised in the public and per-appservice directory
//! listings, and evaluates an ordered chain of pluggable account validity
//! modules. The transport layer, credential validation, and federation
//! replication live in the surrounding server; they reach this crate with an
//! already-authenticated [`Requester`](directory::Requester) and parsed
//! request fields.

#![deny(clippy::all)]

pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod metrics;
pub mod policy;

pub use config::{Config, ConfigError};
pub use db::{Database, DbError};
pub use directory::{
    AliasDirectory, AliasRecord, AppserviceIdentity, Decision, DirectoryOp, PublicationRegistry,
    PublicationScope, Requester, RoomStore,
};
pub use error::DirectoryError;
pub use policy::{
    AccountValidityModule, ModuleContext, ModuleRegistry, PolicyError, PolicyModuleChain,
};

pub use hearth_ident::{RoomAlias, RoomId, ServerName, UserId, Visibility};
