//! # hearth-ident
//!
//! Identifier types for the Hearth chat homeserver.
//!
//! Every federated identifier shares the same shape: a one-character sigil,
//! a localpart, and the name of the homeserver the identifier was minted on,
//! e.g. `#lobby:hearth.example.org`. This crate provides parsed, validated
//! newtypes for each identifier class, plus the directory visibility enum
//! used by the room list endpoints.
//!
//! ## Quick start
//!
//! ```rust
//! use hearth_ident::{RoomAlias, RoomId, UserId};
//!
//! let alias: RoomAlias = "#lobby:hearth.example.org".parse().unwrap();
//! assert_eq!(alias.localpart(), "lobby");
//! assert_eq!(alias.server_name(), "hearth.example.org");
//!
//! // Missing sigil, empty localpart, or a bare name all fail to parse.
//! assert!("lobby:hearth.example.org".parse::<RoomAlias>().is_err());
//! assert!("#lobby".parse::<RoomAlias>().is_err());
//!
//! let user: UserId = "@ada:hearth.example.org".parse().unwrap();
//! let room: RoomId = "!qWkZdpS:hearth.example.org".parse().unwrap();
//! assert_eq!(user.to_string(), "@ada:hearth.example.org");
//! assert_ne!(room.server_name(), user.localpart());
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod alias;
pub mod error;
pub mod room;
pub mod server;
pub mod user;
pub mod visibility;

mod common;

pub use self::alias::RoomAlias;
pub use self::error::{IdentError, MAX_IDENT_LEN};
pub use self::room::RoomId;
pub use self::server::ServerName;
pub use self::user::UserId;
pub use self::visibility::Visibility;
