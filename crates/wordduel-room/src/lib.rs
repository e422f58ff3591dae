//! Room registry for Word Duel.
//!
//! A room is one match: a four-letter code, a secret word, and up to two
//! seated players. Rooms live in a [`RoomRegistry`] owned by the
//! coordinator; nothing here is global.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates, looks up, and deletes rooms
//! - [`Room`] / [`PlayerState`] — one match and its seats
//! - [`RoomPhase`] — `Waiting` → `Active` lifecycle
//! - [`WordProvider`] / [`WordList`] — where secret words come from
//! - [`RoomConfig`] — room-code alphabet

mod code;
mod config;
mod error;
mod registry;
mod room;
mod word;

pub use config::{RoomConfig, RoomPhase};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{PlayerState, Room};
pub use word::{WordList, WordProvider};
