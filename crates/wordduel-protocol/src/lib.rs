//! Wire protocol for Word Duel.
//!
//! This crate defines what the browser clients and the server say to each
//! other, and nothing else. It knows nothing about sockets, rooms, or who
//! is bound to what.
//!
//! - **Identifiers** ([`Slot`], [`RoomCode`]) — validated newtypes for the
//!   two strings every event revolves around.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — one enum per direction,
//!   encoded as `{"event": "<name>", "data": {...}}`.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — turns events into text
//!   frames and back.
//!
//! ```text
//! Transport (frames) → Protocol (events) → Coordinator (rooms + bindings)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    Board, ClientEvent, LOSER_MESSAGE, ROOM_CODE_LEN, RoomCode, RoomView, ServerEvent, Slot,
    WINNER_MESSAGE,
};
