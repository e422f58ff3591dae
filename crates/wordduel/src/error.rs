//! Unified error type for the Word Duel server.

use wordduel_protocol::ProtocolError;
use wordduel_room::RoomError;
use wordduel_session::SessionError;
use wordduel_transport::TransportError;

/// Top-level error that wraps every layer's error.
///
/// `#[from]` on each variant lets `?` lift sub-crate errors without
/// explicit `map_err`.
#[derive(Debug, thiserror::Error)]
pub enum WordDuelError {
    /// Socket-level failure (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encode/decode failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Event from a connection that is not bound to a room.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Room lookup, slot, or configuration failure.
    #[error(transparent)]
    Room(#[from] RoomError),
}
