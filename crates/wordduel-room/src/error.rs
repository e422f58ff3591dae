//! Error types for the room layer.

use wordduel_protocol::{ProtocolError, RoomCode, Slot};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code. Holds the code as the client sent it.
    #[error("room {0:?} not found")]
    NotFound(String),

    /// The requested slot is not `"1"` or `"2"`.
    #[error("invalid player slot {0:?}")]
    InvalidSlot(String),

    /// Both slots are occupied.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The slot is held by another live connection.
    #[error("slot {1} in room {0} is already taken")]
    SlotTaken(RoomCode, Slot),

    /// Every possible code is in use by a live room.
    #[error("all {0} room codes are in use")]
    CodesExhausted(usize),

    /// The configured code alphabet is unusable.
    #[error("invalid room code alphabet: {0}")]
    InvalidAlphabet(String),

    /// A word list with no usable words.
    #[error("word list is empty")]
    NoWords,

    /// A generated code failed validation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl RoomError {
    /// The text shown to a player when this error answers their request.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Invalid room code",
            Self::InvalidSlot(_) => "Invalid player ID",
            Self::RoomFull(_) => "Room is full",
            Self::SlotTaken(..) => "Player slot already taken",
            Self::CodesExhausted(_) => "No rooms available, try again later",
            Self::InvalidAlphabet(_) | Self::NoWords | Self::Protocol(_) => "Server error",
        }
    }
}
