//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or validating wire data.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing an event failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame is not valid JSON, or does not match any known event.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room code that is not exactly four ASCII letters.
    #[error("invalid room code: {0:?}")]
    InvalidRoomCode(String),

    /// A player slot other than `"1"` or `"2"`.
    #[error("invalid player slot: {0:?}")]
    InvalidSlot(String),
}
