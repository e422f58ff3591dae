//! Connection bindings for Word Duel.
//!
//! A connection is anonymous until it sends `join_game`. From then until
//! it closes, it is *bound*: every later event it sends is attributed to
//! one room and one slot. This crate owns that association.
//!
//! # How it fits in the stack
//!
//! ```text
//! Coordinator (above)  ← resolves "who sent this?" on every event
//!     ↕
//! Session Layer (this crate)  ← ConnectionId → (room, slot, nickname)
//!     ↕
//! Protocol / Transport (below)  ← RoomCode, Slot, ConnectionId
//! ```

mod binding;
mod error;
mod registry;

pub use binding::Binding;
pub use error::SessionError;
pub use registry::ConnectionRegistry;
