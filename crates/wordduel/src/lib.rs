//! # Word Duel
//!
//! Real-time room coordination for two-player word duels.
//!
//! Two browsers race to guess the same secret word. This crate does not
//! judge guesses; it pairs the players in a room, hands both the same
//! word, and relays scores, board peeks, and the final result between
//! them.
//!
//! ## Layers
//!
//! | Crate | Role |
//! |---|---|
//! | `wordduel-transport` | WebSocket accept/send/recv, connection ids |
//! | `wordduel-protocol` | JSON event shapes, room codes, slots |
//! | `wordduel-session` | which connection sits in which room and slot |
//! | `wordduel-room` | live rooms, code generation, secret words |
//! | `wordduel` | [`SessionCoordinator`], [`Outbox`], server loop |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wordduel::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), WordDuelError> {
//!     let server = WordDuelServerBuilder::new()
//!         .bind("0.0.0.0:5000")
//!         .build(WordList::builtin())
//!         .await?;
//!     server.run().await
//! }
//! ```

mod coordinator;
mod error;
mod handler;
mod outbox;
mod server;

pub use coordinator::{CoordinatorConfig, SessionCoordinator};
pub use error::WordDuelError;
pub use outbox::{ChannelOutbox, EventReceiver, EventSender, Outbox};
pub use server::{DEFAULT_BIND_ADDR, WordDuelServer, WordDuelServerBuilder};

pub use wordduel_protocol as protocol;
pub use wordduel_room as room;
pub use wordduel_session as session;
pub use wordduel_transport as transport;

/// Everything needed to run a server or drive a coordinator.
pub mod prelude {
    pub use crate::{
        ChannelOutbox, CoordinatorConfig, Outbox, SessionCoordinator, WordDuelError,
        WordDuelServer, WordDuelServerBuilder,
    };
    pub use wordduel_protocol::{ClientEvent, RoomCode, RoomView, ServerEvent, Slot};
    pub use wordduel_room::{RoomConfig, RoomError, RoomRegistry, WordList, WordProvider};
    pub use wordduel_transport::ConnectionId;
}
