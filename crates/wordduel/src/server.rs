//! `WordDuelServer` builder and accept loop.
//!
//! This is the entry point for running a Word Duel server. It ties the
//! layers together: transport → protocol → session → room, with the
//! [`SessionCoordinator`] in the middle.

use std::sync::Arc;

use tokio::sync::Mutex;
use wordduel_protocol::{Codec, JsonCodec};
use wordduel_room::{RoomConfig, RoomRegistry, WordProvider};
use wordduel_transport::{Transport, WebSocketTransport};

use crate::coordinator::{CoordinatorConfig, SessionCoordinator};
use crate::handler::handle_connection;
use crate::outbox::ChannelOutbox;
use crate::WordDuelError;

/// Address used when [`WordDuelServerBuilder::bind`] is not called.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// coordinator sits behind one lock: every event, from every connection,
/// is applied in turn.
pub(crate) struct ServerState<W: WordProvider, C: Codec> {
    pub(crate) coordinator: Mutex<SessionCoordinator<W, ChannelOutbox>>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Word Duel server.
///
/// # Example
///
/// ```rust,no_run
/// use wordduel::prelude::*;
///
/// # async fn start() -> Result<(), WordDuelError> {
/// let server = WordDuelServerBuilder::new()
///     .bind("0.0.0.0:5000")
///     .build(WordList::builtin())
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct WordDuelServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    coordinator_config: CoordinatorConfig,
}

impl WordDuelServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            room_config: RoomConfig::default(),
            coordinator_config: CoordinatorConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration (code alphabet).
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the coordinator configuration.
    pub fn coordinator_config(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator_config = config;
        self
    }

    /// Binds the listener and assembles the server.
    ///
    /// Every new room takes its secret word from `words`.
    ///
    /// # Errors
    /// Fails if the room config is invalid or the address cannot be bound.
    pub async fn build<W: WordProvider>(
        self,
        words: W,
    ) -> Result<WordDuelServer<W, JsonCodec>, WordDuelError> {
        let rooms = RoomRegistry::new(words, self.room_config)?;
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let coordinator =
            SessionCoordinator::new(rooms, ChannelOutbox::new(), self.coordinator_config);
        let state = Arc::new(ServerState {
            coordinator: Mutex::new(coordinator),
            codec: JsonCodec,
        });

        Ok(WordDuelServer { transport, state })
    }
}

impl Default for WordDuelServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Word Duel server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct WordDuelServer<W: WordProvider, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<W, C>>,
}

impl<W, C> WordDuelServer<W, C>
where
    W: WordProvider,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Each accepted connection gets its own handler task. Runs until the
    /// process is terminated; a failed accept is logged and skipped.
    pub async fn run(mut self) -> Result<(), WordDuelError> {
        tracing::info!(addr = ?self.local_addr().ok(), "word duel server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
