//! Error types for the session layer.

use wordduel_transport::ConnectionId;

/// Errors that can occur while resolving a connection's binding.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection never joined a room, or has already left.
    ///
    /// Mid-game events from such a connection are dropped without a
    /// reply; callers usually just log this.
    #[error("connection {0} is not bound to a room")]
    Unbound(ConnectionId),
}
