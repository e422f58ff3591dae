//! The connection registry: maps live connections to their bindings.
//!
//! # Concurrency note
//!
//! `ConnectionRegistry` is a plain `HashMap` wrapper with `&mut self`
//! mutators. It is owned by the coordinator, which is itself behind one
//! lock at the server level, so no internal locking is needed here.

use std::collections::HashMap;

use wordduel_protocol::{RoomCode, Slot};
use wordduel_transport::ConnectionId;

use crate::{Binding, SessionError};

/// Tracks which room and slot each live connection is bound to.
///
/// ```text
/// join_game ──→ bind() ──→ [Bound] ──→ unbind() on close
///                  ↑           │
///                  └─ rebind ──┘   (a second join_game overwrites)
/// ```
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    bindings: HashMap<ConnectionId, Binding>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `connection` to a seat, replacing any earlier binding.
    ///
    /// Returns the binding that was replaced, so the caller can release
    /// the old seat.
    pub fn bind(
        &mut self,
        connection: ConnectionId,
        room_code: RoomCode,
        slot: Slot,
        nickname: String,
    ) -> Option<Binding> {
        tracing::debug!(%connection, %room_code, %slot, "connection bound");
        self.bindings.insert(
            connection,
            Binding {
                room_code,
                slot,
                nickname,
            },
        )
    }

    /// Looks up the binding for `connection`.
    pub fn get(&self, connection: ConnectionId) -> Option<&Binding> {
        self.bindings.get(&connection)
    }

    /// Like [`get`](Self::get), but as a `Result` for `?`-style callers.
    ///
    /// # Errors
    /// Returns [`SessionError::Unbound`] if the connection has no binding.
    pub fn resolve(&self, connection: ConnectionId) -> Result<&Binding, SessionError> {
        self.get(connection).ok_or(SessionError::Unbound(connection))
    }

    /// Removes the binding for `connection`, if any.
    ///
    /// Idempotent: unbinding an unknown connection is a no-op.
    pub fn unbind(&mut self, connection: ConnectionId) -> Option<Binding> {
        let removed = self.bindings.remove(&connection);
        if removed.is_some() {
            tracing::debug!(%connection, "connection unbound");
        }
        removed
    }

    /// Returns every connection currently bound to `room_code`.
    pub fn bound_to(&self, room_code: &RoomCode) -> Vec<ConnectionId> {
        let mut connections: Vec<ConnectionId> = self
            .bindings
            .iter()
            .filter(|(_, binding)| binding.room_code == *room_code)
            .map(|(connection, _)| *connection)
            .collect();
        connections.sort();
        connections
    }

    /// Returns the number of bound connections.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if no connection is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
