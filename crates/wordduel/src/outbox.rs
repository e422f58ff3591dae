//! Outbound delivery: unicast, room groups, and personalized broadcast.
//!
//! The coordinator decides *what* to send and *to whom*; an [`Outbox`]
//! only moves events. Keeping this behind a trait means the coordinator
//! can be driven in tests without any sockets.

use std::collections::{BTreeSet, HashMap};

use tokio::sync::mpsc;
use wordduel_protocol::{RoomCode, ServerEvent};
use wordduel_transport::ConnectionId;

/// Sending half of a connection's outbound event queue.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Receiving half, drained by the connection's handler task.
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// Delivers server events to connections and tracks room groups.
///
/// Every method is synchronous and must not block: the coordinator calls
/// these while holding the server-wide lock.
pub trait Outbox: Send + 'static {
    /// Queues `event` for one connection. Unknown connections are ignored.
    fn send(&self, to: ConnectionId, event: ServerEvent);

    /// Adds `connection` to the broadcast group of `room`.
    fn join_group(&mut self, connection: ConnectionId, room: &RoomCode);

    /// Removes `connection` from the broadcast group of `room`.
    fn leave_group(&mut self, connection: ConnectionId, room: &RoomCode);

    /// Current members of `room`'s group, in a stable order.
    fn members(&self, room: &RoomCode) -> Vec<ConnectionId>;

    /// Forgets `connection` entirely: every group and its queue.
    fn release(&mut self, connection: ConnectionId);

    /// Sends the same event to every member of `room`.
    fn broadcast(&self, room: &RoomCode, event: &ServerEvent) {
        for member in self.members(room) {
            self.send(member, event.clone());
        }
    }

    /// Sends each member of `room` an event built for that member.
    ///
    /// `build` sees the recipient's identity and may return `None` to
    /// skip it. This is how `game_start` and `game_result` carry the
    /// recipient's own slot instead of one shared payload.
    fn broadcast_with<F>(&self, room: &RoomCode, mut build: F)
    where
        F: FnMut(ConnectionId) -> Option<ServerEvent>,
        Self: Sized,
    {
        for member in self.members(room) {
            if let Some(event) = build(member) {
                self.send(member, event);
            }
        }
    }
}

/// An [`Outbox`] backed by one unbounded `mpsc` queue per connection.
///
/// The server attaches a queue when a socket is accepted and the
/// connection's handler task writes whatever arrives on it to the socket.
#[derive(Debug, Default)]
pub struct ChannelOutbox {
    senders: HashMap<ConnectionId, EventSender>,
    groups: HashMap<RoomCode, BTreeSet<ConnectionId>>,
}

impl ChannelOutbox {
    /// Creates an outbox with no connections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns the queue its events arrive on.
    ///
    /// Attaching the same connection again replaces its queue.
    pub fn attach(&mut self, connection: ConnectionId) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.insert(connection, tx);
        rx
    }

    /// Returns `true` if `connection` currently has a queue.
    pub fn is_attached(&self, connection: ConnectionId) -> bool {
        self.senders.contains_key(&connection)
    }

    /// Number of rooms with at least one group member.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl Outbox for ChannelOutbox {
    fn send(&self, to: ConnectionId, event: ServerEvent) {
        match self.senders.get(&to) {
            // A closed receiver means the handler already exited; the
            // disconnect path will clean up shortly.
            Some(sender) => {
                let _ = sender.send(event);
            }
            None => tracing::trace!(connection = %to, "dropping event for detached connection"),
        }
    }

    fn join_group(&mut self, connection: ConnectionId, room: &RoomCode) {
        self.groups.entry(room.clone()).or_default().insert(connection);
    }

    fn leave_group(&mut self, connection: ConnectionId, room: &RoomCode) {
        if let Some(members) = self.groups.get_mut(room) {
            members.remove(&connection);
            if members.is_empty() {
                self.groups.remove(room);
            }
        }
    }

    fn members(&self, room: &RoomCode) -> Vec<ConnectionId> {
        self.groups
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    fn release(&mut self, connection: ConnectionId) {
        self.senders.remove(&connection);
        self.groups.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
    }
}
