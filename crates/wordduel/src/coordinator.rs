//! The session coordinator: one method per client event.
//!
//! Everything that changes room or binding state goes through here. The
//! coordinator is a plain struct with `&mut self` methods; the server
//! keeps it behind a single lock, so events are applied one at a time and
//! two events can never interleave on the same room.
//!
//! # Room lifecycle
//!
//! ```text
//! create_room ──→ Waiting ──(2nd slot joins)──→ Active ──(last player leaves)──→ deleted
//! ```
//!
//! # Error policy
//!
//! Only `join_game` and the lobby requests answer failures, with an
//! `error` event to the sender. Mid-game events from an unbound
//! connection, for a room that has gone away, or naming a bogus winner
//! are dropped silently.

use wordduel_protocol::{Board, ClientEvent, RoomCode, RoomView, ServerEvent, Slot};
use wordduel_room::{RoomError, RoomRegistry, WordProvider};
use wordduel_session::{Binding, ConnectionRegistry};
use wordduel_transport::ConnectionId;

use crate::outbox::{ChannelOutbox, EventReceiver, Outbox};

/// Behavior switches for the coordinator.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfig {
    /// Reject `join_game` for a slot already held by another live
    /// connection, answering `"Player slot already taken"`.
    ///
    /// Off by default: a second claimant silently takes over the slot,
    /// which is what deployed clients expect.
    pub reject_taken_slots: bool,
}

/// Binds connections to rooms and relays in-game events.
pub struct SessionCoordinator<W: WordProvider, O: Outbox = ChannelOutbox> {
    rooms: RoomRegistry<W>,
    connections: ConnectionRegistry,
    outbox: O,
    config: CoordinatorConfig,
}

impl<W: WordProvider, O: Outbox> SessionCoordinator<W, O> {
    /// Creates a coordinator around an existing registry and outbox.
    pub fn new(rooms: RoomRegistry<W>, outbox: O, config: CoordinatorConfig) -> Self {
        Self {
            rooms,
            connections: ConnectionRegistry::new(),
            outbox,
            config,
        }
    }

    /// The room registry (read-only).
    pub fn rooms(&self) -> &RoomRegistry<W> {
        &self.rooms
    }

    /// The connection registry (read-only).
    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// The outbox (read-only).
    pub fn outbox(&self) -> &O {
        &self.outbox
    }

    // -----------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------

    /// Applies one decoded client event from `connection`.
    ///
    /// Failures that the client should hear about are turned into an
    /// `error` event addressed to `connection`; everything else is
    /// logged and dropped.
    pub fn dispatch(&mut self, connection: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinGame {
                room_code,
                player_id,
                nickname,
            } => {
                if let Err(e) = self.join(connection, &room_code, &player_id, nickname) {
                    tracing::debug!(%connection, error = %e, "join rejected");
                    self.outbox
                        .send(connection, ServerEvent::error(e.client_message()));
                }
            }
            ClientEvent::UpdateScore { score } => self.score_update(connection, score),
            ClientEvent::UpdateBoard { board } => self.board_update(connection, board),
            ClientEvent::RequestPeek {} => self.peek_request(connection),
            ClientEvent::GameOver { winner_id } => self.game_over(connection, &winner_id),
            ClientEvent::CreateRoom {} => {
                let reply = self.create_room();
                self.reply_with_view(connection, reply);
            }
            ClientEvent::RequestJoin { room_code } => {
                let reply = self.request_join(&room_code);
                self.reply_with_view(connection, reply);
            }
        }
    }

    fn reply_with_view(&self, connection: ConnectionId, reply: Result<RoomView, RoomError>) {
        let event = match reply {
            Ok(view) => ServerEvent::RoomView(view),
            Err(e) => {
                tracing::debug!(%connection, error = %e, "lobby request rejected");
                ServerEvent::error(e.client_message())
            }
        };
        self.outbox.send(connection, event);
    }

    // -----------------------------------------------------------------
    // Lobby
    // -----------------------------------------------------------------

    /// Opens a new room. The creator is always seated in slot `"1"`.
    ///
    /// # Errors
    /// Returns [`RoomError::CodesExhausted`] if no code is free.
    pub fn create_room(&mut self) -> Result<RoomView, RoomError> {
        let code = self.rooms.create_room()?;
        Ok(RoomView::new(code, Slot::One))
    }

    /// Tells a would-be joiner which slot to claim.
    ///
    /// Read-only: nothing is reserved until the client sends `join_game`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — malformed code or no such room
    /// - [`RoomError::RoomFull`] — both slots taken
    pub fn request_join(&self, room_code: &str) -> Result<RoomView, RoomError> {
        let code =
            RoomCode::parse(room_code).map_err(|_| RoomError::NotFound(room_code.to_string()))?;
        let slot = self.rooms.reserve_slot(&code)?;
        Ok(RoomView::new(code, slot))
    }

    // -----------------------------------------------------------------
    // In-game events
    // -----------------------------------------------------------------

    /// Seats `connection` in `slot` of `room_code`.
    ///
    /// On success the room hears `player_joined`. If this fills the
    /// second slot, every member also gets `game_start` carrying the
    /// secret word and *their own* slot.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — no live room with this code
    /// - [`RoomError::InvalidSlot`] — slot is not `"1"` or `"2"`
    /// - [`RoomError::SlotTaken`] — only with
    ///   [`reject_taken_slots`](CoordinatorConfig::reject_taken_slots)
    pub fn join(
        &mut self,
        connection: ConnectionId,
        room_code: &str,
        slot: &str,
        nickname: Option<String>,
    ) -> Result<Slot, RoomError> {
        let code = RoomCode::parse(room_code)
            .ok()
            .filter(|code| code.as_str() == room_code && self.rooms.contains(code))
            .ok_or_else(|| RoomError::NotFound(room_code.to_string()))?;
        let slot: Slot = slot
            .parse()
            .map_err(|_| RoomError::InvalidSlot(slot.to_string()))?;

        if self.config.reject_taken_slots {
            let holder = self
                .rooms
                .get(&code)
                .and_then(|room| room.player(slot))
                .map(|player| player.connection);
            if holder.is_some_and(|holder| holder != connection) {
                return Err(RoomError::SlotTaken(code, slot));
            }
        }

        // A connection holds one seat at a time; give up the old one first.
        if let Some(previous) = self.connections.get(connection).cloned() {
            if previous.room_code != code || previous.slot != slot {
                let emptied = self.vacate_seat(connection, &previous);
                if emptied && previous.room_code != code {
                    self.delete_room(&previous.room_code);
                }
            }
        }

        let nickname = nickname.unwrap_or_else(|| slot.default_nickname());

        let room = self
            .rooms
            .get_mut(&code)
            .ok_or_else(|| RoomError::NotFound(room_code.to_string()))?;
        let was_started = room.is_started();
        if let Some(replaced) = room.seat(slot, connection, nickname.clone()) {
            if replaced.connection != connection {
                tracing::warn!(
                    room_code = %code,
                    %slot,
                    previous = %replaced.connection,
                    %connection,
                    "slot taken over by another connection"
                );
            }
        }
        let full = room.is_full();
        let word = room.word().to_string();
        if !was_started && room.is_started() {
            tracing::info!(room_code = %code, "game started");
        }

        self.connections
            .bind(connection, code.clone(), slot, nickname.clone());
        self.outbox.join_group(connection, &code);
        tracing::info!(room_code = %code, %slot, %connection, %nickname, "player joined");

        self.outbox.broadcast(
            &code,
            &ServerEvent::PlayerJoined {
                player_id: slot,
                nickname,
            },
        );

        if full {
            let connections = &self.connections;
            self.outbox.broadcast_with(&code, |member| {
                slot_in_room(connections, member, &code).map(|member_slot| ServerEvent::GameStart {
                    word: word.clone(),
                    player_id: member_slot,
                })
            });
        }

        Ok(slot)
    }

    /// Records the sender's score and broadcasts it to the whole room,
    /// sender included.
    pub fn score_update(&mut self, connection: ConnectionId, score: i64) {
        let Some((code, slot)) = self.seat_of(connection) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&code) else {
            tracing::debug!(%connection, room_code = %code, "score for vanished room dropped");
            return;
        };
        room.set_score(slot, score);
        self.outbox.broadcast(
            &code,
            &ServerEvent::ScoreUpdate {
                player_id: slot,
                score,
            },
        );
    }

    /// Stores the sender's board for later peeks. Nothing is broadcast.
    pub fn board_update(&mut self, connection: ConnectionId, board: Board) {
        let Some((code, slot)) = self.seat_of(connection) else {
            return;
        };
        let stored = self
            .rooms
            .get_mut(&code)
            .is_some_and(|room| room.set_board(slot, board));
        if !stored {
            tracing::debug!(%connection, room_code = %code, %slot, "board update dropped");
        }
    }

    /// Sends the opponent's latest board back to the requester only.
    ///
    /// If the opponent is absent or has not sent a board yet, nothing is
    /// sent at all.
    pub fn peek_request(&mut self, connection: ConnectionId) {
        let Some((code, slot)) = self.seat_of(connection) else {
            return;
        };
        let board = self
            .rooms
            .get(&code)
            .and_then(|room| room.peekable_board(slot.opponent()))
            .cloned();
        match board {
            Some(board) => self.outbox.send(connection, ServerEvent::ReceivePeek { board }),
            None => tracing::debug!(%connection, room_code = %code, "nothing to peek at"),
        }
    }

    /// Announces the winner. Each member's `game_result` says whether
    /// *they* won.
    pub fn game_over(&mut self, connection: ConnectionId, winner: &str) {
        let Some((code, _)) = self.seat_of(connection) else {
            return;
        };
        let Ok(winner) = winner.parse::<Slot>() else {
            tracing::debug!(%connection, winner, "game_over with invalid winner dropped");
            return;
        };
        if !self.rooms.contains(&code) {
            tracing::debug!(%connection, room_code = %code, "game_over for vanished room dropped");
            return;
        }

        tracing::info!(room_code = %code, %winner, "game over");
        let connections = &self.connections;
        self.outbox.broadcast_with(&code, |member| {
            slot_in_room(connections, member, &code)
                .map(|member_slot| ServerEvent::game_result(winner, member_slot))
        });
    }

    /// Tears down everything `connection` holds.
    ///
    /// Its slot is vacated, the remaining members hear `player_left`, and
    /// the room is deleted if that left it empty. The binding and the
    /// outbox queue are always released, even for unbound connections.
    pub fn disconnect(&mut self, connection: ConnectionId) {
        if let Some(binding) = self.connections.get(connection).cloned() {
            if self.vacate_seat(connection, &binding) {
                self.delete_room(&binding.room_code);
            }
            self.connections.unbind(connection);
        }
        self.outbox.release(connection);
        tracing::debug!(%connection, "connection released");
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    /// The sender's `(room, slot)`, or `None` (logged) if it is unbound.
    fn seat_of(&self, connection: ConnectionId) -> Option<(RoomCode, Slot)> {
        match self.connections.resolve(connection) {
            Ok(binding) => Some((binding.room_code.clone(), binding.slot)),
            Err(e) => {
                tracing::debug!(error = %e, "event dropped");
                None
            }
        }
    }

    /// Removes `connection` from the seat described by `binding`, takes it
    /// out of the room's group, and tells the rest of the room.
    ///
    /// Returns `true` if the room is now empty. Deleting it is left to the
    /// caller.
    fn vacate_seat(&mut self, connection: ConnectionId, binding: &Binding) -> bool {
        let code = &binding.room_code;
        self.outbox.leave_group(connection, code);

        let Some(room) = self.rooms.get_mut(code) else {
            return false;
        };
        room.vacate(binding.slot);
        let emptied = room.is_empty();
        tracing::info!(
            room_code = %code,
            slot = %binding.slot,
            %connection,
            remaining = room.player_count(),
            "player left"
        );

        self.outbox.broadcast(
            code,
            &ServerEvent::PlayerLeft {
                player_id: binding.slot,
            },
        );
        emptied
    }

    /// Deletes `code` and drops every binding and group membership still
    /// pointing at it, so a reused code starts clean.
    fn delete_room(&mut self, code: &RoomCode) {
        self.rooms.delete_room(code);
        for stale in self.connections.bound_to(code) {
            self.connections.unbind(stale);
            self.outbox.leave_group(stale, code);
            tracing::debug!(room_code = %code, connection = %stale, "stale binding dropped");
        }
    }
}

impl<W: WordProvider> SessionCoordinator<W, ChannelOutbox> {
    /// Registers a freshly accepted connection and returns the queue its
    /// outbound events will arrive on.
    pub fn connect(&mut self, connection: ConnectionId) -> EventReceiver {
        tracing::debug!(%connection, "connection attached");
        self.outbox.attach(connection)
    }
}

/// The slot `member` holds in `room`, if its binding points there.
fn slot_in_room(
    connections: &ConnectionRegistry,
    member: ConnectionId,
    room: &RoomCode,
) -> Option<Slot> {
    connections
        .get(member)
        .filter(|binding| binding.room_code == *room)
        .map(|binding| binding.slot)
}
