//! The record tying one live connection to its seat.

use wordduel_protocol::{RoomCode, Slot};

/// Which room and slot a connection occupies, and under what name.
///
/// Created when `join_game` succeeds and dropped when the connection
/// closes. A connection has at most one binding at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The room the connection joined.
    pub room_code: RoomCode,

    /// The slot it claimed.
    pub slot: Slot,

    /// The nickname announced in `player_joined`.
    pub nickname: String,
}
