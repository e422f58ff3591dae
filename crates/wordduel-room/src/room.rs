//! A single match: its code, secret word, and the two seats.

use std::collections::BTreeMap;

use wordduel_protocol::{Board, RoomCode, Slot};
use wordduel_transport::ConnectionId;

use crate::RoomPhase;

/// The state of one occupied slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// The connection currently sitting in this slot.
    ///
    /// A lookup key into the connection registry, never an owner.
    pub connection: ConnectionId,

    /// Display name announced to the room.
    pub nickname: String,

    /// Mirrors the room's score entry for this slot.
    pub score: i64,

    /// Latest board snapshot, `None` until the first `update_board`.
    pub board: Option<Board>,
}

/// One word-duel match.
///
/// Invariants, all maintained by the methods below:
/// - `word` is fixed at creation;
/// - at most two players, one per [`Slot`];
/// - `started` goes false → true once and never back;
/// - `scores` always has an entry for both slots.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    word: String,
    players: BTreeMap<Slot, PlayerState>,
    started: bool,
    scores: BTreeMap<Slot, i64>,
}

impl Room {
    /// Creates an empty, not-yet-started room.
    pub fn new(code: RoomCode, word: String) -> Self {
        Self {
            code,
            word,
            players: BTreeMap::new(),
            started: false,
            scores: Slot::ALL.into_iter().map(|slot| (slot, 0)).collect(),
        }
    }

    /// The room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// The secret word.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Whether both slots have ever been filled at the same time.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Lifecycle phase derived from `started`.
    pub fn phase(&self) -> RoomPhase {
        if self.started {
            RoomPhase::Active
        } else {
            RoomPhase::Waiting
        }
    }

    /// The score recorded for `slot`.
    pub fn score(&self, slot: Slot) -> i64 {
        self.scores.get(&slot).copied().unwrap_or_default()
    }

    /// The player in `slot`, if occupied.
    pub fn player(&self, slot: Slot) -> Option<&PlayerState> {
        self.players.get(&slot)
    }

    /// All seated players, in slot order.
    pub fn players(&self) -> impl Iterator<Item = (Slot, &PlayerState)> {
        self.players.iter().map(|(slot, player)| (*slot, player))
    }

    /// Number of occupied slots.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// `true` when no slot is occupied; such a room should be deleted.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// `true` when both slots are occupied.
    pub fn is_full(&self) -> bool {
        self.players.len() == Slot::ALL.len()
    }

    /// The slot a newcomer would be given: `"1"` if free, else `"2"` if
    /// free, else `None`.
    pub fn open_slot(&self) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| !self.players.contains_key(slot))
    }

    /// Seats `connection` in `slot` with a fresh score and no board.
    ///
    /// Any player already in that slot is replaced and returned. When this
    /// fills the second slot the room becomes started.
    pub fn seat(
        &mut self,
        slot: Slot,
        connection: ConnectionId,
        nickname: String,
    ) -> Option<PlayerState> {
        let replaced = self.players.insert(
            slot,
            PlayerState {
                connection,
                nickname,
                score: 0,
                board: None,
            },
        );
        self.scores.insert(slot, 0);
        if self.is_full() {
            self.started = true;
        }
        replaced
    }

    /// Removes whoever sits in `slot`. Scores and `started` are untouched.
    pub fn vacate(&mut self, slot: Slot) -> Option<PlayerState> {
        self.players.remove(&slot)
    }

    /// Records a new score for `slot`, mirrored onto the player if seated.
    pub fn set_score(&mut self, slot: Slot, score: i64) {
        self.scores.insert(slot, score);
        if let Some(player) = self.players.get_mut(&slot) {
            player.score = score;
        }
    }

    /// Stores `board` verbatim for the player in `slot`.
    ///
    /// Returns `false` (and stores nothing) if the slot is empty.
    pub fn set_board(&mut self, slot: Slot, board: Board) -> bool {
        match self.players.get_mut(&slot) {
            Some(player) => {
                player.board = Some(board);
                true
            }
            None => false,
        }
    }

    /// The board a peek at `slot` would reveal: the stored snapshot, unless
    /// the slot is empty, nothing was stored yet, or the stored value is
    /// JSON `null`.
    pub fn peekable_board(&self, slot: Slot) -> Option<&Board> {
        self.players
            .get(&slot)
            .and_then(|player| player.board.as_ref())
            .filter(|board| !board.is_null())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn room() -> Room {
        Room::new(RoomCode::parse("ABCD").unwrap(), "CIGAR".into())
    }

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    #[test]
    fn test_new_room_is_empty_waiting_with_zero_scores() {
        let room = room();
        assert!(room.is_empty());
        assert!(!room.is_started());
        assert_eq!(room.phase(), RoomPhase::Waiting);
        assert_eq!(room.score(Slot::One), 0);
        assert_eq!(room.score(Slot::Two), 0);
        assert_eq!(room.word(), "CIGAR");
    }

    #[test]
    fn test_open_slot_prefers_one_then_two() {
        let mut room = room();
        assert_eq!(room.open_slot(), Some(Slot::One));

        room.seat(Slot::One, conn(1), "Al".into());
        assert_eq!(room.open_slot(), Some(Slot::Two));

        room.seat(Slot::Two, conn(2), "Bo".into());
        assert_eq!(room.open_slot(), None);
    }

    #[test]
    fn test_open_slot_returns_one_when_only_two_is_taken() {
        let mut room = room();
        room.seat(Slot::Two, conn(2), "Bo".into());
        assert_eq!(room.open_slot(), Some(Slot::One));
    }

    #[test]
    fn test_seat_second_slot_starts_room() {
        let mut room = room();
        room.seat(Slot::One, conn(1), "Al".into());
        assert!(!room.is_started());

        room.seat(Slot::Two, conn(2), "Bo".into());
        assert!(room.is_started());
        assert_eq!(room.phase(), RoomPhase::Active);
    }

    #[test]
    fn test_started_never_reverts_after_vacate() {
        let mut room = room();
        room.seat(Slot::One, conn(1), "Al".into());
        room.seat(Slot::Two, conn(2), "Bo".into());

        room.vacate(Slot::One);

        assert_eq!(room.player_count(), 1);
        assert!(room.is_started());
    }

    #[test]
    fn test_reseating_same_slot_twice_does_not_start() {
        let mut room = room();
        room.seat(Slot::One, conn(1), "Al".into());
        let replaced = room.seat(Slot::One, conn(2), "Bo".into());

        assert_eq!(replaced.map(|p| p.connection), Some(conn(1)));
        assert_eq!(room.player_count(), 1);
        assert!(!room.is_started());
    }

    #[test]
    fn test_set_score_mirrors_onto_player() {
        let mut room = room();
        room.seat(Slot::One, conn(1), "Al".into());

        room.set_score(Slot::One, 3);

        assert_eq!(room.score(Slot::One), 3);
        assert_eq!(room.player(Slot::One).unwrap().score, 3);
    }

    #[test]
    fn test_seat_resets_score() {
        let mut room = room();
        room.seat(Slot::One, conn(1), "Al".into());
        room.set_score(Slot::One, 5);

        room.seat(Slot::One, conn(1), "Al".into());

        assert_eq!(room.score(Slot::One), 0);
        assert_eq!(room.player(Slot::One).unwrap().score, 0);
    }

    #[test]
    fn test_set_board_on_empty_slot_is_refused() {
        let mut room = room();
        assert!(!room.set_board(Slot::Two, json!({"row": 0})));
        assert!(room.peekable_board(Slot::Two).is_none());
    }

    #[test]
    fn test_peekable_board_returns_latest_snapshot() {
        let mut room = room();
        room.seat(Slot::Two, conn(2), "Bo".into());
        assert!(room.peekable_board(Slot::Two).is_none());

        room.set_board(Slot::Two, json!({"row": 1}));
        room.set_board(Slot::Two, json!({"row": 2}));

        assert_eq!(room.peekable_board(Slot::Two), Some(&json!({"row": 2})));
    }

    #[test]
    fn test_peekable_board_hides_null() {
        let mut room = room();
        room.seat(Slot::Two, conn(2), "Bo".into());
        room.set_board(Slot::Two, serde_json::Value::Null);
        assert!(room.peekable_board(Slot::Two).is_none());
    }
}
