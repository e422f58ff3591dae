//! Core protocol types for Word Duel's wire format.
//!
//! Everything in this module is serialized to JSON text frames. The shapes
//! are fixed by the browser client, so each serde attribute below is load
//! bearing: renaming a variant or a field breaks the client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use crate::ProtocolError;

/// Length of every room code.
pub const ROOM_CODE_LEN: usize = 4;

/// `game_result` message for the recipient whose slot won.
pub const WINNER_MESSAGE: &str = "You won!";

/// `game_result` message for every other recipient.
pub const LOSER_MESSAGE: &str = "You lost!";

/// An opaque snapshot of a player's guess grid.
///
/// The server stores and forwards it verbatim and never looks inside.
pub type Board = serde_json::Value;

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// A player's position within a room.
///
/// There are exactly two. On the wire a slot is the string `"1"` or `"2"`
/// (the client calls it `player_id`), which the `rename` attributes map to
/// these variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Slot {
    /// The room creator's seat.
    #[serde(rename = "1")]
    One,
    /// The joining player's seat.
    #[serde(rename = "2")]
    Two,
}

impl Slot {
    /// Both slots, in seating order.
    pub const ALL: [Slot; 2] = [Slot::One, Slot::Two];

    /// Returns the other slot in the same room.
    pub fn opponent(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }

    /// The wire form: `"1"` or `"2"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::One => "1",
            Slot::Two => "2",
        }
    }

    /// Display name used when a player joins without a nickname.
    pub fn default_nickname(self) -> String {
        format!("Player {self}")
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clients send slots as free-form strings inside `join_game` and
/// `game_over`; parsing is where `"3"` or `""` gets rejected.
impl FromStr for Slot {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Slot::One),
            "2" => Ok(Slot::Two),
            other => Err(ProtocolError::InvalidSlot(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// A four-letter uppercase room identifier, e.g. `"QXZA"`.
///
/// Construction always goes through [`RoomCode::parse`], so a `RoomCode`
/// value is valid by type. `try_from = "String"` applies the same check
/// when a code is deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Parses user input into a room code.
    ///
    /// Surrounding whitespace is trimmed and letters are uppercased, so
    /// `" abcd "` becomes `ABCD`. Anything that is not then exactly
    /// [`ROOM_CODE_LEN`] ASCII letters is rejected.
    pub fn parse(input: &str) -> Result<Self, ProtocolError> {
        let code = input.trim().to_ascii_uppercase();
        if code.len() == ROOM_CODE_LEN && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code))
        } else {
            Err(ProtocolError::InvalidRoomCode(input.to_string()))
        }
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

// ---------------------------------------------------------------------------
// RoomView
// ---------------------------------------------------------------------------

/// The view parameters handed to a client by the lobby: which room it is
/// about to enter and which seat it should claim in `join_game`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub room_code: RoomCode,
    pub player_id: Slot,
    pub opponent_id: Slot,
}

impl RoomView {
    /// Builds the view for `slot`; the opponent is always the other slot.
    pub fn new(room_code: RoomCode, slot: Slot) -> Self {
        Self {
            room_code,
            player_id: slot,
            opponent_id: slot.opponent(),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Client → server events.
///
/// `#[serde(tag = "event", content = "data")]` produces adjacently tagged
/// JSON, the same envelope the browser client already emits:
///
/// ```text
/// { "event": "update_score", "data": { "score": 3 } }
/// ```
///
/// Slot-bearing fields stay raw strings here. Rejecting a bad slot is a
/// game rule (an `error` reply for `join_game`, silence for `game_over`),
/// not a decode failure, so a missing or non-string value decodes as `""`.
/// Likewise `data` may be omitted or `null` for events without a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Claim a slot in a room and start receiving its broadcasts.
    JoinGame {
        room_code: String,
        player_id: String,
        nickname: Option<String>,
    },

    /// Publish the sender's current score to the room.
    UpdateScore { score: i64 },

    /// Store the sender's board for a later peek. Not broadcast.
    UpdateBoard { board: Board },

    /// Ask for the opponent's latest board.
    RequestPeek {},

    /// Announce the winner of the round.
    GameOver { winner_id: String },

    /// Lobby: open a new room and get seated in slot `"1"`.
    CreateRoom {},

    /// Lobby: resolve which slot to claim in an existing room.
    RequestJoin { room_code: String },
}

/// Decoding rules for [`ClientEvent`]; see its docs.
#[derive(Deserialize)]
#[allow(dead_code)]
#[serde(remote = "ClientEvent", tag = "event", content = "data", rename_all = "snake_case")]
enum ClientEventDef {
    JoinGame {
        #[serde(default, deserialize_with = "string_or_empty")]
        room_code: String,
        #[serde(default, deserialize_with = "string_or_empty")]
        player_id: String,
        #[serde(default)]
        nickname: Option<String>,
    },
    UpdateScore {
        score: i64,
    },
    UpdateBoard {
        board: Board,
    },
    RequestPeek {},
    GameOver {
        #[serde(default, deserialize_with = "string_or_empty")]
        winner_id: String,
    },
    CreateRoom {},
    RequestJoin {
        room_code: String,
    },
}

impl<'de> Deserialize<'de> for ClientEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut frame: Map<String, Value> = Map::deserialize(deserializer)?;
        if frame.get("data").is_none_or(Value::is_null) {
            frame.insert("data".to_string(), Value::Object(Map::new()));
        }
        ClientEventDef::deserialize(Value::Object(frame)).map_err(de::Error::custom)
    }
}

/// A JSON string as-is; anything else (number, `null`, absent) as `""`.
fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A request from this connection was rejected.
    Error { message: String },

    /// Someone took a slot in the room.
    PlayerJoined { player_id: Slot, nickname: String },

    /// Both slots are filled. `player_id` is the recipient's own slot.
    GameStart { word: String, player_id: Slot },

    /// A player's score changed.
    ScoreUpdate { player_id: Slot, score: i64 },

    /// The opponent's board, sent only to the player who asked.
    ReceivePeek { board: Board },

    /// A player disconnected.
    PlayerLeft { player_id: Slot },

    /// The round is over. `message` is personalized per recipient.
    GameResult { winner_id: Slot, message: String },

    /// Lobby answer to `create_room` / `request_join`.
    RoomView(RoomView),
}

impl ServerEvent {
    /// Shorthand for an [`Error`](ServerEvent::Error) event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The `game_result` event as seen by a member sitting in `recipient`.
    pub fn game_result(winner: Slot, recipient: Slot) -> Self {
        let message = if winner == recipient {
            WINNER_MESSAGE
        } else {
            LOSER_MESSAGE
        };
        Self::GameResult {
            winner_id: winner,
            message: message.to_string(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The browser client parses these exact JSON shapes, so most tests
    //! assert on `serde_json::Value` fields rather than round-tripping.

    use serde_json::json;

    use super::*;

    // =====================================================================
    // Slot
    // =====================================================================

    #[test]
    fn test_slot_serializes_as_digit_string() {
        assert_eq!(serde_json::to_string(&Slot::One).unwrap(), "\"1\"");
        assert_eq!(serde_json::to_string(&Slot::Two).unwrap(), "\"2\"");
    }

    #[test]
    fn test_slot_parse_accepts_only_one_and_two() {
        assert_eq!("1".parse::<Slot>().unwrap(), Slot::One);
        assert_eq!("2".parse::<Slot>().unwrap(), Slot::Two);
        for bad in ["0", "3", "", " 1", "one"] {
            assert!(
                matches!(bad.parse::<Slot>(), Err(ProtocolError::InvalidSlot(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_slot_opponent_is_involution() {
        assert_eq!(Slot::One.opponent(), Slot::Two);
        assert_eq!(Slot::Two.opponent(), Slot::One);
        for slot in Slot::ALL {
            assert_eq!(slot.opponent().opponent(), slot);
        }
    }

    #[test]
    fn test_slot_default_nickname() {
        assert_eq!(Slot::Two.default_nickname(), "Player 2");
    }

    // =====================================================================
    // RoomCode
    // =====================================================================

    #[test]
    fn test_room_code_parse_normalizes_case_and_whitespace() {
        let code = RoomCode::parse("  abCd\n").unwrap();
        assert_eq!(code.as_str(), "ABCD");
        assert_eq!(code.to_string(), "ABCD");
    }

    #[test]
    fn test_room_code_parse_rejects_wrong_shape() {
        for bad in ["", "ABC", "ABCDE", "AB1D", "AB D", "ÄBCD"] {
            assert!(
                matches!(RoomCode::parse(bad), Err(ProtocolError::InvalidRoomCode(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let code = RoomCode::parse("WXYZ").unwrap();
        assert_eq!(serde_json::to_value(&code).unwrap(), json!("WXYZ"));
    }

    #[test]
    fn test_room_code_deserialize_validates() {
        assert!(serde_json::from_value::<RoomCode>(json!("WXYZ")).is_ok());
        assert!(serde_json::from_value::<RoomCode>(json!("TOOLONG")).is_err());
    }

    // =====================================================================
    // ClientEvent
    // =====================================================================

    #[test]
    fn test_join_game_decodes_with_nickname() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "join_game",
            "data": { "room_code": "ABCD", "player_id": "1", "nickname": "Al" }
        }))
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinGame {
                room_code: "ABCD".into(),
                player_id: "1".into(),
                nickname: Some("Al".into()),
            }
        );
    }

    #[test]
    fn test_join_game_nickname_is_optional() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "join_game",
            "data": { "room_code": "ABCD", "player_id": "2" }
        }))
        .unwrap();
        assert!(matches!(event, ClientEvent::JoinGame { nickname: None, .. }));
    }

    #[test]
    fn test_join_game_keeps_out_of_range_slot_for_validation() {
        // A bad slot must reach the coordinator so it can answer with
        // an `error` event.
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "join_game",
            "data": { "room_code": "ABCD", "player_id": "7" }
        }))
        .unwrap();
        assert!(matches!(event, ClientEvent::JoinGame { player_id, .. } if player_id == "7"));
    }

    #[test]
    fn test_update_board_keeps_payload_verbatim() {
        let board = json!({ "rows": [["C", "correct"], ["A", "absent"]], "row": 1 });
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "update_board",
            "data": { "board": board.clone() }
        }))
        .unwrap();
        assert_eq!(event, ClientEvent::UpdateBoard { board });
    }

    #[test]
    fn test_request_peek_decodes_from_empty_data() {
        let event: ClientEvent =
            serde_json::from_value(json!({ "event": "request_peek", "data": {} })).unwrap();
        assert_eq!(event, ClientEvent::RequestPeek {});
    }

    #[test]
    fn test_events_without_payload_decode_when_data_is_omitted_or_null() {
        let omitted: ClientEvent = serde_json::from_value(json!({ "event": "request_peek" })).unwrap();
        assert_eq!(omitted, ClientEvent::RequestPeek {});

        let null: ClientEvent =
            serde_json::from_value(json!({ "event": "create_room", "data": null })).unwrap();
        assert_eq!(null, ClientEvent::CreateRoom {});
    }

    #[test]
    fn test_join_game_missing_or_numeric_slot_decodes_as_empty() {
        let missing: ClientEvent = serde_json::from_value(json!({
            "event": "join_game",
            "data": { "room_code": "ABCD" }
        }))
        .unwrap();
        assert!(matches!(missing, ClientEvent::JoinGame { player_id, .. } if player_id.is_empty()));

        // The number 1 is not the slot "1".
        let numeric: ClientEvent = serde_json::from_value(json!({
            "event": "join_game",
            "data": { "room_code": 1234, "player_id": 1 }
        }))
        .unwrap();
        assert_eq!(
            numeric,
            ClientEvent::JoinGame {
                room_code: String::new(),
                player_id: String::new(),
                nickname: None,
            }
        );
    }

    #[test]
    fn test_game_over_missing_or_numeric_winner_decodes_as_empty() {
        for data in [json!({}), json!({ "winner_id": 3 }), json!({ "winner_id": null })] {
            let event: ClientEvent =
                serde_json::from_value(json!({ "event": "game_over", "data": data })).unwrap();
            assert_eq!(
                event,
                ClientEvent::GameOver {
                    winner_id: String::new()
                }
            );
        }
    }

    #[test]
    fn test_unknown_event_name_is_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_value(json!({ "event": "steal_word", "data": {} }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_score_requires_number() {
        let result: Result<ClientEvent, _> = serde_json::from_value(json!({
            "event": "update_score",
            "data": { "score": "lots" }
        }));
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerEvent
    // =====================================================================

    #[test]
    fn test_game_start_json_shape() {
        let event = ServerEvent::GameStart {
            word: "CIGAR".into(),
            player_id: Slot::Two,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "game_start", "data": { "word": "CIGAR", "player_id": "2" } })
        );
    }

    #[test]
    fn test_score_update_json_shape() {
        let event = ServerEvent::ScoreUpdate {
            player_id: Slot::One,
            score: 3,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "score_update", "data": { "player_id": "1", "score": 3 } })
        );
    }

    #[test]
    fn test_room_view_json_shape() {
        let view = RoomView::new(RoomCode::parse("ABCD").unwrap(), Slot::Two);
        assert_eq!(
            serde_json::to_value(ServerEvent::RoomView(view)).unwrap(),
            json!({
                "event": "room_view",
                "data": { "room_code": "ABCD", "player_id": "2", "opponent_id": "1" }
            })
        );
    }

    #[test]
    fn test_game_result_is_personalized() {
        assert_eq!(
            ServerEvent::game_result(Slot::One, Slot::One),
            ServerEvent::GameResult {
                winner_id: Slot::One,
                message: WINNER_MESSAGE.into()
            }
        );
        assert_eq!(
            ServerEvent::game_result(Slot::One, Slot::Two),
            ServerEvent::GameResult {
                winner_id: Slot::One,
                message: LOSER_MESSAGE.into()
            }
        );
    }

    #[test]
    fn test_error_helper() {
        assert_eq!(
            serde_json::to_value(ServerEvent::error("Room is full")).unwrap(),
            json!({ "event": "error", "data": { "message": "Room is full" } })
        );
    }
}
