//! Room configuration and lifecycle phase.

use serde::{Deserialize, Serialize};
use wordduel_protocol::ROOM_CODE_LEN;

use crate::RoomError;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// The full uppercase alphabet, the default source of room-code letters.
pub const DEFAULT_CODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Settings for the room registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Letters room codes are drawn from, uniformly and with replacement.
    ///
    /// Must be non-empty, uppercase ASCII, and free of repeats. Tests
    /// shrink it to force code collisions.
    pub code_alphabet: String,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            code_alphabet: DEFAULT_CODE_ALPHABET.to_string(),
        }
    }
}

impl RoomConfig {
    /// Checks that the alphabet can produce valid, uniformly drawn codes.
    ///
    /// # Errors
    /// Returns [`RoomError::InvalidAlphabet`] describing the first problem.
    pub fn validate(&self) -> Result<(), RoomError> {
        let letters = self.code_alphabet.as_bytes();
        if letters.is_empty() {
            return Err(RoomError::InvalidAlphabet("alphabet is empty".into()));
        }
        if let Some(bad) = letters.iter().find(|b| !b.is_ascii_uppercase()) {
            return Err(RoomError::InvalidAlphabet(format!(
                "{:?} is not an uppercase ASCII letter",
                char::from(*bad)
            )));
        }
        let mut seen = [false; 26];
        for b in letters {
            let idx = usize::from(b - b'A');
            if seen[idx] {
                return Err(RoomError::InvalidAlphabet(format!(
                    "{:?} appears more than once",
                    char::from(*b)
                )));
            }
            seen[idx] = true;
        }
        Ok(())
    }

    /// How many distinct codes the alphabet can produce.
    pub fn code_space(&self) -> usize {
        self.code_alphabet.len().saturating_pow(ROOM_CODE_LEN as u32)
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// Where a live room is in its lifecycle.
///
/// ```text
/// (created) → Waiting ──(second slot filled)──→ Active ──(last player leaves)──→ (deleted)
/// ```
///
/// There is no edge back from `Active` to `Waiting`: once both players
/// have been seated the room stays active even if one of them leaves.
/// The "empty" state has no variant because an empty room is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    /// Fewer than two players have been seated so far.
    Waiting,
    /// Both slots have been filled at least once.
    Active,
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Active => write!(f, "Active"),
        }
    }
}
