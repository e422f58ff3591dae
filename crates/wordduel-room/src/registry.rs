//! Room registry: creates, tracks, and deletes rooms by code.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wordduel_protocol::{RoomCode, Slot};

use crate::code::sample_code;
use crate::{Room, RoomConfig, RoomError, WordProvider};

/// Owns every live room.
///
/// This is an ordinary value, not a process-wide global: the coordinator
/// owns one, and tests build as many isolated registries as they like.
pub struct RoomRegistry<W: WordProvider> {
    /// Live rooms, keyed by code.
    rooms: HashMap<RoomCode, Room>,

    /// Source of secret words for new rooms.
    words: W,

    config: RoomConfig,

    /// Randomness for code generation. Seedable for reproducible tests.
    rng: StdRng,
}

impl<W: WordProvider> RoomRegistry<W> {
    /// Creates an empty registry.
    ///
    /// # Errors
    /// Returns [`RoomError::InvalidAlphabet`] if the config's code
    /// alphabet is unusable.
    pub fn new(words: W, config: RoomConfig) -> Result<Self, RoomError> {
        Self::with_rng(words, config, StdRng::from_os_rng())
    }

    /// Like [`new`](Self::new), with a fixed seed so the sequence of
    /// generated codes is reproducible.
    pub fn with_seed(words: W, config: RoomConfig, seed: u64) -> Result<Self, RoomError> {
        Self::with_rng(words, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(words: W, config: RoomConfig, rng: StdRng) -> Result<Self, RoomError> {
        config.validate()?;
        Ok(Self {
            rooms: HashMap::new(),
            words,
            config,
            rng,
        })
    }

    /// Opens a new, empty room and returns its code.
    ///
    /// Candidate codes are drawn uniformly and redrawn until one is not
    /// held by a live room. The secret word is fetched once, here, and
    /// never changes afterwards.
    ///
    /// # Errors
    /// Returns [`RoomError::CodesExhausted`] if every code is already
    /// live, since redrawing could then never succeed.
    pub fn create_room(&mut self) -> Result<RoomCode, RoomError> {
        let space = self.config.code_space();
        if self.rooms.len() >= space {
            return Err(RoomError::CodesExhausted(space));
        }

        let code = loop {
            let candidate =
                RoomCode::parse(&sample_code(&mut self.rng, self.config.code_alphabet.as_bytes()))?;
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
            tracing::trace!(%candidate, "room code collision, redrawing");
        };

        let word = self.words.next_word().to_uppercase();
        self.rooms.insert(code.clone(), Room::new(code.clone(), word));
        tracing::info!(room_code = %code, rooms = self.rooms.len(), "room created");
        Ok(code)
    }

    /// Looks up a room.
    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Looks up a room for mutation.
    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Returns `true` if `code` names a live room.
    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    /// Read-only check of which slot a joiner would get.
    ///
    /// This is the lobby's pre-check, made before the joiner has a
    /// connection. It reserves nothing: the slot is only claimed later by
    /// `join_game`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — no live room with this code
    /// - [`RoomError::RoomFull`] — both slots occupied
    pub fn reserve_slot(&self, code: &RoomCode) -> Result<Slot, RoomError> {
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.to_string()))?;
        room.open_slot()
            .ok_or_else(|| RoomError::RoomFull(code.clone()))
    }

    /// Deletes a room, returning it if it existed.
    pub fn delete_room(&mut self, code: &RoomCode) -> Option<Room> {
        let removed = self.rooms.remove(code);
        if removed.is_some() {
            tracing::info!(room_code = %code, rooms = self.rooms.len(), "room deleted");
        }
        removed
    }

    /// Returns the number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if there are no live rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Lists every live room code.
    pub fn codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }

    /// The active configuration.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }
}
