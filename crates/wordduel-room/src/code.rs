//! Room-code sampling.
//!
//! Uniqueness is the registry's job; this module only draws candidates.

use rand::Rng;
use wordduel_protocol::ROOM_CODE_LEN;

/// Draws one candidate code: [`ROOM_CODE_LEN`] letters picked uniformly,
/// with replacement, from `alphabet`.
///
/// `alphabet` must be non-empty; [`RoomConfig::validate`](crate::RoomConfig::validate)
/// guarantees that before the registry ever calls this.
pub(crate) fn sample_code(rng: &mut impl Rng, alphabet: &[u8]) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect()
}
