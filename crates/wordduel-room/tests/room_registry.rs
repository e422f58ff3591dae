//! Integration tests for the room registry.

use std::collections::HashSet;

use wordduel_protocol::{ROOM_CODE_LEN, RoomCode, Slot};
use wordduel_room::{RoomConfig, RoomError, RoomPhase, RoomRegistry, WordList};
use wordduel_transport::ConnectionId;

// =========================================================================
// Helpers
// =========================================================================

/// A registry whose every room gets the word "CIGAR".
fn registry() -> RoomRegistry<impl FnMut() -> String + Send + 'static> {
    RoomRegistry::with_seed(|| "cigar".to_string(), RoomConfig::default(), 42)
        .expect("default config is valid")
}

/// A registry drawing codes from a two-letter alphabet: only 16 codes.
fn tiny_registry(seed: u64) -> RoomRegistry<WordList> {
    RoomRegistry::with_seed(
        WordList::builtin(),
        RoomConfig {
            code_alphabet: "AB".into(),
        },
        seed,
    )
    .expect("tiny alphabet is valid")
}

fn conn(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn assert_well_formed(code: &RoomCode) {
    assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
    assert!(code.as_str().bytes().all(|b| b.is_ascii_uppercase()), "{code}");
}

// =========================================================================
// create_room()
// =========================================================================

#[test]
fn test_create_room_initial_state() {
    let mut rooms = registry();
    let code = rooms.create_room().unwrap();

    assert_well_formed(&code);
    let room = rooms.get(&code).expect("room should exist");
    assert_eq!(room.code(), &code);
    assert_eq!(room.word(), "CIGAR", "provider output is uppercased");
    assert!(room.is_empty());
    assert!(!room.is_started());
    assert_eq!(room.score(Slot::One), 0);
    assert_eq!(room.score(Slot::Two), 0);
}

#[test]
fn test_create_room_codes_are_unique() {
    let mut rooms = registry();
    let mut seen = HashSet::new();
    for _ in 0..500 {
        let code = rooms.create_room().unwrap();
        assert!(seen.insert(code), "duplicate live code");
    }
    assert_eq!(rooms.len(), 500);
}

#[test]
fn test_create_room_tiny_alphabet_fills_whole_code_space() {
    // 2^4 = 16 codes. Every one of them must be handed out before the
    // registry reports exhaustion; late draws collide almost every time.
    let mut rooms = tiny_registry(7);
    let mut seen = HashSet::new();
    for _ in 0..16 {
        let code = rooms.create_room().unwrap();
        assert_well_formed(&code);
        assert!(seen.insert(code));
    }
    assert!(matches!(
        rooms.create_room(),
        Err(RoomError::CodesExhausted(16))
    ));
}

#[test]
fn test_create_room_ten_thousand_with_collisions_never_duplicates() {
    // Keep the tiny code space nearly full and churn through it: every
    // draw after the first few collides, so the retry path runs constantly.
    let mut rooms = tiny_registry(1234);
    for i in 0..10_000usize {
        if rooms.len() == 15 {
            let victim = rooms.codes()[i % 15].clone();
            rooms.delete_room(&victim);
        }
        let live_before: HashSet<RoomCode> = rooms.codes().into_iter().collect();
        let code = rooms.create_room().unwrap();

        assert_well_formed(&code);
        assert!(
            !live_before.contains(&code),
            "iteration {i}: {code} was already live"
        );
        let live_after: HashSet<RoomCode> = rooms.codes().into_iter().collect();
        assert_eq!(live_after.len(), rooms.len());
    }
}

#[test]
fn test_codes_only_use_configured_alphabet() {
    let mut rooms = RoomRegistry::with_seed(
        WordList::builtin(),
        RoomConfig {
            code_alphabet: "XYZ".into(),
        },
        3,
    )
    .unwrap();
    for _ in 0..20 {
        let code = rooms.create_room().unwrap();
        assert!(code.as_str().bytes().all(|b| b"XYZ".contains(&b)));
    }
}

#[test]
fn test_new_rejects_invalid_alphabet() {
    let result = RoomRegistry::new(
        WordList::builtin(),
        RoomConfig {
            code_alphabet: "ab".into(),
        },
    );
    assert!(matches!(result, Err(RoomError::InvalidAlphabet(_))));
}

#[test]
fn test_word_is_fixed_for_room_lifetime() {
    let mut n = 0;
    let mut rooms = RoomRegistry::with_seed(
        move || {
            n += 1;
            format!("word{n}")
        },
        RoomConfig::default(),
        9,
    )
    .unwrap();

    let a = rooms.create_room().unwrap();
    let b = rooms.create_room().unwrap();
    let room_a = rooms.get_mut(&a).unwrap();
    room_a.seat(Slot::One, conn(1), "Al".into());
    room_a.seat(Slot::Two, conn(2), "Bo".into());

    assert_eq!(rooms.get(&a).unwrap().word(), "WORD1");
    assert_eq!(rooms.get(&b).unwrap().word(), "WORD2");
}

// =========================================================================
// reserve_slot()
// =========================================================================

#[test]
fn test_reserve_slot_unknown_room() {
    let rooms = registry();
    let code = RoomCode::parse("ZZZZ").unwrap();
    assert!(matches!(rooms.reserve_slot(&code), Err(RoomError::NotFound(c)) if c == "ZZZZ"));
}

#[test]
fn test_reserve_slot_progression() {
    let mut rooms = registry();
    let code = rooms.create_room().unwrap();

    assert_eq!(rooms.reserve_slot(&code).unwrap(), Slot::One);
    // Read-only: asking twice gives the same answer.
    assert_eq!(rooms.reserve_slot(&code).unwrap(), Slot::One);

    rooms
        .get_mut(&code)
        .unwrap()
        .seat(Slot::One, conn(1), "Al".into());
    assert_eq!(rooms.reserve_slot(&code).unwrap(), Slot::Two);

    rooms
        .get_mut(&code)
        .unwrap()
        .seat(Slot::Two, conn(2), "Bo".into());
    assert!(matches!(rooms.reserve_slot(&code), Err(RoomError::RoomFull(c)) if c == code));
}

#[test]
fn test_reserve_slot_after_slot_one_leaves() {
    let mut rooms = registry();
    let code = rooms.create_room().unwrap();
    let room = rooms.get_mut(&code).unwrap();
    room.seat(Slot::One, conn(1), "Al".into());
    room.seat(Slot::Two, conn(2), "Bo".into());
    room.vacate(Slot::One);

    assert_eq!(rooms.reserve_slot(&code).unwrap(), Slot::One);
    assert_eq!(rooms.get(&code).unwrap().phase(), RoomPhase::Active);
}

// =========================================================================
// delete_room()
// =========================================================================

#[test]
fn test_delete_room_removes_and_is_idempotent() {
    let mut rooms = registry();
    let code = rooms.create_room().unwrap();

    assert!(rooms.delete_room(&code).is_some());
    assert!(!rooms.contains(&code));
    assert!(rooms.delete_room(&code).is_none());
    assert!(rooms.is_empty());
}
