//! Secret-word sources.
//!
//! The registry asks a [`WordProvider`] for one word per new room and
//! never looks at where it came from. [`WordList`] is the stock provider;
//! any `FnMut() -> String` closure works too, which is handy in tests.

use rand::seq::IndexedRandom;

use crate::RoomError;

/// Hands out one secret word per room.
///
/// `Send + 'static` because the provider lives inside the coordinator for
/// the lifetime of the server and the coordinator moves between tasks.
pub trait WordProvider: Send + 'static {
    /// Returns the secret word for a room that is being created.
    fn next_word(&mut self) -> String;
}

impl<F> WordProvider for F
where
    F: FnMut() -> String + Send + 'static,
{
    fn next_word(&mut self) -> String {
        self()
    }
}

/// Answers shipped with the server when no word file is supplied.
const BUILTIN_WORDS: &[&str] = &[
    "cigar", "rebut", "sissy", "humph", "awake", "blush", "focal", "evade", "naval", "serve",
    "heath", "rival", "untie", "refit", "aorta", "adult", "judge", "rower", "artsy", "rural",
    "shave",
];

/// A fixed list of candidate words, drawn uniformly at random.
///
/// Words are trimmed and uppercased on the way in, so the list always
/// yields uppercase words.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Builds a list from any collection of words.
    ///
    /// Blank entries are skipped.
    ///
    /// # Errors
    /// Returns [`RoomError::NoWords`] if nothing usable is left.
    pub fn new<I, S>(words: I) -> Result<Self, RoomError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Err(RoomError::NoWords);
        }
        Ok(Self { words })
    }

    /// Parses a word file: one word per line, `#` starts a comment line.
    ///
    /// # Errors
    /// Returns [`RoomError::NoWords`] if the file has no words.
    pub fn from_lines(text: &str) -> Result<Self, RoomError> {
        Self::new(text.lines().filter(|line| !line.trim_start().starts_with('#')))
    }

    /// The built-in answer list.
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS.iter().map(|w| w.to_uppercase()).collect(),
        }
    }

    /// Number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`: construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns `true` if `word` (case-insensitive) is on the list.
    pub fn contains(&self, word: &str) -> bool {
        let word = word.to_uppercase();
        self.words.iter().any(|w| *w == word)
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordProvider for WordList {
    fn next_word(&mut self) -> String {
        // The list is never empty, so `choose` always returns Some.
        self.words
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default()
    }
}
