//! Word arbitration for a game
//!
//! The server runs the arbiter to decide whether a submission is playable
//! and to remember every word accepted so far, so no word can be played
//! twice in the same game regardless of case or accents.

use super::dictionary::Dictionary;
use super::normalize::canonicalize;
use super::validation::{validate_word, RejectReason};
use std::collections::HashSet;
use std::sync::Arc;

/// Result of judging a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Word accepted and recorded
    Accepted {
        /// Canonical form that was recorded
        canonical: String,
    },
    Rejected(RejectReason),
}

/// Tracks used words for one game and judges submissions
pub struct WordArbiter {
    dictionary: Arc<Dictionary>,
    /// Canonical forms accepted since the last reset
    used_words: HashSet<String>,
}

impl WordArbiter {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self {
            dictionary,
            used_words: HashSet::new(),
        }
    }

    /// Judge an already trimmed `word` against `fragment`, recording it if accepted
    pub fn judge(&mut self, word: &str, fragment: &str) -> Verdict {
        let canonical = canonicalize(word);
        match validate_word(&canonical, fragment, &self.used_words, &self.dictionary) {
            Ok(()) => {
                self.used_words.insert(canonical.clone());
                Verdict::Accepted { canonical }
            }
            Err(reason) => Verdict::Rejected(reason),
        }
    }

    /// Forget every used word. Called exactly at game start.
    pub fn reset(&mut self) {
        self.used_words.clear();
    }

}

#[cfg(test)]
impl WordArbiter {
    pub fn used_words(&self) -> &HashSet<String> {
        &self.used_words
    }
}
