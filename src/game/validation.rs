//! Word validation for a turn
//!
//! Validates a canonical submission against:
//! - The current challenge fragment (substring)
//! - Words already accepted this game
//! - Dictionary presence

use super::dictionary::Dictionary;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Why a submission was refused. Sent to the submitter only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Word does not contain the current fragment
    MissingFragment,
    /// Word was already accepted earlier in this game
    AlreadyUsed,
    /// Word not found in dictionary
    UnknownWord,
}

/// Validate a canonical word for the current turn
///
/// Checks in order:
/// 1. Contains `fragment`
/// 2. Not in `used`
/// 3. Exists in `dictionary`
pub fn validate_word(
    canonical: &str,
    fragment: &str,
    used: &HashSet<String>,
    dictionary: &Dictionary,
) -> Result<(), RejectReason> {
    if !canonical.contains(fragment) {
        return Err(RejectReason::MissingFragment);
    }
    if used.contains(canonical) {
        return Err(RejectReason::AlreadyUsed);
    }
    if !dictionary.contains(canonical) {
        return Err(RejectReason::UnknownWord);
    }
    Ok(())
}
