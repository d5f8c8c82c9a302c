//! Canonical word form used for every comparison
//!
//! Words are decomposed (NFD), stripped of combining marks and uppercased,
//! so "élève", "Eleve" and "ELÈVE" all compare equal.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Produce the canonical uppercase, diacritic-free form of `raw`.
pub fn canonicalize(raw: &str) -> String {
    raw.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}
