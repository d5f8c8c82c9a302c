//! Dictionary module for word validation
//!
//! Holds the vocabulary as a set of canonical forms (see [`canonicalize`]),
//! built once at startup either from a word-list file or from the embedded
//! French list. Lookups are O(1) hash set membership.

use super::normalize::canonicalize;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Embedded fallback wordlist (French, one word per line, accents preserved)
static WORDS_DATA: &str = include_str!("../../data/words.txt");

/// Embedded dictionary, built on first use
static EMBEDDED: Lazy<Arc<Dictionary>> = Lazy::new(|| Arc::new(Dictionary::from_list(WORDS_DATA)));

/// Failure to build a vocabulary. Always fatal at startup.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read word list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("word list {0} contains no words")]
    Empty(String),
}

/// A fixed vocabulary of canonical word forms
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Build from newline-delimited text. Blank lines and `#` comments are skipped.
    pub fn from_list(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Build from an iterator of raw words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| canonicalize(w.as_ref())).collect(),
        }
    }

    /// Load a word list from disk. An unreadable or empty file is an error.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        let text = fs::read_to_string(path).map_err(|source| DictionaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = Self::from_list(&text);
        if dictionary.is_empty() {
            return Err(DictionaryError::Empty(path.display().to_string()));
        }
        Ok(dictionary)
    }

    /// The embedded French dictionary
    pub fn embedded() -> Arc<Dictionary> {
        Arc::clone(&EMBEDDED)
    }

    /// Check whether a canonical form is a known word.
    /// Anything not in the list is unknown.
    pub fn contains(&self, canonical: &str) -> bool {
        self.words.contains(canonical)
    }

    /// Returns the total number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_words() {
        let dict = Dictionary::embedded();
        assert!(dict.contains("MAISON"));
        assert!(dict.contains("ELEVE"));
        assert!(dict.contains("CHATEAU"));
        assert!(dict.len() > 400, "Expected 400+ words, got {}", dict.len());
    }

    #[test]
    fn test_lookup_expects_canonical_form() {
        let dict = Dictionary::from_words(["élève"]);
        assert!(dict.contains(&canonicalize("ELÈVE")));
        assert!(dict.contains(&canonicalize("eleve")));
        assert!(!dict.contains("élève"));
    }

    #[test]
    fn test_unknown_words() {
        let dict = Dictionary::from_words(["chat", "chien"]);
        assert!(!dict.contains("XYZZY"));
        assert!(!dict.contains(""));
    }

    #[test]
    fn test_from_list_skips_blanks_and_comments() {
        let dict = Dictionary::from_list("# header\nchat\n\n  chien  \n");
        assert_eq!(dict.len(), 2);
        assert!(dict.contains("CHIEN"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pomme\npoire").unwrap();
        let dict = Dictionary::load(file.path()).unwrap();
        assert!(dict.contains("POIRE"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = Dictionary::load(Path::new("/nonexistent/words.txt")).unwrap_err();
        assert!(matches!(err, DictionaryError::Read { .. }));
    }

    #[test]
    fn test_load_empty_file_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = Dictionary::load(file.path()).unwrap_err();
        assert!(matches!(err, DictionaryError::Empty(_)));
    }
}
