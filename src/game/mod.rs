//! Game logic: word rules, challenge fragments, timers and the turn engine

pub mod arbitrator;
pub mod dictionary;
pub mod engine;
pub mod event;
pub mod normalize;
pub mod timer;
pub mod validation;

pub use dictionary::{Dictionary, DictionaryError};
pub use engine::Game;
pub use event::Outbound;

use rand::prelude::*;

/// Syllables a word must contain, chosen uniformly each turn
pub const DEFAULT_FRAGMENTS: [&str; 24] = [
    "ON", "ENT", "RE", "ION", "TER", "QUE", "ME", "DE", "TE", "LE", "ANT", "SSE", "IE", "NE",
    "ES", "UR", "QU", "AR", "IN", "UI", "RA", "LA", "TI", "RI",
];

/// The pool of challenge fragments, stored in canonical form
#[derive(Debug, Clone)]
pub struct FragmentSet {
    fragments: Vec<String>,
}

impl FragmentSet {
    /// Build a set. Returns `None` if it would be empty or contain a blank fragment.
    #[cfg(test)]
    pub fn new<I, S>(fragments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fragments: Vec<String> = fragments
            .into_iter()
            .map(|f| normalize::canonicalize(f.as_ref().trim()))
            .collect();
        if fragments.is_empty() || fragments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self { fragments })
    }

    /// Pick a fragment uniformly at random. Repeats are allowed.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &str {
        // Non-empty by construction
        &self.fragments[rng.random_range(0..self.fragments.len())]
    }

    #[cfg(test)]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

impl Default for FragmentSet {
    fn default() -> Self {
        Self {
            fragments: DEFAULT_FRAGMENTS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use normalize::canonicalize;

    #[test]
    fn test_default_fragments_are_canonical() {
        for f in FragmentSet::default().fragments() {
            assert!(!f.is_empty());
            assert_eq!(f, &canonicalize(f));
        }
    }

    #[test]
    fn test_rejects_empty_sets() {
        assert!(FragmentSet::new(Vec::<String>::new()).is_none());
        assert!(FragmentSet::new(["ON", " "]).is_none());
    }

    #[test]
    fn test_custom_fragments_canonicalized() {
        let set = FragmentSet::new(["qué"]).unwrap();
        assert_eq!(set.fragments(), &["QUE".to_string()]);
    }

    #[test]
    fn test_pick_stays_in_set() {
        let set = FragmentSet::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let f = set.pick(&mut rng);
            assert!(DEFAULT_FRAGMENTS.contains(&f));
        }
    }

    #[test]
    fn test_seeded_pick_is_deterministic() {
        let set = FragmentSet::default();
        let mut rng1 = rand::rngs::StdRng::seed_from_u64(42);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(42);
        let a: Vec<String> = (0..10).map(|_| set.pick(&mut rng1).to_string()).collect();
        let b: Vec<String> = (0..10).map(|_| set.pick(&mut rng2).to_string()).collect();
        assert_eq!(a, b);
    }
}
