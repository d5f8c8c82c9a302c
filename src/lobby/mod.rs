//! Roster management for the game room
//!
//! Handles:
//! - Player identity, lives and per-cycle letter coverage
//! - Join order (which is also turn order)
//! - Admin designation and promotion when the admin leaves

pub mod settings;

use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Minimum number of players to start a game
pub const MIN_PLAYERS: usize = 2;

/// Number of selectable avatars (cosmetic only)
pub const AVATAR_COUNT: u8 = 6;

/// Longest display name kept after trimming
pub const MAX_NAME_LEN: usize = 24;

/// The letters a player must cover to earn a bonus life
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Opaque connection identity, allocated by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Distinct A-Z letters used during the current alphabet cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterSet(BTreeSet<char>);

impl LetterSet {
    /// Add every alphabet letter of `canonical`, returning the ones that were
    /// new, in order of first appearance.
    pub fn absorb(&mut self, canonical: &str) -> Vec<char> {
        canonical
            .chars()
            .filter(|c| c.is_ascii_uppercase())
            .filter(|c| self.0.insert(*c))
            .collect()
    }

    /// Whether all 26 letters are covered
    pub fn is_complete(&self) -> bool {
        self.0.len() == ALPHABET.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
impl LetterSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(&letter)
    }
}

/// Outcome of crediting an accepted word to a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterGain {
    pub new_letters: Vec<char>,
    /// All 26 letters were covered; a life was added and the set reset
    pub bonus_granted: bool,
}

/// A player in the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub lives: u32,
    pub used_letters: LetterSet,
    pub avatar: u8,
}

impl Player {
    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Credit the letters of an accepted word, granting a bonus life when
    /// the alphabet is complete.
    pub fn credit_word(&mut self, canonical: &str) -> LetterGain {
        let new_letters = self.used_letters.absorb(canonical);
        let bonus_granted = self.used_letters.is_complete();
        if bonus_granted {
            self.lives += 1;
            self.used_letters.clear();
        }
        LetterGain {
            new_letters,
            bonus_granted,
        }
    }

    /// Take one life; returns the lives left
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

/// Ordered players plus the admin designation
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
    admin: Option<PlayerId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a player. The first player in an empty room becomes admin.
    /// Returns `None` if `id` is already seated.
    pub fn join<R: Rng>(
        &mut self,
        id: PlayerId,
        name: &str,
        lives: u32,
        rng: &mut R,
    ) -> Option<&Player> {
        if self.contains(id) {
            return None;
        }
        let name = display_name(name, self.players.len() + 1);
        if self.players.is_empty() {
            self.admin = Some(id);
        }
        self.players.push(Player {
            id,
            name,
            lives,
            used_letters: LetterSet::default(),
            avatar: rng.random_range(0..AVATAR_COUNT),
        });
        self.players.last()
    }

    /// Remove a player, returning their former slot. If they were admin the
    /// first remaining player is promoted. Absent ids are a no-op.
    pub fn remove(&mut self, id: PlayerId) -> Option<(usize, Player)> {
        let idx = self.index_of(id)?;
        let player = self.players.remove(idx);
        if self.admin == Some(id) {
            self.admin = self.players.first().map(|p| p.id);
        }
        Some((idx, player))
    }

    /// Restore lives and clear letter coverage for a new game
    pub fn reset_for_game(&mut self, lives: u32) {
        for player in &mut self.players {
            player.lives = lives;
            player.used_letters.clear();
        }
    }

    /// First living player strictly after slot `from`, wrapping around.
    /// Scans at most one full lap; `from` itself is checked last.
    pub fn next_living_after(&self, from: usize) -> Option<usize> {
        let len = self.players.len();
        (1..=len)
            .map(|step| (from + step) % len)
            .find(|&idx| self.players[idx].is_alive())
    }

    pub fn admin(&self) -> Option<PlayerId> {
        self.admin
    }

    pub fn is_admin(&self, id: PlayerId) -> bool {
        self.admin == Some(id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    #[cfg(test)]
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn at(&self, idx: usize) -> Option<&Player> {
        self.players.get(idx)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn living_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// The only living player, if exactly one remains
    pub fn sole_survivor(&self) -> Option<&Player> {
        let mut living = self.players.iter().filter(|p| p.is_alive());
        match (living.next(), living.next()) {
            (Some(p), None) => Some(p),
            _ => None,
        }
    }
}

/// Trimmed, length-capped name, or `Player N` when blank
fn display_name(raw: &str, seat: usize) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("Player {}", seat)
    } else {
        trimmed.chars().take(MAX_NAME_LEN).collect()
    }
}

/// Generate a random lobby name
pub fn generate_lobby_name() -> String {
    const ADJECTIVES: &[&str] = &[
        "LOUD", "HOT", "WILD", "FAST", "KEEN", "EPIC", "NOVA", "RED",
    ];
    const NOUNS: &[&str] = &[
        "FUSE", "BLAST", "SPARK", "FLARE", "BOOM", "DASH", "BOLT", "WICK",
    ];

    let mut rng = rand::rng();
    let adj = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    format!("{}-{}", adj, noun)
}
