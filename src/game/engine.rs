//! The turn engine
//!
//! [`Game`] owns the roster, settings, used words and the bomb timer. Every
//! command and every timer firing runs to completion and returns the events
//! to deliver; nothing else mutates game state.
//!
//! ```text
//!            start                  word accepted / aftermath
//!   Idle ───────────▶ Playing ◀──────────────────────────┐
//!    ▲                   │ countdown fires                │
//!    │                   ▼                                │
//!    └──── game over ─ Resolving ─────────────────────────┘
//! ```

use super::arbitrator::{Verdict, WordArbiter};
use super::dictionary::Dictionary;
use super::event::{GameEvent, Outbound};
use super::timer::{Scheduler, TimerKind, TimerToken};
use super::FragmentSet;
use crate::lobby::settings::{GameSettings, SettingsPatch, SettingsRejection};
use crate::lobby::{PlayerId, Roster, MIN_PLAYERS};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Pause between an explosion and the next turn
pub const EXPLOSION_PAUSE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Turn {
    holder: PlayerId,
    fragment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    /// The holder may submit words until the countdown fires
    Playing(Turn),
    /// The bomb went off; waiting out the pause
    Resolving(Turn),
}

/// The single game room
pub struct Game {
    roster: Roster,
    settings: GameSettings,
    arbiter: WordArbiter,
    fragments: FragmentSet,
    phase: Phase,
    /// Roster slot of the current (or last) turn-holder
    cursor: usize,
    scheduler: Scheduler,
    rng: StdRng,
}

impl Game {
    pub fn new(dictionary: Arc<Dictionary>, settings: GameSettings) -> Self {
        Self::with_rng(dictionary, settings, StdRng::from_os_rng())
    }

    /// Create a game with a specific RNG (for testing/seeding)
    pub fn with_rng(dictionary: Arc<Dictionary>, settings: GameSettings, rng: StdRng) -> Self {
        Self {
            roster: Roster::new(),
            settings,
            arbiter: WordArbiter::new(dictionary),
            fragments: FragmentSet::default(),
            phase: Phase::Idle,
            cursor: 0,
            scheduler: Scheduler::new(),
            rng,
        }
    }

    /// A connection opened: it gets the current settings
    pub fn connect(&self, id: PlayerId) -> Vec<Outbound> {
        info!(%id, "connection opened");
        vec![Outbound::to(
            id,
            GameEvent::Settings {
                settings: self.settings,
            },
        )]
    }

    pub fn join(&mut self, id: PlayerId, name: &str) -> Vec<Outbound> {
        let lives = self.settings.initial_lives;
        let Some(player) = self.roster.join(id, name, lives, &mut self.rng) else {
            debug!(%id, "duplicate join ignored");
            return Vec::new();
        };
        let player = player.clone();
        info!(%id, name = %player.name, "player joined");
        if self.roster.is_admin(id) {
            info!(%id, name = %player.name, "admin assigned");
        }
        vec![
            self.roster_changed(),
            Outbound::to(id, GameEvent::Welcome { player }),
        ]
    }

    /// A connection closed. Unknown ids are a no-op.
    pub fn disconnect(&mut self, id: PlayerId) -> Vec<Outbound> {
        let admin_before = self.roster.admin();
        let Some((slot, player)) = self.roster.remove(id) else {
            return Vec::new();
        };
        info!(%id, name = %player.name, "player left");
        if self.roster.admin() != admin_before {
            if let Some(admin) = self.roster.admin() {
                info!(id = %admin, "admin promoted");
            }
        }

        let mut out = vec![self.roster_changed()];
        if self.phase == Phase::Idle {
            return out;
        }

        // Keep the cursor on the seat that follows the removed one
        if slot < self.cursor {
            self.cursor -= 1;
        } else if slot == self.cursor && !self.roster.is_empty() {
            let len = self.roster.len();
            self.cursor = (slot + len - 1) % len;
        }

        if self.roster.living_count() < MIN_PLAYERS {
            info!("game aborted, not enough players");
            self.scheduler.cancel();
            self.phase = Phase::Idle;
            out.push(Outbound::broadcast(GameEvent::GameAborted));
            return out;
        }

        if matches!(&self.phase, Phase::Playing(turn) if turn.holder == id) {
            debug!(%id, "turn-holder left, passing the bomb");
            self.advance_turn(&mut out);
        }
        out
    }

    pub fn update_settings(
        &mut self,
        requester: PlayerId,
        patch: &SettingsPatch,
    ) -> Result<Vec<Outbound>, SettingsRejection> {
        if !self.roster.is_admin(requester) {
            return Err(SettingsRejection::NotAdmin);
        }
        if self.is_active() {
            return Err(SettingsRejection::GameActive);
        }
        self.settings = self.settings.merged(patch)?;
        info!(settings = ?self.settings, "settings updated");
        Ok(vec![Outbound::broadcast(GameEvent::Settings {
            settings: self.settings,
        })])
    }

    /// Start a game. Only the admin may, only from idle, with at least two players.
    pub fn start(&mut self, requester: PlayerId) -> Vec<Outbound> {
        if !self.roster.is_admin(requester) {
            debug!(id = %requester, "start ignored, not admin");
            return Vec::new();
        }
        if self.is_active() {
            debug!("start ignored, game already running");
            return Vec::new();
        }
        if self.roster.len() < MIN_PLAYERS {
            debug!(players = self.roster.len(), "start ignored, not enough players");
            return Vec::new();
        }

        info!(players = self.roster.len(), "game starting");
        self.arbiter.reset();
        self.roster.reset_for_game(self.settings.initial_lives);
        self.cursor = 0;

        let mut out = vec![Outbound::broadcast(GameEvent::GameStarted {
            players: self.roster.players().to_vec(),
        })];
        self.advance_turn(&mut out);
        out
    }

    pub fn submit_word(&mut self, id: PlayerId, raw: &str) -> Vec<Outbound> {
        let fragment = match &self.phase {
            Phase::Playing(turn) if turn.holder == id => turn.fragment.clone(),
            _ => {
                debug!(%id, "submission ignored, not this player's turn");
                return Vec::new();
            }
        };

        let word = raw.trim();
        match self.arbiter.judge(word, &fragment) {
            Verdict::Rejected(reason) => {
                info!(%id, word, %fragment, ?reason, "word rejected");
                vec![Outbound::to(id, GameEvent::WordRejected { reason })]
            }
            Verdict::Accepted { canonical } => {
                let Some(player) = self.roster.get_mut(id) else {
                    return Vec::new();
                };
                let gain = player.credit_word(&canonical);
                let lives_remaining = player.lives;
                info!(%id, word, %canonical, "word accepted");
                if gain.bonus_granted {
                    info!(%id, lives = lives_remaining, "alphabet complete, bonus life");
                }

                let mut out = vec![Outbound::broadcast(GameEvent::WordAccepted {
                    player_id: id,
                    word: word.to_string(),
                    new_letters: gain.new_letters,
                    bonus_granted: gain.bonus_granted,
                    lives_remaining,
                })];
                self.advance_turn(&mut out);
                out
            }
        }
    }

    /// Relay what a player is typing to everyone else
    pub fn typing(&self, id: PlayerId, text: &str) -> Vec<Outbound> {
        if !self.roster.contains(id) {
            return Vec::new();
        }
        vec![Outbound::except(
            id,
            GameEvent::PlayerTyping {
                player_id: id,
                text: text.to_string(),
            },
        )]
    }

    /// A timer fired. Tokens that are no longer current are ignored.
    pub fn on_timer(&mut self, token: TimerToken) -> Vec<Outbound> {
        if !self.scheduler.claim(token) {
            debug!(generation = token.generation, "stale timer ignored");
            return Vec::new();
        }
        let mut out = Vec::new();
        match token.kind {
            TimerKind::Countdown => self.explode(&mut out),
            TimerKind::Aftermath => {
                if matches!(self.phase, Phase::Resolving(_)) {
                    self.advance_turn(&mut out);
                }
            }
        }
        out
    }

    /// The armed timer, if its deadline has passed
    pub fn due_timer(&mut self, now: Instant) -> Option<TimerToken> {
        self.scheduler.take_due(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    fn roster_changed(&self) -> Outbound {
        Outbound::broadcast(GameEvent::RosterChanged {
            players: self.roster.players().to_vec(),
            admin_id: self.roster.admin(),
        })
    }

    /// Deal the next turn, or end the game if one player (or none) is left
    fn advance_turn(&mut self, out: &mut Vec<Outbound>) {
        if self.roster.living_count() <= 1 {
            self.finish(out);
            return;
        }
        let Some(slot) = self.roster.next_living_after(self.cursor) else {
            self.finish(out);
            return;
        };
        let Some(holder) = self.roster.at(slot).map(|p| p.id) else {
            self.finish(out);
            return;
        };

        let fragment = self.fragments.pick(&mut self.rng).to_string();
        let seconds = self
            .rng
            .random_range(self.settings.min_time..=self.settings.max_time);
        self.scheduler
            .arm(TimerKind::Countdown, Duration::from_secs(u64::from(seconds)));
        self.cursor = slot;
        info!(id = %holder, %fragment, seconds, "new turn");

        self.phase = Phase::Playing(Turn {
            holder,
            fragment: fragment.clone(),
        });
        out.push(Outbound::broadcast(GameEvent::NewTurn {
            player_id: holder,
            fragment,
        }));
    }

    fn explode(&mut self, out: &mut Vec<Outbound>) {
        let Phase::Playing(turn) = &self.phase else {
            return;
        };
        let turn = turn.clone();
        let Some(loser) = self.roster.get_mut(turn.holder) else {
            return;
        };
        let lives_remaining = loser.lose_life();
        info!(id = %turn.holder, lives = lives_remaining, "bomb exploded");

        out.push(Outbound::broadcast(GameEvent::Explosion {
            loser_id: turn.holder,
            lives_remaining,
        }));
        if lives_remaining == 0 {
            info!(id = %turn.holder, "player eliminated");
            out.push(Outbound::broadcast(GameEvent::PlayerEliminated {
                player_id: turn.holder,
            }));
        }

        self.phase = Phase::Resolving(turn);
        self.scheduler.arm(TimerKind::Aftermath, EXPLOSION_PAUSE);
    }

    fn finish(&mut self, out: &mut Vec<Outbound>) {
        let winner = self.roster.sole_survivor().cloned();
        match &winner {
            Some(w) => info!(id = %w.id, name = %w.name, "game over"),
            None => info!("game over, no winner"),
        }
        self.scheduler.cancel();
        self.phase = Phase::Idle;
        out.push(Outbound::broadcast(GameEvent::GameOver { winner }));
    }
}

/// Read-only views used by the tests
#[cfg(test)]
impl Game {
    pub fn with_fragments(mut self, fragments: FragmentSet) -> Self {
        self.fragments = fragments;
        self
    }

    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.scheduler.armed()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn used_words(&self) -> &std::collections::HashSet<String> {
        self.arbiter.used_words()
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, Phase::Resolving(_))
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn().map(|t| t.holder)
    }

    /// Non-empty exactly while a game is active
    pub fn current_fragment(&self) -> Option<&str> {
        self.turn().map(|t| t.fragment.as_str())
    }

    fn turn(&self) -> Option<&Turn> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Playing(turn) | Phase::Resolving(turn) => Some(turn),
        }
    }
}
