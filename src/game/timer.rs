//! Single-slot scheduler for the bomb countdown and the post-explosion pause
//!
//! Only one timer is ever armed. Every arm or cancel bumps a generation
//! counter and the engine only honours a [`TimerToken`] whose generation is
//! still current, so a firing that races a word submission is ignored.

use std::time::{Duration, Instant};

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The bomb goes off on the current turn-holder
    Countdown,
    /// The pause after an explosion is over
    Aftermath,
}

/// Handle identifying one arming of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken {
    pub generation: u64,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    token: TimerToken,
    deadline: Instant,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    generation: u64,
    armed: Option<Armed>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer, replacing whatever was armed before
    pub fn arm(&mut self, kind: TimerKind, after: Duration) -> TimerToken {
        self.arm_at(kind, Instant::now() + after)
    }

    pub fn arm_at(&mut self, kind: TimerKind, deadline: Instant) -> TimerToken {
        self.generation += 1;
        let token = TimerToken {
            generation: self.generation,
            kind,
        };
        self.armed = Some(Armed { token, deadline });
        token
    }

    /// Disarm. Any token handed out earlier becomes stale.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = None;
    }

    /// Take the armed timer if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<TimerToken> {
        match self.armed {
            Some(armed) if armed.deadline <= now => {
                self.armed = None;
                Some(armed.token)
            }
            _ => None,
        }
    }

    /// Check a token is the latest one armed; consumes it if so
    pub fn claim(&mut self, token: TimerToken) -> bool {
        if token.generation != self.generation {
            return false;
        }
        self.generation += 1;
        self.armed = None;
        true
    }

    #[cfg(test)]
    pub fn armed(&self) -> Option<TimerToken> {
        self.armed.map(|a| a.token)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.map(|a| a.deadline)
    }
}
