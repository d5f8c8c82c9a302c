//! Notifications the engine hands to the transport

use super::validation::RejectReason;
use crate::lobby::settings::GameSettings;
use crate::lobby::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Who should receive an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    Only(PlayerId),
    AllExcept(PlayerId),
}

/// State-change notifications, also the server-to-client wire messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Sent to a player right after they join
    Welcome { player: Player },
    /// Settings snapshot, on connect and whenever they change
    Settings { settings: GameSettings },
    RosterChanged {
        players: Vec<Player>,
        admin_id: Option<PlayerId>,
    },
    GameStarted { players: Vec<Player> },
    /// Carries no countdown length
    NewTurn { player_id: PlayerId, fragment: String },
    WordRejected { reason: RejectReason },
    WordAccepted {
        player_id: PlayerId,
        word: String,
        new_letters: Vec<char>,
        bonus_granted: bool,
        lives_remaining: u32,
    },
    Explosion { loser_id: PlayerId, lives_remaining: u32 },
    PlayerEliminated { player_id: PlayerId },
    GameOver { winner: Option<Player> },
    /// Too few players left mid-game; nobody won
    GameAborted,
    PlayerTyping { player_id: PlayerId, text: String },
}

/// An event and its recipients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub audience: Audience,
    pub event: GameEvent,
}

impl Outbound {
    pub fn broadcast(event: GameEvent) -> Self {
        Self {
            audience: Audience::Everyone,
            event,
        }
    }

    pub fn to(player: PlayerId, event: GameEvent) -> Self {
        Self {
            audience: Audience::Only(player),
            event,
        }
    }

    pub fn except(player: PlayerId, event: GameEvent) -> Self {
        Self {
            audience: Audience::AllExcept(player),
            event,
        }
    }
}
