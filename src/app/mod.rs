//! Server event loop
//!
//! Drains the transport, feeds the game, fires due timers and routes
//! whatever the game emits back out. Everything runs on one thread, so
//! game state is only ever touched from here.

use crate::game::{Game, Outbound};
use crate::network::{ClientMessage, Server, ServerEvent};
use anyhow::bail;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Longest sleep between two polls of the transport
pub const TICK: Duration = Duration::from_millis(20);

/// The running room: one game behind one listener
pub struct App {
    game: Game,
    server: Server,
}

impl App {
    pub fn new(game: Game, server: Server) -> Self {
        Self { game, server }
    }

    /// Serve until the listener goes away
    pub fn run(&mut self) -> anyhow::Result<()> {
        info!(addr = %self.server.addr(), "serving");
        while self.server.is_running() {
            let now = Instant::now();
            self.step(now);
            thread::sleep(self.idle_time(now));
        }
        bail!("listener on {} stopped", self.server.addr())
    }

    /// One pass: transport events first, then a due timer
    pub fn step(&mut self, now: Instant) {
        for event in self.server.poll() {
            let out = self.handle(event);
            self.dispatch(&out);
        }
        if let Some(token) = self.game.due_timer(now) {
            let out = self.game.on_timer(token);
            self.dispatch(&out);
        }
    }

    fn handle(&mut self, event: ServerEvent) -> Vec<Outbound> {
        match event {
            ServerEvent::PeerConnected { id, addr } => {
                debug!(%id, %addr, peers = self.server.peer_count(), "peer connected");
                self.game.connect(id)
            }
            ServerEvent::PeerDisconnected { id } => {
                debug!(%id, peers = self.server.peer_count(), "peer disconnected");
                self.game.disconnect(id)
            }
            ServerEvent::MessageReceived { from, message } => match message {
                ClientMessage::Join { name } => self.game.join(from, &name),
                ClientMessage::SubmitWord { word } => self.game.submit_word(from, &word),
                ClientMessage::StartGame => self.game.start(from),
                ClientMessage::UpdateSettings { settings } => {
                    match self.game.update_settings(from, &settings) {
                        Ok(out) => out,
                        Err(rejection) => {
                            debug!(id = %from, %rejection, "settings update refused");
                            Vec::new()
                        }
                    }
                }
                ClientMessage::Typing { text } => self.game.typing(from, &text),
            },
        }
    }

    fn dispatch(&self, out: &[Outbound]) {
        for outbound in out {
            self.server.deliver(outbound);
        }
    }

    /// Sleep until the next tick or the next timer deadline, whichever is first
    fn idle_time(&self, now: Instant) -> Duration {
        match self.game.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(TICK),
            None => TICK,
        }
    }

}

#[cfg(test)]
impl App {
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn server(&self) -> &Server {
        &self.server
    }
}
