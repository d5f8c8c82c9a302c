//! KABOOM! - LAN word bomb server
//!
//! Find a word containing the syllable before the bomb goes off.

mod app;
mod config;
mod game;
mod lobby;
mod logging;
mod network;

use anyhow::Context;
use app::App;
use clap::Parser;
use config::Cli;
use game::Game;
use network::{Server, ServiceDiscovery};
use rand::Rng;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init();

    let settings = cli.settings().context("invalid game settings")?;
    let dictionary = cli
        .load_dictionary()
        .context("could not load the word list")?;
    info!(words = dictionary.len(), ?settings, "dictionary ready");

    let server = Server::start_on(cli.bind, cli.port)
        .with_context(|| format!("could not listen on {}:{}", cli.bind, cli.port))?;
    if server.port() != cli.port {
        info!(requested = cli.port, port = server.port(), "port taken, moved up");
    }

    let discovery = if cli.no_mdns {
        None
    } else {
        let lobby_name = cli
            .lobby_name
            .clone()
            .unwrap_or_else(lobby::generate_lobby_name);
        advertise(&lobby_name, server.port())
    };

    let mut app = App::new(Game::new(dictionary, settings), server);
    let result = app.run();

    if let Some(discovery) = discovery {
        if let Err(e) = discovery.shutdown() {
            warn!(error = %e, "mDNS shutdown failed");
        }
    }
    result
}

/// Announce the room on the LAN. Failure only costs discoverability.
fn advertise(lobby_name: &str, port: u16) -> Option<ServiceDiscovery> {
    let instance_id = format!("kaboom-{:08x}", rand::rng().random::<u32>());
    let mut discovery = match ServiceDiscovery::new(instance_id) {
        Ok(d) => d,
        Err(e) => {
            warn!(error = %e, "mDNS unavailable");
            return None;
        }
    };
    match discovery.advertise(lobby_name, port) {
        Ok(()) => {
            info!(lobby = lobby_name, port, "advertising on the LAN");
            Some(discovery)
        }
        Err(e) => {
            warn!(error = %e, "mDNS advertisement failed");
            None
        }
    }
}
