//! TCP client for a kaboom room, used to drive the server end to end

use super::peer::Peer;
use super::protocol::{ClientMessage, ServerMessage};
use crate::lobby::settings::SettingsPatch;
use std::io;
use std::net::SocketAddr;

/// A connection to a kaboom server
pub struct Client {
    /// Connection to the server
    peer: Peer<ServerMessage>,
}

impl Client {
    /// Connect to a server at the given address
    pub fn connect_addr(addr: SocketAddr) -> io::Result<Self> {
        Ok(Client {
            peer: Peer::connect(addr)?,
        })
    }

    pub fn join(&self, name: &str) -> io::Result<()> {
        self.send(ClientMessage::Join {
            name: name.to_string(),
        })
    }

    pub fn submit_word(&self, word: &str) -> io::Result<()> {
        self.send(ClientMessage::SubmitWord {
            word: word.to_string(),
        })
    }

    pub fn start_game(&self) -> io::Result<()> {
        self.send(ClientMessage::StartGame)
    }

    pub fn update_settings(&self, settings: SettingsPatch) -> io::Result<()> {
        self.send(ClientMessage::UpdateSettings { settings })
    }

    pub fn typing(&self, text: &str) -> io::Result<()> {
        self.send(ClientMessage::Typing {
            text: text.to_string(),
        })
    }

    fn send(&self, msg: ClientMessage) -> io::Result<()> {
        self.peer.send(&msg)
    }

    /// Poll for incoming messages from the server
    pub fn poll(&mut self) -> Vec<ServerMessage> {
        self.peer.recv_all()
    }

    /// Check if still connected
    pub fn is_connected(&self) -> bool {
        self.peer.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::event::{GameEvent, Outbound};
    use crate::network::server::{Server, ServerEvent};
    use std::net::{IpAddr, Ipv4Addr};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_client_joins_server() {
        let mut server = Server::start_on(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        let client = Client::connect_addr(server.addr()).unwrap();
        client.join("TestPlayer").unwrap();

        thread::sleep(Duration::from_millis(200));
        let events = server.poll();

        assert!(events
            .iter()
            .any(|e| matches!(e, ServerEvent::PeerConnected { .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            ServerEvent::MessageReceived {
                message: ClientMessage::Join { name },
                ..
            } if name == "TestPlayer"
        )));
    }

    #[test]
    fn test_client_receives_broadcast() {
        let mut server = Server::start_on(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        let mut client = Client::connect_addr(server.addr()).unwrap();

        thread::sleep(Duration::from_millis(100));
        server.poll();

        server.deliver(&Outbound::broadcast(GameEvent::GameAborted));

        thread::sleep(Duration::from_millis(100));
        assert_eq!(client.poll(), vec![GameEvent::GameAborted]);
        assert!(client.is_connected());
    }
}
