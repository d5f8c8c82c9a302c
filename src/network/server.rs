//! TCP server hosting the game room

use super::peer::Peer;
use super::protocol::{encode, ClientMessage, ServerMessage};
use crate::game::event::{Audience, Outbound};
use crate::lobby::PlayerId;
use std::io;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default port for kaboom servers
pub const DEFAULT_PORT: u16 = 55333;

/// How many successive ports to try when the requested one is taken
const PORT_SPAN: u16 = 100;

/// A connected client and the id the game knows it by
struct Connection {
    id: PlayerId,
    peer: Peer<ClientMessage>,
}

/// Accepts client connections and moves messages in and out
pub struct Server {
    /// Local address the server is bound to
    addr: SocketAddr,
    /// Channel to receive new peer connections
    new_peers_rx: Receiver<Peer<ClientMessage>>,
    /// Connected clients, in connection order
    connections: Vec<Connection>,
    /// Next connection id to hand out
    next_id: u64,
    /// Running flag
    running: bool,
    /// Tells the acceptor thread to release the listener
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Start a server on `bind:port`, trying the following ports if it is taken
    pub fn start_on(bind: IpAddr, start_port: u16) -> io::Result<Self> {
        let mut port = start_port;
        let last_port = start_port.saturating_add(PORT_SPAN);
        let listener = loop {
            match TcpListener::bind(SocketAddr::new(bind, port)) {
                Ok(l) => break l,
                Err(e) if e.kind() == io::ErrorKind::AddrInUse && port != 0 && port < last_port => {
                    port += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;

        let (new_peers_tx, new_peers_rx) = channel();
        let shutdown = Arc::new(AtomicBool::new(false));

        // Spawn acceptor thread
        let acceptor_shutdown = Arc::clone(&shutdown);
        thread::spawn(move || {
            accept_loop(listener, new_peers_tx, acceptor_shutdown);
        });

        Ok(Server {
            addr,
            new_peers_rx,
            connections: Vec::new(),
            next_id: 1,
            running: true,
            shutdown,
        })
    }

    /// Get the address the server is listening on
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the port the server is listening on
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Poll for new connections, messages and disconnections
    pub fn poll(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();

        // Accept new peers
        loop {
            match self.new_peers_rx.try_recv() {
                Ok(peer) => {
                    let id = PlayerId(self.next_id);
                    self.next_id += 1;
                    events.push(ServerEvent::PeerConnected {
                        id,
                        addr: peer.addr,
                    });
                    self.connections.push(Connection { id, peer });
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.running = false;
                    break;
                }
            }
        }

        // Collect messages from peers and track disconnections
        for conn in &mut self.connections {
            for message in conn.peer.recv_all() {
                events.push(ServerEvent::MessageReceived {
                    from: conn.id,
                    message,
                });
            }
        }

        let mut gone = Vec::new();
        self.connections.retain(|conn| {
            let alive = conn.peer.is_alive();
            if !alive {
                gone.push(conn.id);
            }
            alive
        });
        events.extend(gone.into_iter().map(|id| ServerEvent::PeerDisconnected { id }));

        events
    }

    /// Route an engine event to its audience
    pub fn deliver(&self, outbound: &Outbound) {
        match outbound.audience {
            Audience::Everyone => self.broadcast(&outbound.event),
            Audience::Only(id) => {
                if let Err(e) = self.send_to(id, &outbound.event) {
                    debug!(%id, error = %e, "unicast dropped");
                }
            }
            Audience::AllExcept(id) => self.broadcast_except(id, &outbound.event),
        }
    }

    /// Broadcast a message to all connected clients (serializes once)
    pub fn broadcast(&self, msg: &ServerMessage) {
        self.send_where(msg, |_| true);
    }

    /// Broadcast to everyone but `skip`
    pub fn broadcast_except(&self, skip: PlayerId, msg: &ServerMessage) {
        self.send_where(msg, |id| id != skip);
    }

    /// Send a message to a single client
    pub fn send_to(&self, id: PlayerId, msg: &ServerMessage) -> io::Result<()> {
        let conn = self
            .connections
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "peer not found"))?;
        conn.peer.send(msg)
    }

    fn send_where<F: Fn(PlayerId) -> bool>(&self, msg: &ServerMessage, keep: F) {
        let bytes = match encode(msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to encode broadcast");
                return;
            }
        };
        for conn in self.connections.iter().filter(|c| keep(c.id)) {
            let _ = conn.peer.send_raw(bytes.clone());
        }
    }

    /// Get the number of connected clients
    pub fn peer_count(&self) -> usize {
        self.connections.len()
    }

    /// Check if the server is still running
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

/// Events from the server
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// A new client connected
    PeerConnected { id: PlayerId, addr: SocketAddr },
    /// A client disconnected
    PeerDisconnected { id: PlayerId },
    /// A message was received from a client
    MessageReceived {
        from: PlayerId,
        message: ClientMessage,
    },
}

fn accept_loop(
    listener: TcpListener,
    tx: Sender<Peer<ClientMessage>>,
    shutdown: Arc<AtomicBool>,
) {
    while !shutdown.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, addr)) => {
                // The listener is non-blocking; the connection must not be
                if let Err(e) = stream.set_nonblocking(false) {
                    warn!(%addr, error = %e, "failed to configure connection");
                    continue;
                }
                match Peer::new(stream) {
                    Ok(peer) => {
                        if tx.send(peer).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(%addr, error = %e, "failed to set up connection"),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(20));
            }
            Err(e) => {
                warn!(error = %e, "accept loop stopped");
                break;
            }
        }
    }
}
