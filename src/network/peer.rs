//! Peer connection handling

use super::protocol::{self, encode, read_frame};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, ErrorKind};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// A connected peer. Reads messages of type `In`; writes encoded frames.
pub struct Peer<In> {
    /// Peer's address
    pub addr: SocketAddr,
    /// Kept to close the socket when the peer is dropped
    stream: TcpStream,
    /// Channel of encoded frames to send to this peer
    tx: Sender<Vec<u8>>,
    /// Channel to receive messages from this peer
    rx: Receiver<In>,
    /// Whether the connection is still alive
    alive: bool,
}

impl<In> Peer<In>
where
    In: DeserializeOwned + Send + 'static,
{
    /// Create a new peer from a TCP stream
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        let addr = stream.peer_addr()?;

        stream.set_nodelay(true)?;
        stream.set_write_timeout(Some(Duration::from_secs(5)))?;

        let (outgoing_tx, outgoing_rx) = channel::<Vec<u8>>();
        let (incoming_tx, incoming_rx) = channel::<In>();

        let mut write_stream = stream.try_clone()?;
        let mut read_stream = stream.try_clone()?;

        // Writer thread
        thread::spawn(move || {
            while let Ok(bytes) = outgoing_rx.recv() {
                if protocol::write_frame(&mut write_stream, &bytes).is_err() {
                    break;
                }
            }
        });

        // Reader thread; any read or decode error ends the connection
        thread::spawn(move || loop {
            match read_frame::<In, _>(&mut read_stream) {
                Ok(msg) => {
                    if incoming_tx.send(msg).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(%addr, error = %e, "peer read ended");
                    break;
                }
            }
        });

        Ok(Peer {
            addr,
            stream,
            tx: outgoing_tx,
            rx: incoming_rx,
            alive: true,
        })
    }

    /// Connect to a peer at the given address
    #[cfg(test)]
    pub fn connect(addr: SocketAddr) -> io::Result<Self> {
        let stream = TcpStream::connect_timeout(&addr, Duration::from_secs(5))?;
        Self::new(stream)
    }

    /// Send a message to this peer
    pub fn send<Out: Serialize>(&self, msg: &Out) -> io::Result<()> {
        self.send_raw(encode(msg)?)
    }

    /// Send an already encoded frame (lets broadcasts serialize once)
    pub fn send_raw(&self, bytes: Vec<u8>) -> io::Result<()> {
        self.tx
            .send(bytes)
            .map_err(|_| io::Error::new(ErrorKind::BrokenPipe, "peer disconnected"))
    }

    /// Try to receive a message from this peer (non-blocking)
    pub fn try_recv(&mut self) -> Option<In> {
        match self.rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.alive = false;
                None
            }
        }
    }

    /// Receive all pending messages from this peer
    pub fn recv_all(&mut self) -> Vec<In> {
        let mut messages = Vec::new();
        while let Some(msg) = self.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Check if the peer connection is still alive
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

impl<In> Drop for Peer<In> {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::protocol::ClientMessage;
    use std::net::TcpListener;

    #[test]
    fn test_peer_connect_and_send() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let peer = Peer::<ClientMessage>::connect(addr).unwrap();
            peer.send(&ClientMessage::StartGame).unwrap();
            thread::sleep(Duration::from_millis(100));
            peer
        });

        let (stream, _) = listener.accept().unwrap();
        let mut server_peer = Peer::<ClientMessage>::new(stream).unwrap();

        thread::sleep(Duration::from_millis(200));

        let messages = server_peer.recv_all();
        assert!(messages.contains(&ClientMessage::StartGame));

        handle.join().unwrap();
    }

    #[test]
    fn test_peer_detects_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = Peer::<ClientMessage>::connect(addr).unwrap();
        let (stream, _) = listener.accept().unwrap();
        let mut server_peer = Peer::<ClientMessage>::new(stream).unwrap();

        drop(client);
        thread::sleep(Duration::from_millis(200));
        server_peer.recv_all();
        assert!(!server_peer.is_alive());
    }
}
