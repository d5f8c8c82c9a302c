//! Networking: TCP hosting and mDNS advertisement
//!
//! This module provides:
//! - TCP server for hosting the room (default port 55333 with auto-increment)
//! - TCP client for talking to a room (tests only)
//! - Length-prefixed JSON protocol
//! - mDNS-SD advertisement so players on the LAN can find the room

#[cfg(test)]
pub mod client;
pub mod peer;
pub mod protocol;
pub mod server;

pub use protocol::ClientMessage;
pub use server::{Server, ServerEvent, DEFAULT_PORT};

use mdns_sd::{ServiceDaemon, ServiceInfo};

/// Service type for mDNS discovery
pub const SERVICE_TYPE: &str = "_kaboom._tcp.local.";

/// Current protocol version
pub const PROTOCOL_VERSION: &str = "1";

/// Advertises the room on the local network
pub struct ServiceDiscovery {
    daemon: ServiceDaemon,
    instance_id: String,
    registered_instance: Option<String>,
}

impl ServiceDiscovery {
    /// Create a new service discovery instance
    ///
    /// # Arguments
    /// * `instance_id` - Unique identifier for this server on the network
    pub fn new(instance_id: String) -> Result<Self, mdns_sd::Error> {
        Ok(Self {
            daemon: ServiceDaemon::new()?,
            instance_id,
            registered_instance: None,
        })
    }

    /// Advertise this room on the local network
    pub fn advertise(&mut self, lobby_name: &str, port: u16) -> Result<(), mdns_sd::Error> {
        let properties = [
            ("version", PROTOCOL_VERSION),
            ("lobby_name", lobby_name),
        ];

        // Instance name is the instance id (must be unique on the network)
        let instance_name = &self.instance_id;
        let hostname = format!("{}.local.", self.instance_id);

        let service_info = ServiceInfo::new(
            SERVICE_TYPE,
            instance_name,
            &hostname,
            (),
            port,
            &properties[..],
        )?
        .enable_addr_auto();

        self.daemon.register(service_info)?;
        self.registered_instance = Some(instance_name.to_string());
        Ok(())
    }

    /// Stop advertising on the network
    pub fn stop_advertising(&mut self) -> Result<(), mdns_sd::Error> {
        if let Some(instance_name) = self.registered_instance.take() {
            let fullname = format!("{}.{}", instance_name, SERVICE_TYPE);
            self.daemon.unregister(&fullname)?;
        }
        Ok(())
    }

    /// Shutdown the discovery service
    pub fn shutdown(mut self) -> Result<(), mdns_sd::Error> {
        self.stop_advertising()?;
        self.daemon.shutdown()?;
        Ok(())
    }
}
