//! Fan-out/fan-in multiplexer over multiple ports.

use tracing::{debug, warn};

use taskdock_wire::Packet;

use crate::port::Port;
use crate::traits::Transport;

/// A boxed transport, the uniform element type hubs multiplex over.
pub type DynPort = Port<Box<dyn Transport>>;

/// Manages a fixed set of ports as one endpoint.
///
/// Think of a USB hub: several links plug into it, and the application talks
/// to a single object. Each port carries two enable bits, one for sending
/// and one for receiving, all set at construction. `send` fans out to every
/// enabled sender in registration order; `try_receive` polls enabled
/// receivers in registration order and short-circuits on the first packet.
pub struct Hub {
    ports: Vec<DynPort>,
    send_enabled: Vec<bool>,
    recv_enabled: Vec<bool>,
}

impl Hub {
    /// Build a hub over a fixed set of ports, all enabled for both
    /// directions.
    pub fn new(ports: Vec<DynPort>) -> Self {
        let n = ports.len();
        Self {
            ports,
            send_enabled: vec![true; n],
            recv_enabled: vec![true; n],
        }
    }

    /// Number of ports behind this hub.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// True when the hub has no ports.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Allow port `index` to participate in `send`.
    pub fn enable_sender(&mut self, index: usize) {
        if let Some(bit) = self.send_enabled.get_mut(index) {
            *bit = true;
        }
    }

    /// Exclude port `index` from `send`.
    pub fn disable_sender(&mut self, index: usize) {
        if let Some(bit) = self.send_enabled.get_mut(index) {
            *bit = false;
        }
    }

    /// Allow port `index` to be polled by `try_receive`.
    pub fn enable_receiver(&mut self, index: usize) {
        if let Some(bit) = self.recv_enabled.get_mut(index) {
            *bit = true;
        }
    }

    /// Exclude port `index` from `try_receive`.
    pub fn disable_receiver(&mut self, index: usize) {
        if let Some(bit) = self.recv_enabled.get_mut(index) {
            *bit = false;
        }
    }

    /// Send one packet through every enabled sender, in registration order.
    ///
    /// Fan-out is best effort: a failing port is logged and the loop
    /// continues with the remaining ports.
    pub fn send(&mut self, packet: &mut Packet) {
        for (index, port) in self.ports.iter_mut().enumerate() {
            if !self.send_enabled[index] {
                continue;
            }
            if let Err(err) = port.send(packet) {
                warn!(port = index, error = %err, "send failed; continuing fan-out");
            }
        }
    }

    /// Poll enabled receivers in registration order; first packet wins.
    pub fn try_receive(&mut self) -> Option<Packet> {
        for (index, port) in self.ports.iter_mut().enumerate() {
            if !self.recv_enabled[index] {
                continue;
            }
            match port.try_receive() {
                Ok(Some(packet)) => {
                    debug!(port = index, uid = packet.uid, "received packet");
                    return Some(packet);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(port = index, error = %err, "receive failed; trying next port");
                }
            }
        }
        None
    }
}
