//! A validated packet port over one transport.

use tracing::debug;

use taskdock_wire::{is_valid, seal, DeviceConfig, Packet, WireSpec};

use crate::error::Result;
use crate::traits::Transport;

/// Layers the validator pipeline over any conforming [`Transport`].
///
/// Receive path: whole-packet reads only, then an addressee filter, then FCS
/// verification. Packets failing either check are dropped silently; there
/// is no addressable sender to answer with certainty. Send path: seal, then
/// hand the packed bytes to the transport.
pub struct Port<T> {
    transport: T,
    spec: WireSpec,
    device: DeviceConfig,
}

impl<T: Transport> Port<T> {
    /// Wrap a transport with this deployment's geometry and identity.
    pub fn new(transport: T, spec: WireSpec, device: DeviceConfig) -> Self {
        Self {
            transport,
            spec,
            device,
        }
    }

    /// Poll for one packet addressed to this device.
    ///
    /// Returns `Ok(None)` when fewer than one packet's worth of bytes is
    /// buffered (consuming nothing), and when a full packet was read but
    /// failed the addressee filter or its FCS. Transport failures propagate.
    pub fn try_receive(&mut self) -> Result<Option<Packet>> {
        let wanted = self.spec.packet_size();
        if self.transport.read_available() < wanted {
            return Ok(None);
        }

        let mut buf = vec![0u8; wanted];
        self.transport.read_exact(&mut buf)?;

        let packet = match Packet::decode(&self.spec, &buf) {
            Ok(packet) => packet,
            Err(err) => {
                debug!(error = %err, "dropping undecodable packet");
                return Ok(None);
            }
        };

        if packet.header.receiver_id() != self.device.board_id {
            debug!(
                receiver = packet.header.receiver_id(),
                board = self.device.board_id,
                "dropping packet for another device"
            );
            return Ok(None);
        }
        if !is_valid(&self.spec, &packet) {
            debug!(uid = packet.uid, "dropping packet with bad fcs");
            return Ok(None);
        }

        Ok(Some(packet))
    }

    /// Seal and transmit one packet.
    ///
    /// The packet's `fcs` field is updated in place; callers must not assume
    /// the value is bitwise identical after sending. When the transport has
    /// no reachable peer the packet is dropped.
    pub fn send(&mut self, packet: &mut Packet) -> Result<()> {
        if !self.transport.has_peer() {
            debug!("no peer; dropping outgoing packet");
            return Ok(());
        }
        seal(&self.spec, packet);
        let wire = packet.encode(&self.spec);
        self.transport.write_all(&wire)
    }

    /// The geometry this port frames packets with.
    pub fn spec(&self) -> &WireSpec {
        &self.spec
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the port and return the inner transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
