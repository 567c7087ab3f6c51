//! The external bridge: command packets in, scheduler calls and reply
//! packets out.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use taskdock_runtime::{Channel, ChannelHandle, Envelope, EnvelopeView, StatusCode, TaskManager};
use taskdock_transport::Hub;
use taskdock_wire::{DeviceConfig, Header, HeaderFlags, Packet, PacketKind, Uid, WireSpec};

/// Drives the scheduler from inbound packets and reports back.
///
/// The bridge is both a packet interpreter and a [`Channel`]: commands pulled
/// from the hub become `register`/`pause`/`resume`/`abort` calls, and every
/// task registered through it delivers its result back here to be framed as
/// a reply packet. Non-`ok` scheduler returns are answered with an error
/// reply addressed to the packet's initiator.
pub struct ExternalBridge {
    hub: Hub,
    spec: WireSpec,
    device: DeviceConfig,
}

impl ExternalBridge {
    /// Wire a bridge over a hub with this deployment's geometry and identity.
    pub fn new(hub: Hub, spec: WireSpec, device: DeviceConfig) -> Self {
        Self { hub, spec, device }
    }

    /// Wrap the bridge into the shared handle form the scheduler expects.
    pub fn into_handle(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Mutable access to the hub, for toggling per-transport enable bits.
    pub fn hub_mut(&mut self) -> &mut Hub {
        &mut self.hub
    }

    /// Poll the hub once and dispatch the packet, if any, to the scheduler.
    ///
    /// Flag dispatch: `none` registers the task with the packet payload as
    /// constructor parameters; `abort`/`pause`/`resume` map to the matching
    /// scheduler operation; every other flag is ignored. A non-`ok` status
    /// is answered with an error reply carrying the code in its status byte.
    pub fn update<U: Uid>(bridge: &Rc<RefCell<Self>>, manager: &mut TaskManager<U>) {
        let Some(packet) = bridge.borrow_mut().hub.try_receive() else {
            return;
        };

        let initiator = packet.header.sender_id();
        let flags = packet.header.flags();
        let raw_uid = packet.uid;

        let code = match (flags, U::from_wire(raw_uid)) {
            (
                HeaderFlags::Ack
                | HeaderFlags::Error
                | HeaderFlags::Heartbeat
                | HeaderFlags::Reserved,
                _,
            ) => {
                debug!(?flags, "ignoring packet");
                return;
            }
            (_, None) => StatusCode::TASK_UNKNOWN,
            (HeaderFlags::None, Some(uid)) => {
                let cloned: Rc<RefCell<ExternalBridge>> = Rc::clone(bridge);
                let origin: ChannelHandle<U> = cloned;
                manager.register_task(origin, initiator, uid, EnvelopeView::new(packet.payload()))
            }
            (HeaderFlags::Abort, Some(uid)) => manager.abort_task(uid),
            (HeaderFlags::Pause, Some(uid)) => manager.pause_task(uid),
            (HeaderFlags::Resume, Some(uid)) => manager.resume_task(uid),
        };

        if code != StatusCode::OK {
            debug!(uid = raw_uid, code = code.as_u8(), "command rejected");
            bridge
                .borrow_mut()
                .reply(initiator, raw_uid, HeaderFlags::Error, code, &[]);
        }
    }

    /// Frame and fan out one reply packet. The payload is truncated to the
    /// spec's capacity; sealing happens in the port on the way out.
    fn reply(
        &mut self,
        receiver: u8,
        raw_uid: u64,
        flags: HeaderFlags,
        code: StatusCode,
        payload: &[u8],
    ) {
        let header = Header::new(
            PacketKind::Data,
            false,
            false,
            0,
            flags,
            self.spec.policy().carries_fcs(),
            false,
            receiver,
            &self.device,
        );
        let take = payload.len().min(self.spec.payload_len());
        match Packet::with_payload(&self.spec, header, raw_uid, code.as_u8(), &payload[..take]) {
            Ok(mut packet) => self.hub.send(&mut packet),
            Err(err) => warn!(error = %err, "failed to frame reply"),
        }
    }
}

impl<U: Uid> Channel<U> for ExternalBridge {
    fn on_result(&mut self, initiator_id: u8, uid: U, result: Envelope, code: StatusCode) {
        self.reply(
            initiator_id,
            uid.to_wire(),
            HeaderFlags::None,
            code,
            result.data(),
        );
    }
}
