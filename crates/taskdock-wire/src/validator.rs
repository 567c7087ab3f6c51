//! Sealing and validation of packets.
//!
//! The FCS covers every byte from the start of the header to the end of the
//! payload: all of the wire image except the FCS field itself. For policy
//! `None` both operations degenerate: `seal` is a no-op and `is_valid` is
//! always true.

use crate::config::WireSpec;
use crate::fcs::FcsPolicy;
use crate::packet::Packet;

/// Finalize a packet before transmission by stamping its FCS.
pub fn seal(spec: &WireSpec, packet: &mut Packet) {
    if spec.policy() == FcsPolicy::None {
        return;
    }
    packet.fcs = covered_fcs(spec, packet);
}

/// Recompute the FCS and compare with the stored value.
pub fn is_valid(spec: &WireSpec, packet: &Packet) -> bool {
    if spec.policy() == FcsPolicy::None {
        return true;
    }
    packet.fcs == covered_fcs(spec, packet)
}

fn covered_fcs(spec: &WireSpec, packet: &Packet) -> u64 {
    let wire = packet.encode(spec);
    spec.policy().compute(&wire[..spec.fcs_offset()])
}
