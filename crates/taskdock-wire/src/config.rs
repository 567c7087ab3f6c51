//! Deployment configuration for the wire layer.
//!
//! Two knobs exist per deployment: the device identity ([`DeviceConfig`])
//! and the packet geometry ([`WireSpec`]). Both are constructed once by the
//! application's composition root and passed by reference; there are no
//! global singletons.

use crate::error::{Result, WireError};
use crate::fcs::FcsPolicy;

/// Protocol version stamped into every outgoing header. Two bits on the wire.
pub const PROTOCOL_VERSION: u8 = 0;

/// Length of the wire header: 4-byte control word + sender + receiver.
pub const HEADER_LEN: usize = 6;

/// Byte offset of the task UID field (header, then one status byte).
pub(crate) const UID_OFFSET: usize = HEADER_LEN + 1;

/// Identity of this device on the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// This device's id; stamped as `sender_id` on every outgoing header.
    pub board_id: u8,
    /// Declared number of peers in the system. Informational.
    pub device_count: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            board_id: 0,
            device_count: 2,
        }
    }
}

/// Packet geometry fixed per deployment: total size, UID width, FCS policy.
///
/// Construction validates the constraints the layout depends on, so a held
/// `WireSpec` is always internally consistent:
/// - the packet size is a multiple of the machine word size,
/// - the UID width is 1, 2, 4, or 8 bytes,
/// - header, status, UID, and FCS leave a non-negative payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWireSpec", into = "RawWireSpec"))]
pub struct WireSpec {
    packet_size: usize,
    uid_width: usize,
    policy: FcsPolicy,
}

impl WireSpec {
    /// Build and validate a packet geometry.
    pub fn new(packet_size: usize, uid_width: usize, policy: FcsPolicy) -> Result<Self> {
        let word = std::mem::size_of::<usize>();
        if packet_size == 0 || packet_size % word != 0 {
            return Err(WireError::UnalignedPacketSize {
                size: packet_size,
                word,
            });
        }
        if !matches!(uid_width, 1 | 2 | 4 | 8) {
            return Err(WireError::UnsupportedUidWidth(uid_width));
        }
        let overhead = UID_OFFSET + uid_width + policy.size();
        if packet_size < overhead {
            return Err(WireError::PacketTooSmall {
                size: packet_size,
                uid_width,
                fcs_len: policy.size(),
            });
        }
        Ok(Self {
            packet_size,
            uid_width,
            policy,
        })
    }

    /// Total packet length on the wire, in bytes.
    pub fn packet_size(&self) -> usize {
        self.packet_size
    }

    /// Width of the UID field, in bytes.
    pub fn uid_width(&self) -> usize {
        self.uid_width
    }

    /// The FCS policy sealing packets of this geometry.
    pub fn policy(&self) -> FcsPolicy {
        self.policy
    }

    /// Payload capacity left after header, status, UID, and FCS.
    pub fn payload_len(&self) -> usize {
        self.packet_size - UID_OFFSET - self.uid_width - self.policy.size()
    }

    /// Byte offset of the FCS field (equals `packet_size` for policy `None`).
    pub(crate) fn fcs_offset(&self) -> usize {
        self.packet_size - self.policy.size()
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawWireSpec {
    packet_size: usize,
    uid_width: usize,
    policy: FcsPolicy,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWireSpec> for WireSpec {
    type Error = WireError;

    fn try_from(raw: RawWireSpec) -> Result<Self> {
        WireSpec::new(raw.packet_size, raw.uid_width, raw.policy)
    }
}

#[cfg(feature = "serde")]
impl From<WireSpec> for RawWireSpec {
    fn from(spec: WireSpec) -> Self {
        Self {
            packet_size: spec.packet_size,
            uid_width: spec.uid_width,
            policy: spec.policy,
        }
    }
}
