//! Packet header: a 32-bit control word plus sender and receiver bytes.
//!
//! Control word bit layout (MSB first):
//!
//! ```text
//! +-------------+---------+-----+------+----------+----------+-----+------+-----------+-------------+
//! | 31 30 29 28 |  27 26  | 25  |  24  | 23 22 21 | 20 19 18 | 17  |  16  | 15 .. 8   | 7 .. 0      |
//! |    type     | version | enc | frag | priority |  flags   | fcs | rsvd | sender_id | receiver_id |
//! +-------------+---------+-----+------+----------+----------+-----+------+-----------+-------------+
//! ```
//!
//! The version bits and the sender id are immutable: constructors overwrite
//! them with [`PROTOCOL_VERSION`](crate::config::PROTOCOL_VERSION) and the
//! device's configured board id, ignoring caller-supplied values. On the wire
//! the control word is followed by one authoritative sender byte and one
//! receiver byte; the word's low 16 bits mirror them.

use bytes::{Buf, BufMut};

use crate::config::{DeviceConfig, PROTOCOL_VERSION};

/// Packet type carried in the header's top nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum PacketKind {
    /// Generic application data packet.
    Data = 0x0,
    /// Configuration or parameter change.
    Config = 0x1,
    /// Protocol-level commands.
    Control = 0x2,
    /// Routing or discovery.
    Routing = 0x3,
    /// Time synchronization message.
    TimeSync = 0x4,
    /// Authentication or login data.
    Auth = 0x5,
    /// Session initiation/teardown.
    Session = 0x6,
    /// Device status or health info.
    Status = 0x7,
    /// Log or diagnostic data.
    Log = 0x8,
    /// Debug-specific packets.
    Debug = 0x9,
    /// Firmware updates or related payloads.
    Firmware = 0xA,
    /// Reserved for future use.
    ReservedB = 0xB,
    /// Reserved for future use.
    ReservedC = 0xC,
    /// Reserved for future use.
    ReservedD = 0xD,
    /// Reserved for future use.
    ReservedE = 0xE,
    /// Reserved for future use.
    ReservedF = 0xF,
}

impl PacketKind {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0xF {
            0x0 => PacketKind::Data,
            0x1 => PacketKind::Config,
            0x2 => PacketKind::Control,
            0x3 => PacketKind::Routing,
            0x4 => PacketKind::TimeSync,
            0x5 => PacketKind::Auth,
            0x6 => PacketKind::Session,
            0x7 => PacketKind::Status,
            0x8 => PacketKind::Log,
            0x9 => PacketKind::Debug,
            0xA => PacketKind::Firmware,
            0xB => PacketKind::ReservedB,
            0xC => PacketKind::ReservedC,
            0xD => PacketKind::ReservedD,
            0xE => PacketKind::ReservedE,
            _ => PacketKind::ReservedF,
        }
    }
}

/// Control flags carried in the header's 3-bit flag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum HeaderFlags {
    /// No flags.
    None = 0,
    /// Acknowledgment packet.
    Ack = 1,
    /// Error indication.
    Error = 2,
    /// Heartbeat signal.
    Heartbeat = 3,
    /// Abort signal.
    Abort = 4,
    /// Pause signal.
    Pause = 5,
    /// Resume signal.
    Resume = 6,
    /// Reserved for future use.
    Reserved = 7,
}

impl HeaderFlags {
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => HeaderFlags::None,
            1 => HeaderFlags::Ack,
            2 => HeaderFlags::Error,
            3 => HeaderFlags::Heartbeat,
            4 => HeaderFlags::Abort,
            5 => HeaderFlags::Pause,
            6 => HeaderFlags::Resume,
            _ => HeaderFlags::Reserved,
        }
    }
}

/// Packet metadata: type, version, routing flags, and addressing.
///
/// Field accessors are pure; there are no setters. A header is built either
/// from individual fields ([`Header::new`]) or from a raw control word
/// ([`Header::from_raw`]); both pin the version and sender fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    kind: PacketKind,
    version: u8,
    encrypted: bool,
    fragmented: bool,
    priority: u8,
    flags: HeaderFlags,
    validated: bool,
    reserved: bool,
    sender_id: u8,
    receiver_id: u8,
}

impl Header {
    /// Build a header from individual fields.
    ///
    /// The protocol version and the sender id are not parameters: they are
    /// locked to [`PROTOCOL_VERSION`] and `device.board_id`. `priority` is
    /// masked to its 3-bit field.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: PacketKind,
        encrypted: bool,
        fragmented: bool,
        priority: u8,
        flags: HeaderFlags,
        validated: bool,
        reserved: bool,
        receiver_id: u8,
        device: &DeviceConfig,
    ) -> Self {
        Self {
            kind,
            version: PROTOCOL_VERSION,
            encrypted,
            fragmented,
            priority: priority & 0x7,
            flags,
            validated,
            reserved,
            sender_id: device.board_id,
            receiver_id,
        }
    }

    /// Build a header from a raw 32-bit control word.
    ///
    /// The receiver id is taken from the word's low byte. The version bits
    /// and the sender byte of `raw` are discarded and replaced with
    /// [`PROTOCOL_VERSION`] and `device.board_id`.
    pub fn from_raw(raw: u32, device: &DeviceConfig) -> Self {
        Self {
            kind: PacketKind::from_bits((raw >> 28) as u8),
            version: PROTOCOL_VERSION,
            encrypted: raw & (1 << 25) != 0,
            fragmented: raw & (1 << 24) != 0,
            priority: ((raw >> 21) & 0x7) as u8,
            flags: HeaderFlags::from_bits((raw >> 18) as u8),
            validated: raw & (1 << 17) != 0,
            reserved: raw & (1 << 16) != 0,
            sender_id: device.board_id,
            receiver_id: raw as u8,
        }
    }

    /// Packet type.
    pub fn kind(&self) -> PacketKind {
        self.kind
    }

    /// Protocol version (always [`PROTOCOL_VERSION`] on locally built headers).
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Whether the payload is encrypted. Informational.
    pub fn encrypted(&self) -> bool {
        self.encrypted
    }

    /// Whether the packet is a fragment. Informational; not implemented.
    pub fn fragmented(&self) -> bool {
        self.fragmented
    }

    /// Priority, 0 (none) through 7.
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Control flags.
    pub fn flags(&self) -> HeaderFlags {
        self.flags
    }

    /// Whether the packet carries an FCS.
    pub fn validated(&self) -> bool {
        self.validated
    }

    /// Reserved bit.
    pub fn reserved(&self) -> bool {
        self.reserved
    }

    /// Device id of the packet's origin.
    pub fn sender_id(&self) -> u8 {
        self.sender_id
    }

    /// Device id of the packet's addressee. 0 (broadcast) is not routed.
    pub fn receiver_id(&self) -> u8 {
        self.receiver_id
    }

    /// The full 32-bit control word, sender/receiver mirrored in the low half.
    pub fn control_word(&self) -> u32 {
        ((self.kind as u32) << 28)
            | ((self.version as u32 & 0x3) << 26)
            | ((self.encrypted as u32) << 25)
            | ((self.fragmented as u32) << 24)
            | ((self.priority as u32 & 0x7) << 21)
            | ((self.flags as u32) << 18)
            | ((self.validated as u32) << 17)
            | ((self.reserved as u32) << 16)
            | ((self.sender_id as u32) << 8)
            | self.receiver_id as u32
    }

    /// Write the 6-byte wire image: big-endian control word, then the
    /// authoritative sender and receiver bytes.
    pub(crate) fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u32(self.control_word());
        dst.put_u8(self.sender_id);
        dst.put_u8(self.receiver_id);
    }

    /// Read a 6-byte wire image verbatim. Unlike the constructors, nothing is
    /// pinned: the sender byte identifies the remote device.
    pub(crate) fn decode(src: &mut impl Buf) -> Self {
        let word = src.get_u32();
        let sender_id = src.get_u8();
        let receiver_id = src.get_u8();
        Self {
            kind: PacketKind::from_bits((word >> 28) as u8),
            version: ((word >> 26) & 0x3) as u8,
            encrypted: word & (1 << 25) != 0,
            fragmented: word & (1 << 24) != 0,
            priority: ((word >> 21) & 0x7) as u8,
            flags: HeaderFlags::from_bits((word >> 18) as u8),
            validated: word & (1 << 17) != 0,
            reserved: word & (1 << 16) != 0,
            sender_id,
            receiver_id,
        }
    }
}
