//! Packet layout and codec.
//!
//! A packet is the unit every transport carries: header, status byte, task
//! UID, zero-padded payload, and (when the deployment's policy says so) a
//! trailing FCS. The geometry comes from a [`WireSpec`]; encoding and
//! decoding are explicit functions over a byte buffer.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::config::WireSpec;
use crate::error::{Result, WireError};
use crate::header::Header;

/// A single wire packet.
///
/// The payload is held zero-padded to the spec's capacity, so the in-memory
/// value and its wire image stay byte-for-byte equivalent. The `fcs` field is
/// meaningful only after [`seal`](crate::validator::seal) (outgoing) or
/// [`decode`](Packet::decode) (incoming); for policy `None` it stays 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet metadata and addressing.
    pub header: Header,
    /// Status code byte (0 on commands; outcome code on replies).
    pub status: u8,
    /// Task UID in its normalized integer form.
    pub uid: u64,
    payload: Bytes,
    /// Frame Check Sequence value, widened to `u64`.
    pub fcs: u64,
}

impl Packet {
    /// Build a packet with an empty (all-zero) payload.
    pub fn new(spec: &WireSpec, header: Header, uid: u64, status: u8) -> Result<Self> {
        Self::with_payload(spec, header, uid, status, &[])
    }

    /// Build a packet carrying `payload`.
    ///
    /// The payload may be at most [`WireSpec::payload_len`] bytes; unused
    /// capacity is zero-filled. The UID must fit the spec's UID width.
    pub fn with_payload(
        spec: &WireSpec,
        header: Header,
        uid: u64,
        status: u8,
        payload: &[u8],
    ) -> Result<Self> {
        let capacity = spec.payload_len();
        if payload.len() > capacity {
            return Err(WireError::PayloadTooLarge {
                size: payload.len(),
                capacity,
            });
        }
        check_uid_width(uid, spec.uid_width())?;

        let mut padded = BytesMut::zeroed(capacity);
        padded[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            header,
            status,
            uid,
            payload: padded.freeze(),
            fcs: 0,
        })
    }

    /// The zero-padded payload, exactly [`WireSpec::payload_len`] bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encode the full wire image, `spec.packet_size()` bytes.
    ///
    /// The FCS field (if any) is written from `self.fcs`; call
    /// [`seal`](crate::validator::seal) first for an outgoing packet.
    pub fn encode(&self, spec: &WireSpec) -> Bytes {
        let mut buf = BytesMut::with_capacity(spec.packet_size());
        self.header.encode(&mut buf);
        buf.put_u8(self.status);
        put_uint_le(&mut buf, self.uid, spec.uid_width());
        buf.put_slice(&self.payload);
        let fcs_len = spec.policy().size();
        if fcs_len > 0 {
            put_uint_le(&mut buf, self.fcs, fcs_len);
        }
        debug_assert_eq!(buf.len(), spec.packet_size());
        buf.freeze()
    }

    /// Decode one packet from exactly `spec.packet_size()` bytes.
    ///
    /// Every field is read verbatim; in particular the sender id names the
    /// remote device. Integrity is not checked here; that is
    /// [`is_valid`](crate::validator::is_valid)'s job.
    pub fn decode(spec: &WireSpec, bytes: &[u8]) -> Result<Self> {
        if bytes.len() < spec.packet_size() {
            return Err(WireError::ShortBuffer {
                len: bytes.len(),
                expected: spec.packet_size(),
            });
        }
        let mut src = &bytes[..spec.packet_size()];
        let header = Header::decode(&mut src);
        let status = src.get_u8();
        let uid = get_uint_le(&mut src, spec.uid_width());
        let payload = Bytes::copy_from_slice(&src[..spec.payload_len()]);
        src.advance(spec.payload_len());
        let fcs_len = spec.policy().size();
        let fcs = if fcs_len > 0 {
            get_uint_le(&mut src, fcs_len)
        } else {
            0
        };

        Ok(Self {
            header,
            status,
            uid,
            payload,
            fcs,
        })
    }
}

fn check_uid_width(uid: u64, width: usize) -> Result<()> {
    if width < 8 && uid >= 1u64 << (width * 8) {
        return Err(WireError::UidOutOfRange { uid, width });
    }
    Ok(())
}

fn put_uint_le(dst: &mut impl BufMut, value: u64, width: usize) {
    dst.put_slice(&value.to_le_bytes()[..width]);
}

fn get_uint_le(src: &mut impl Buf, width: usize) -> u64 {
    let mut raw = [0u8; 8];
    src.copy_to_slice(&mut raw[..width]);
    u64::from_le_bytes(raw)
}
