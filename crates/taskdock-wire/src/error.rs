/// Errors that can occur while building or (de)serializing packets.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The packet size is not a multiple of the machine word size.
    #[error("packet size {size} is not a multiple of the machine word ({word} bytes)")]
    UnalignedPacketSize { size: usize, word: usize },

    /// The UID width is not one of the supported integer widths.
    #[error("unsupported uid width {0} (expected 1, 2, 4, or 8)")]
    UnsupportedUidWidth(usize),

    /// Header, status, UID, and FCS do not leave room for a payload.
    #[error("packet size {size} too small for header, status, uid({uid_width}) and fcs({fcs_len})")]
    PacketTooSmall {
        size: usize,
        uid_width: usize,
        fcs_len: usize,
    },

    /// The payload exceeds the spec's payload capacity.
    #[error("payload too large ({size} bytes, capacity {capacity})")]
    PayloadTooLarge { size: usize, capacity: usize },

    /// The UID value does not fit in the spec's UID width.
    #[error("uid value {uid:#x} does not fit in {width} byte(s)")]
    UidOutOfRange { uid: u64, width: usize },

    /// The buffer is shorter than one full packet.
    #[error("short packet buffer ({len} bytes, expected {expected})")]
    ShortBuffer { len: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;
