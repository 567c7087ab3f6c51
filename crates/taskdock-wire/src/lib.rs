//! Wire protocol for the taskdock task-dispatching runtime.
//!
//! Every command and reply travels as a fixed-size packet:
//! - A 6-byte header (4-byte control word + sender + receiver)
//! - A 1-byte status code
//! - A little-endian task UID
//! - A zero-padded payload
//! - An optional trailing Frame Check Sequence, selected per deployment
//!
//! The packet size, UID width, and FCS policy are fixed per deployment by a
//! [`WireSpec`]. Encoding and decoding are explicit functions over a byte
//! buffer; no packed-struct reinterpretation.

pub mod config;
pub mod error;
pub mod fcs;
pub mod header;
pub mod packet;
pub mod uid;
pub mod validator;

pub use config::{DeviceConfig, WireSpec, HEADER_LEN, PROTOCOL_VERSION};
pub use error::{Result, WireError};
pub use fcs::FcsPolicy;
pub use header::{Header, HeaderFlags, PacketKind};
pub use packet::Packet;
pub use uid::Uid;
pub use validator::{is_valid, seal};
