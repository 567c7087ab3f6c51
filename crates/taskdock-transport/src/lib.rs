//! Transport abstraction for the taskdock runtime.
//!
//! Three layers, lowest first:
//! - [`Transport`] — the capability set any concrete link (UART, TCP, radio,
//!   an in-memory pair in tests) must provide: non-blocking byte I/O.
//! - [`Port`] — the validator pipeline over one transport: whole-packet
//!   reads, addressee filtering, FCS verification on receive, sealing on
//!   send.
//! - [`Hub`] — fan-out/fan-in across a fixed set of ports with per-direction
//!   enable bits.
//!
//! Concrete transport drivers live outside this crate; everything here is
//! indifferent to whether the link is connection-oriented or connectionless.

pub mod error;
pub mod hub;
pub mod port;
pub mod traits;

pub use error::{Result, TransportError};
pub use hub::{DynPort, Hub};
pub use port::Port;
pub use traits::Transport;
