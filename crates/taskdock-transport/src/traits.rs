//! The transport capability set.

use crate::error::Result;

/// Non-blocking byte I/O over one concrete link.
///
/// This is the whole contract a driver implements; framing, validation, and
/// addressing live in [`Port`](crate::port::Port). A transport may be
/// connection-oriented (one active peer at a time) or connectionless; the
/// upper layers are indifferent.
pub trait Transport {
    /// Number of bytes currently buffered for reading.
    fn read_available(&mut self) -> usize;

    /// Read exactly `buf.len()` bytes.
    ///
    /// Callers only invoke this after `read_available` reported at least that
    /// many bytes; a transport that cannot honor the contract returns
    /// [`TransportError::ShortRead`](crate::error::TransportError::ShortRead).
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Write the whole buffer to the link.
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Whether a peer is currently reachable.
    ///
    /// Connectionless transports return `true` unconditionally.
    fn has_peer(&self) -> bool {
        true
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read_available(&mut self) -> usize {
        (**self).read_available()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }

    fn has_peer(&self) -> bool {
        (**self).has_peer()
    }
}
