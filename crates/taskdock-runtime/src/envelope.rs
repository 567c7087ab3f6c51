//! Opaque byte containers ferrying task parameters and results.

use bytes::Bytes;

/// An owned, opaque byte blob.
///
/// Tasks produce an envelope as their result; the manager ferries it to the
/// channel without interpreting it, and the bridge packs it into the reply
/// payload. How structured data gets in and out is the application's
/// business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    data: Bytes,
}

impl Envelope {
    /// An envelope with no contents.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an owned byte buffer.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// The carried bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of carried bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the envelope carries nothing.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A non-owning view of the contents.
    pub fn view(&self) -> EnvelopeView<'_> {
        EnvelopeView::new(&self.data)
    }

    /// Consume the envelope and return the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl From<Vec<u8>> for Envelope {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

/// A non-owning counterpart of [`Envelope`].
///
/// Inbound packet payloads are handed to task constructors as a view; a
/// constructor that needs the bytes past its own return copies them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeView<'a> {
    data: &'a [u8],
}

impl<'a> EnvelopeView<'a> {
    /// Wrap a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// The viewed bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of viewed bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the view is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy the viewed bytes into an owned envelope.
    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.data.to_vec())
    }
}
