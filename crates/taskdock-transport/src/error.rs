/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying link.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport reported enough bytes but delivered fewer.
    #[error("transport under-read ({got} of {expected} bytes)")]
    ShortRead { got: usize, expected: usize },

    /// The transport has been shut down.
    #[error("transport shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, TransportError>;
