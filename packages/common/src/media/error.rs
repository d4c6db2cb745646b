use thiserror::Error;

/// Errors that can occur during media storage operations.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The requested media file was not found.
    #[error("media file not found: {0}")]
    NotFound(String),
    /// An I/O error occurred.
    #[error("media storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file name is empty or contains path components.
    #[error("invalid media file name: {0}")]
    InvalidName(String),
    /// The file exceeds the size ceiling for its media kind.
    #[error("media file exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge { actual: u64, limit: u64 },
}
