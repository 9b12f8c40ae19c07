//! Error handling for mp3seg
//!
//! Malformed tags are never errors: they are folded into regions by the
//! segmenter. What remains is construction failure, the end-of-sequence
//! signal, bad configuration and I/O from the underlying reader.

use thiserror::Error;

/// Result type alias for mp3seg operations
pub type Result<T> = std::result::Result<T, SegmentError>;

/// Main error type for mp3seg operations
#[derive(Error, Debug)]
pub enum SegmentError {
    // Construction Errors
    #[error("No payload: leading tags end at {tags_end} of a {stream_len} byte stream")]
    NoPayload { stream_len: u64, tags_end: u64 },

    // Sequence Errors
    #[error("Region sequence exhausted")]
    Exhausted,

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SegmentError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SegmentError::NoPayload { .. } => "NO_PAYLOAD",
            SegmentError::Exhausted => "EXHAUSTED",
            SegmentError::InvalidConfig { .. } => "INVALID_CONFIG",
            SegmentError::Io(_) => "IO_ERROR",
            SegmentError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// True for the end-of-sequence signal, which is not a data error
    pub fn is_end_of_sequence(&self) -> bool {
        matches!(self, SegmentError::Exhausted)
    }

    /// Check if the caller can carry on with the same stream
    ///
    /// `NoPayload` is final for that stream; an exhausted sequence can be
    /// replaced by a fresh segmenter.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SegmentError::Exhausted => true,
            SegmentError::InvalidConfig { .. } => true,
            SegmentError::NoPayload { .. } => false,
            SegmentError::Io(_) => false,
            SegmentError::Serialization(_) => true,
        }
    }
}
