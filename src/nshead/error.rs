//! nshead framing errors

use thiserror::Error;

/// Frame could not be read or written
#[derive(Error, Debug)]
pub enum FrameError {
    /// Underlying reader or writer failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Header magic number is wrong
    #[error("invalid magic number: expected 0xFB709394, got {found:#x}")]
    InvalidMagic {
        /// Found magic number
        found: u32,
    },

    /// Buffer too small to hold a header
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Stream ended before the declared body length
    #[error("short body: expected {expected} bytes, got {got}")]
    ShortBody {
        /// Declared body length
        expected: usize,
        /// Bytes actually available
        got: usize,
    },

    /// Body exceeds the frame limit
    #[error("body too large: {size} bytes (max {max})")]
    BodyTooLarge {
        /// Body size
        size: usize,
        /// Maximum allowed
        max: usize,
    },
}
