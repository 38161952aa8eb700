//! mcpack codec error types

use thiserror::Error;

/// Malformed input found while decoding
///
/// Every variant carries the byte offset, relative to the start of the
/// decoded buffer, at which the problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before the current item was complete
    #[error("unexpected end of input at offset {offset}: need {needed} bytes, {available} left")]
    UnexpectedEndOfInput {
        /// Offset of the read that failed
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Tag byte matches no known category
    #[error("invalid tag {byte:#04x} at offset {offset}")]
    InvalidTag {
        /// Offset of the tag byte
        offset: usize,
        /// The offending byte
        byte: u8,
    },

    /// String content lacks its trailing NUL or holds an interior one
    #[error("malformed string at offset {offset}")]
    MalformedString {
        /// Offset of the string content
        offset: usize,
    },

    /// A nested item runs past the declared container length
    #[error("container length mismatch at offset {offset}: item overruns container ending at {end}")]
    ContainerLengthMismatch {
        /// Offset of the read that overran
        offset: usize,
        /// End offset declared by the enclosing container
        end: usize,
    },

    /// Name or string bytes are not valid UTF-8
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Offset of the text
        offset: usize,
    },

    /// Containers are nested deeper than the decoder allows
    #[error("nesting deeper than {limit} at offset {offset}")]
    DepthLimitExceeded {
        /// Offset of the container that crossed the limit
        offset: usize,
        /// Configured limit
        limit: usize,
    },

    /// Bytes remain after the single top-level item
    #[error("trailing bytes after document at offset {offset}")]
    TrailingBytes {
        /// Offset of the first unconsumed byte
        offset: usize,
    },

    /// The top-level item is a tombstone
    #[error("document root at offset {offset} is deleted")]
    DeletedRoot {
        /// Offset of the root tag
        offset: usize,
    },
}

impl DecodeError {
    /// Offset at which the error was detected
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedEndOfInput { offset, .. }
            | Self::InvalidTag { offset, .. }
            | Self::MalformedString { offset }
            | Self::ContainerLengthMismatch { offset, .. }
            | Self::InvalidUtf8 { offset }
            | Self::DepthLimitExceeded { offset, .. }
            | Self::TrailingBytes { offset }
            | Self::DeletedRoot { offset } => *offset,
        }
    }
}

/// A value tree that cannot be represented on the wire
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Content does not fit the 4-byte length field
    #[error("content too large: {size} bytes (max {max})")]
    ContentTooLarge {
        /// Content length
        size: usize,
        /// Maximum representable length
        max: usize,
    },

    /// Item name does not fit the 1-byte name length field
    #[error("name too long: {len} bytes (max 255)")]
    NameTooLong {
        /// Name length in bytes
        len: usize,
    },

    /// String value contains a NUL byte
    #[error("string contains NUL byte")]
    StringContainsNul,
}
