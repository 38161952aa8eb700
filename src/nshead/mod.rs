//! nshead framing
//!
//! A fixed 36-byte header that delimits one body, usually an mcpack
//! document, on a byte stream or in a file.

mod error;
mod header;
mod packet;

pub use error::FrameError;
pub use header::NsHead;
pub use packet::Packet;

/// nshead magic number
pub const MAGIC_NUMBER: u32 = 0xFB70_9394;

/// Header size in bytes
pub const HEADER_SIZE: usize = 36;

/// Provider tag size in bytes
pub const PROVIDER_LEN: usize = 16;

/// Largest body a packet may carry
pub const MAX_BODY_SIZE: u32 = i32::MAX as u32;

/// Limits applied while reading frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Largest body accepted from a header
    pub max_body_len: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_body_len: MAX_BODY_SIZE,
        }
    }
}
