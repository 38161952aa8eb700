//! nshead frame header
//!
//! The header is 36 bytes, big-endian, and precedes exactly `body_len`
//! body bytes.

use uuid::Uuid;

use super::{FrameError, HEADER_SIZE, MAGIC_NUMBER, PROVIDER_LEN};

/// nshead frame header (36 bytes)
///
/// # Wire Format
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            Id (2)             |          Version (2)          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Log ID (4)                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                                                               +
/// |                         Provider (16)                         |
/// +                                                               +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Magic Number (4)                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Reserved (4)                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Body Length (4)                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NsHead {
    id: u16,
    version: u16,
    log_id: u32,
    provider: [u8; PROVIDER_LEN],
    magic: u32,
    reserved: u32,
    body_len: u32,
}

impl NsHead {
    /// Create a new header with an empty body
    #[must_use]
    pub fn new(id: u16, version: u16, log_id: u32) -> Self {
        Self {
            id,
            version,
            log_id,
            ..Self::default()
        }
    }

    /// Create a header with a random log id
    #[must_use]
    pub fn with_random_log_id(id: u16, version: u16) -> Self {
        Self::new(id, version, Self::generate_log_id())
    }

    /// Set the provider tag, truncated to 16 bytes
    #[must_use]
    pub fn with_provider(mut self, provider: &str) -> Self {
        let bytes = provider.as_bytes();
        let len = bytes.len().min(PROVIDER_LEN);
        self.provider = [0u8; PROVIDER_LEN];
        self.provider[..len].copy_from_slice(&bytes[..len]);
        self
    }

    /// Set the reserved word
    #[must_use]
    pub const fn with_reserved(mut self, reserved: u32) -> Self {
        self.reserved = reserved;
        self
    }

    /// Get id
    #[must_use]
    pub const fn id(&self) -> u16 {
        self.id
    }

    /// Get version
    #[must_use]
    pub const fn version(&self) -> u16 {
        self.version
    }

    /// Get log id
    #[must_use]
    pub const fn log_id(&self) -> u32 {
        self.log_id
    }

    /// Get raw provider bytes
    #[must_use]
    pub const fn provider(&self) -> &[u8; PROVIDER_LEN] {
        &self.provider
    }

    /// Get provider up to its first NUL, if it is valid UTF-8
    #[must_use]
    pub fn provider_name(&self) -> Option<&str> {
        let end = self
            .provider
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(PROVIDER_LEN);
        std::str::from_utf8(&self.provider[..end]).ok()
    }

    /// Get magic number
    #[must_use]
    pub const fn magic(&self) -> u32 {
        self.magic
    }

    /// Get reserved word
    #[must_use]
    pub const fn reserved(&self) -> u32 {
        self.reserved
    }

    /// Get body length
    #[must_use]
    pub const fn body_len(&self) -> u32 {
        self.body_len
    }

    /// Set body length and restore the magic number
    pub(crate) fn seal(&mut self, body_len: u32) {
        self.body_len = body_len;
        self.magic = MAGIC_NUMBER;
    }

    /// Derive a log id from a random UUID
    fn generate_log_id() -> u32 {
        let uuid = Uuid::new_v4();
        let bytes = uuid.as_bytes();
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Validate header
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.magic != MAGIC_NUMBER {
            return Err(FrameError::InvalidMagic { found: self.magic });
        }
        Ok(())
    }

    /// Convert to bytes (big-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..2].copy_from_slice(&self.id.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.version.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.log_id.to_be_bytes());
        bytes[8..24].copy_from_slice(&self.provider);
        bytes[24..28].copy_from_slice(&self.magic.to_be_bytes());
        bytes[28..32].copy_from_slice(&self.reserved.to_be_bytes());
        bytes[32..36].copy_from_slice(&self.body_len.to_be_bytes());

        bytes
    }

    /// Parse from bytes (big-endian)
    ///
    /// Only the first 36 bytes are read.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let Some(bytes) = bytes.first_chunk::<HEADER_SIZE>() else {
            return Err(FrameError::BufferTooSmall {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        };

        let be_u16 = |at: usize| u16::from_be_bytes([bytes[at], bytes[at + 1]]);
        let be_u32 = |at: usize| {
            u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        let mut provider = [0u8; PROVIDER_LEN];
        provider.copy_from_slice(&bytes[8..24]);

        let header = Self {
            id: be_u16(0),
            version: be_u16(2),
            log_id: be_u32(4),
            provider,
            magic: be_u32(24),
            reserved: be_u32(28),
            body_len: be_u32(32),
        };

        header.validate()?;
        Ok(header)
    }
}

impl Default for NsHead {
    fn default() -> Self {
        Self {
            id: 0,
            version: 0,
            log_id: 0,
            provider: [0u8; PROVIDER_LEN],
            magic: MAGIC_NUMBER,
            reserved: 0,
            body_len: 0,
        }
    }
}
