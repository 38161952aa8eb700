//! nshead packets: a header plus its body

use std::io::{Read, Write};

use bytes::Bytes;
use tracing::debug;

use super::{FrameConfig, FrameError, HEADER_SIZE, MAX_BODY_SIZE, NsHead};
use crate::codec::{self, DecodeError, Value};

/// nshead packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet header
    header: NsHead,
    /// Packet body
    body: Bytes,
}

impl Packet {
    /// Create a packet; the header's body length and magic are recomputed
    /// when the packet is written
    pub fn new(header: NsHead, body: impl Into<Bytes>) -> Self {
        Self {
            header,
            body: body.into(),
        }
    }

    /// Create a packet whose body is `value` encoded as an mcpack document
    pub fn from_value(header: NsHead, value: &Value) -> crate::Result<Self> {
        let body = codec::encode_document(value)?;
        Ok(Self::new(header, body))
    }

    /// Get header
    #[must_use]
    pub const fn header(&self) -> &NsHead {
        &self.header
    }

    /// Get mutable header
    pub fn header_mut(&mut self) -> &mut NsHead {
        &mut self.header
    }

    /// Get body
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Split into header and body
    #[must_use]
    pub fn into_parts(self) -> (NsHead, Bytes) {
        (self.header, self.body)
    }

    /// Decode the body as an mcpack document; an empty body is `None`
    pub fn decode_body(&self) -> Result<Option<Value>, DecodeError> {
        codec::decode_body(&self.body)
    }

    /// Read one packet with the default limits
    pub fn read_from<R: Read>(reader: R) -> Result<Self, FrameError> {
        Self::read_from_with(reader, &FrameConfig::default())
    }

    /// Read one packet
    ///
    /// A body longer than `config.max_body_len` is rejected before any of
    /// it is read.
    pub fn read_from_with<R: Read>(mut reader: R, config: &FrameConfig) -> Result<Self, FrameError> {
        let mut head = [0u8; HEADER_SIZE];
        reader.read_exact(&mut head)?;
        let header = NsHead::from_bytes(&head)?;

        let expected = header.body_len() as usize;
        if header.body_len() > config.max_body_len {
            return Err(FrameError::BodyTooLarge {
                size: expected,
                max: config.max_body_len as usize,
            });
        }

        let mut body = Vec::new();
        reader
            .take(u64::from(header.body_len()))
            .read_to_end(&mut body)?;
        if body.len() < expected {
            return Err(FrameError::ShortBody {
                expected,
                got: body.len(),
            });
        }

        debug!(
            id = header.id(),
            log_id = header.log_id(),
            body_len = expected,
            "read nshead packet"
        );
        Ok(Self {
            header,
            body: Bytes::from(body),
        })
    }

    /// Parse one packet from the front of a buffer
    ///
    /// Bytes after the declared body are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let header = NsHead::from_bytes(bytes)?;
        let expected = header.body_len() as usize;
        let body = HEADER_SIZE
            .checked_add(expected)
            .and_then(|end| bytes.get(HEADER_SIZE..end))
            .ok_or(FrameError::ShortBody {
                expected,
                got: bytes.len() - HEADER_SIZE,
            })?;

        Ok(Self {
            header,
            body: Bytes::copy_from_slice(body),
        })
    }

    /// Header as it will be written: body length and magic recomputed
    pub fn sealed_header(&self) -> Result<NsHead, FrameError> {
        let size = self.body.len();
        if size > MAX_BODY_SIZE as usize {
            return Err(FrameError::BodyTooLarge {
                size,
                max: MAX_BODY_SIZE as usize,
            });
        }
        let mut header = self.header;
        header.seal(size as u32);
        Ok(header)
    }

    /// Write header and body
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), FrameError> {
        let header = self.sealed_header()?;
        writer.write_all(&header.to_bytes())?;
        writer.write_all(&self.body)?;
        debug!(
            id = header.id(),
            log_id = header.log_id(),
            body_len = header.body_len(),
            "wrote nshead packet"
        );
        Ok(())
    }

    /// Encode header and body into one buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, FrameError> {
        let header = self.sealed_header()?;
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.body.len());
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&self.body);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes_recomputes_length_and_magic() {
        let mut packet = Packet::new(NsHead::new(1, 2, 3), &b"ZHANG"[..]);
        packet.header_mut().seal(99);

        let bytes = packet.to_bytes().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 5);
        assert_eq!(bytes[32..36], 5u32.to_be_bytes());
        assert_eq!(&bytes[HEADER_SIZE..], b"ZHANG");
    }

    #[test]
    fn test_from_bytes_short_body() {
        let packet = Packet::new(NsHead::default(), &b"abcdef"[..]);
        let bytes = packet.to_bytes().unwrap();

        let result = Packet::from_bytes(&bytes[..bytes.len() - 2]);
        assert!(matches!(
            result,
            Err(FrameError::ShortBody { expected: 6, got: 4 })
        ));
    }

    #[test]
    fn test_empty_body_is_absent_document() {
        let packet = Packet::new(NsHead::default(), Bytes::new());
        let bytes = packet.to_bytes().unwrap();

        let decoded = Packet::from_bytes(&bytes).unwrap();
        assert!(decoded.body().is_empty());
        assert_eq!(decoded.decode_body(), Ok(None));
    }
}
