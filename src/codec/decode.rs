//! mcpack decoder
//!
//! # Item format
//!
//! ```text
//! [TAG (1)] [NAME LEN (1)] [NAME (NAME LEN)] [PAYLOAD]
//!
//! PAYLOAD = [VALUE (width)]                      fixed-width scalar
//!         | [CONTENT LEN (1 or 4)] [CONTENT]     object, array, string, raw
//!         | (nothing)                            null
//! ```
//!
//! Every bounds check happens before the read it guards, so no input can
//! make the decoder read past its buffer or panic.

use bytes::Bytes;
use tracing::trace;

use super::tag::{Category, Tag, Width};
use super::value::{Item, Value};
use super::{DecodeConfig, DecodeError};

type Result<T> = std::result::Result<T, DecodeError>;

/// Cursor over a borrowed mcpack buffer
///
/// A decoder is single-use state: once a call returns an error the cursor
/// position is unspecified and the decoder should be dropped.
#[derive(Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    /// End of the innermost container being parsed
    end: usize,
    depth: usize,
    config: DecodeConfig,
}

impl<'a> Decoder<'a> {
    /// Create a decoder with the default limits
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, DecodeConfig::default())
    }

    /// Create a decoder with explicit limits
    #[must_use]
    pub fn with_config(data: &'a [u8], config: DecodeConfig) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
            depth: 0,
            config,
        }
    }

    /// Current offset into the buffer
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the buffer
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Check if the whole buffer has been consumed
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Decode the next item
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::DeletedRoot`] if the item is a tombstone,
    /// or any structural error found while parsing it.
    pub fn item(&mut self) -> Result<Item> {
        let start = self.pos;
        self.read_item(true)?
            .ok_or(DecodeError::DeletedRoot { offset: start })
    }

    /// Parse one item; `None` for a skipped tombstone
    fn read_item(&mut self, named: bool) -> Result<Option<Item>> {
        let start = self.pos;
        self.need(2)?;

        let byte = self.read_u8()?;
        let tag = Tag::from_u8(byte).ok_or(DecodeError::InvalidTag {
            offset: start,
            byte,
        })?;

        let name_len = usize::from(self.read_u8()?);
        let name_offset = self.pos;
        let name_bytes = self.take(name_len)?;

        if tag.category() == Category::Deleted {
            self.skip_payload(tag)?;
            trace!(offset = start, %tag, "skipped deleted item");
            return Ok(None);
        }

        let name = if named {
            utf8(name_bytes, name_offset)?.to_owned()
        } else {
            String::new()
        };
        let value = self.read_payload(tag, start)?;
        Ok(Some(Item { name, value }))
    }

    fn read_payload(&mut self, tag: Tag, start: usize) -> Result<Value> {
        let value = match (tag.category(), tag.fixed_width()) {
            (Category::Null, _) => Value::Null,
            (Category::Bool, _) => Value::Bool(self.read_u8()? != 0),
            (Category::Int, Some(Width::W1)) => Value::Int8(i8::from_be_bytes(self.array()?)),
            (Category::Int, Some(Width::W2)) => Value::Int16(i16::from_be_bytes(self.array()?)),
            (Category::Int, Some(Width::W4)) => Value::Int32(i32::from_be_bytes(self.array()?)),
            (Category::Int, _) => Value::Int64(i64::from_be_bytes(self.array()?)),
            (Category::UInt, Some(Width::W1)) => Value::UInt8(self.read_u8()?),
            (Category::UInt, Some(Width::W2)) => Value::UInt16(u16::from_be_bytes(self.array()?)),
            (Category::UInt, Some(Width::W4)) => Value::UInt32(u32::from_be_bytes(self.array()?)),
            (Category::UInt, _) => Value::UInt64(u64::from_be_bytes(self.array()?)),
            (Category::Float, _) => Value::Float(f32::from_be_bytes(self.array()?)),
            (Category::Double, _) => Value::Double(f64::from_be_bytes(self.array()?)),
            (Category::Date, _) => Value::Date(i64::from_be_bytes(self.array()?)),
            (Category::String, _) => {
                let len = self.content_len(tag)?;
                let offset = self.pos;
                let content = self.take(len)?;
                Value::String(string(content, offset)?)
            }
            (Category::Raw, _) => {
                let len = self.content_len(tag)?;
                Value::Raw(Bytes::copy_from_slice(self.take(len)?))
            }
            (Category::Object, _) => {
                let len = self.content_len(tag)?;
                let mut entries = Vec::new();
                self.container(start, len, |decoder| {
                    if let Some(item) = decoder.read_item(true)? {
                        entries.push((item.name, item.value));
                    }
                    Ok(())
                })?;
                Value::Object(entries)
            }
            (Category::Array, _) => {
                let len = self.content_len(tag)?;
                let mut items = Vec::new();
                self.container(start, len, |decoder| {
                    if let Some(item) = decoder.read_item(false)? {
                        items.push(item.value);
                    }
                    Ok(())
                })?;
                Value::Array(items)
            }
            (Category::Deleted, _) => {
                return Err(DecodeError::InvalidTag {
                    offset: start,
                    byte: tag.as_u8(),
                });
            }
        };
        Ok(value)
    }

    /// Run `child` until exactly `len` bytes of nested items are consumed
    fn container<F>(&mut self, start: usize, len: usize, mut child: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        if self.depth >= self.config.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                offset: start,
                limit: self.config.max_depth,
            });
        }
        self.need(len)?;
        trace!(offset = start, len, depth = self.depth, "entering container");

        let outer_end = self.end;
        self.end = self.pos + len;
        self.depth += 1;
        while self.pos < self.end {
            child(self)?;
        }
        self.depth -= 1;
        self.end = outer_end;
        Ok(())
    }

    fn skip_payload(&mut self, tag: Tag) -> Result<()> {
        let len = if tag.requires_length_field() {
            self.content_len(tag)?
        } else {
            tag.fixed_width().map_or(0, Width::bytes)
        };
        self.take(len)?;
        Ok(())
    }

    fn content_len(&mut self, tag: Tag) -> Result<usize> {
        if tag.is_short() {
            Ok(usize::from(self.read_u8()?))
        } else {
            Ok(u32::from_be_bytes(self.array()?) as usize)
        }
    }

    fn need(&self, n: usize) -> Result<()> {
        let available = self.remaining();
        if n <= available {
            return Ok(());
        }
        if self.depth > 0 {
            Err(DecodeError::ContainerLengthMismatch {
                offset: self.pos,
                end: self.end,
            })
        } else {
            Err(DecodeError::UnexpectedEndOfInput {
                offset: self.pos,
                needed: n,
                available,
            })
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

fn utf8(bytes: &[u8], offset: usize) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset })
}

/// Strip the mandatory trailing NUL and reject interior ones
fn string(content: &[u8], offset: usize) -> Result<String> {
    match content.split_last() {
        Some((0, text)) if !text.contains(&0) => Ok(utf8(text, offset)?.to_owned()),
        _ => Err(DecodeError::MalformedString { offset }),
    }
}

/// Decode a single top-level item into a value
///
/// The item's name is discarded and the whole buffer must be consumed.
/// Names and string contents must be UTF-8; text in other encodings, such
/// as GBK, fails with [`DecodeError::InvalidUtf8`] and has to be carried
/// as RAW instead.
///
/// # Errors
///
/// Returns an error if the buffer is not exactly one well-formed item.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    decode_item(bytes).map(|item| item.value)
}

/// Decode a single top-level item, keeping its name
///
/// # Errors
///
/// Returns an error if the buffer is not exactly one well-formed item.
pub fn decode_item(bytes: &[u8]) -> Result<Item> {
    decode_item_with(bytes, DecodeConfig::default())
}

/// Decode a single top-level item with explicit limits
///
/// # Errors
///
/// Returns an error if the buffer is not exactly one well-formed item.
pub fn decode_item_with(bytes: &[u8], config: DecodeConfig) -> Result<Item> {
    let mut decoder = Decoder::with_config(bytes, config);
    let item = decoder.item()?;
    if !decoder.is_empty() {
        return Err(DecodeError::TrailingBytes {
            offset: decoder.position(),
        });
    }
    Ok(item)
}

/// Decode a frame body; an empty body is an absent document
///
/// # Errors
///
/// Returns an error if a non-empty body is not exactly one well-formed item.
pub fn decode_body(bytes: &[u8]) -> Result<Option<Value>> {
    if bytes.is_empty() {
        return Ok(None);
    }
    decode(bytes).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalar_object() {
        // { "count": UInt32(5) }
        let bytes = [
            0x90, 0x00, 0x0B, // object, no name, 11 content bytes
            0x24, 0x05, b'c', b'o', b'u', b'n', b't', 0x00, 0x00, 0x00, 0x05,
        ];

        let value = decode(&bytes).unwrap();
        assert_eq!(value, Value::object([("count", Value::UInt32(5))]));
    }

    #[test]
    fn test_decode_long_string() {
        let bytes = [0x50, 0x01, b's', 0x00, 0x00, 0x00, 0x03, b'h', b'i', 0x00];

        let item = decode_item(&bytes).unwrap();
        assert_eq!(item.name, "s");
        assert_eq!(item.value, Value::from("hi"));
    }

    #[test]
    fn test_decode_rejects_non_utf8_text() {
        // "中" in GBK
        let string = [0xD0, 0x00, 0x03, 0xD6, 0xD0, 0x00];
        assert_eq!(decode(&string), Err(DecodeError::InvalidUtf8 { offset: 3 }));

        let name = [0x61, 0x02, 0xD6, 0xD0];
        assert_eq!(decode(&name), Err(DecodeError::InvalidUtf8 { offset: 2 }));

        let raw = [0xE0, 0x00, 0x02, 0xD6, 0xD0];
        assert_eq!(decode(&raw).unwrap(), Value::raw(vec![0xD6, 0xD0]));
    }

    #[test]
    fn test_decode_bool_zero_is_false() {
        assert_eq!(decode(&[0x31, 0x00, 0x00]).unwrap(), Value::Bool(false));
        assert_eq!(decode(&[0x31, 0x00, 0x01]).unwrap(), Value::Bool(true));
        assert_eq!(decode(&[0x31, 0x00, 0x7F]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_decode_big_endian_scalars() {
        assert_eq!(decode(&[0x12, 0x00, 0xFF, 0xFE]).unwrap(), Value::Int16(-2));
        assert_eq!(
            decode(&[0x28, 0x00, 0, 0, 0, 0, 0, 0, 0x01, 0x00]).unwrap(),
            Value::UInt64(256)
        );
        assert_eq!(
            decode(&[0x44, 0x00, 0x3F, 0xC0, 0x00, 0x00]).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(decode(&[0x61, 0x00]).unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_string_requires_nul() {
        let bytes = [0xD0, 0x00, 0x02, b'h', b'i'];
        assert_eq!(
            decode(&bytes),
            Err(DecodeError::MalformedString { offset: 3 })
        );

        let interior = [0xD0, 0x00, 0x03, b'h', 0x00, 0x00];
        assert!(matches!(
            decode(&interior),
            Err(DecodeError::MalformedString { .. })
        ));

        let empty = [0xD0, 0x00, 0x00];
        assert!(matches!(
            decode(&empty),
            Err(DecodeError::MalformedString { .. })
        ));
    }

    #[test]
    fn test_decode_skips_deleted_items() {
        let bytes = [
            0x90, 0x00, 0x0B, // object, 11 content bytes
            0x74, 0x01, b'a', 0xDE, 0xAD, 0xBE, 0xEF, // tombstoned u32
            0x11, 0x01, b'b', 0x07, // b: Int8(7)
        ];

        let value = decode(&bytes).unwrap();
        assert_eq!(value, Value::object([("b", Value::Int8(7))]));
    }

    #[test]
    fn test_decode_skips_deleted_variable_item() {
        let bytes = [
            0xA0, 0x00, 0x09, // array, 9 content bytes
            0xF0, 0x00, 0x03, 0x01, 0x02, 0x03, // tombstoned short raw
            0x11, 0x00, 0x09,
        ];

        assert_eq!(decode(&bytes).unwrap(), Value::array([Value::Int8(9)]));
    }

    #[test]
    fn test_decode_deleted_root() {
        assert_eq!(
            decode(&[0x71, 0x00, 0x00]),
            Err(DecodeError::DeletedRoot { offset: 0 })
        );
    }

    #[test]
    fn test_decode_array_ignores_child_names() {
        let bytes = [0xA0, 0x00, 0x04, 0x11, 0x01, b'z', 0x01];

        assert_eq!(decode(&bytes).unwrap(), Value::array([Value::Int8(1)]));
    }

    #[test]
    fn test_decode_keeps_duplicate_names() {
        let bytes = [
            0x90, 0x00, 0x09, //
            0x11, 0x01, b'x', 0x01, //
            0xD0, 0x01, b'x', 0x01, 0x00,
        ];

        let value = decode(&bytes).unwrap();
        assert_eq!(
            value,
            Value::object([("x", Value::Int8(1)), ("x", Value::from(""))])
        );
    }

    #[test]
    fn test_decode_container_longer_than_buffer() {
        let bytes = [0x90, 0x00, 0x0A, 0x11, 0x01, b'a', 0x01, 0x61, 0x00];

        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::UnexpectedEndOfInput { offset: 3, needed: 10, available: 6 })
        ));
    }

    #[test]
    fn test_decode_child_overruns_container() {
        // container declares 3 bytes, the child needs 4
        let bytes = [0x90, 0x00, 0x03, 0x11, 0x01, b'a', 0x01];

        assert_eq!(
            decode(&bytes),
            Err(DecodeError::ContainerLengthMismatch { offset: 6, end: 6 })
        );
    }

    #[test]
    fn test_decode_invalid_tag() {
        assert_eq!(
            decode(&[0x90, 0x00, 0x02, 0x03, 0x00]),
            Err(DecodeError::InvalidTag { offset: 3, byte: 0x03 })
        );
    }

    #[test]
    fn test_decode_trailing_bytes() {
        assert_eq!(
            decode(&[0x61, 0x00, 0x61]),
            Err(DecodeError::TrailingBytes { offset: 2 })
        );
    }

    #[test]
    fn test_decode_depth_limit() {
        // three nested empty-ish arrays: [[[]]]
        let bytes = [0xA0, 0x00, 0x06, 0xA0, 0x00, 0x03, 0xA0, 0x00, 0x00];
        let config = DecodeConfig { max_depth: 2 };

        assert_eq!(
            decode_item_with(&bytes, config),
            Err(DecodeError::DepthLimitExceeded { offset: 6, limit: 2 })
        );
        assert!(decode(&bytes).is_ok());
    }

    #[test]
    fn test_decode_body_empty_is_absent() {
        assert_eq!(decode_body(&[]), Ok(None));
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn test_decode_every_truncation_fails() {
        let bytes = [
            0x90, 0x00, 0x0D, //
            0x20, 0x01, b'l', 0x00, 0x00, 0x00, 0x03, 0x11, 0x00, 0x01, //
            0x61, 0x01, b'n',
        ];
        assert!(decode(&bytes).is_ok());

        for len in 0..bytes.len() {
            assert!(decode(&bytes[..len]).is_err(), "prefix of {len} bytes");
        }
    }
}
