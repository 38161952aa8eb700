//! mcpack encoder
//!
//! Short or long length fields are chosen per item from the content length
//! alone, so re-encoding a decoded tree may differ byte-wise from the input
//! while always decoding back to an equal value.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use super::EncodeError;
use super::tag::{Category, Kind, MAX_SHORT_CONTENT, SHORT_ITEM};
use super::value::Value;

type Result<T> = std::result::Result<T, EncodeError>;

/// Growable buffer of back-to-back mcpack items
#[derive(Debug, Default)]
pub struct Encoder {
    buf: BytesMut,
}

impl Encoder {
    /// Create an empty encoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with a pre-allocated buffer
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Append one named item
    ///
    /// On error nothing is appended.
    pub fn item(&mut self, name: &str, value: &Value) -> Result<&mut Self> {
        let start = self.buf.len();
        if let Err(err) = self.write_item(name.as_bytes(), value) {
            self.buf.truncate(start);
            return Err(err);
        }
        Ok(self)
    }

    /// Bytes written so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take the encoded bytes
    #[must_use]
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }

    fn write_item(&mut self, name: &[u8], value: &Value) -> Result<()> {
        match value {
            Value::Null => self.header(value.kind(), name, false),
            Value::Bool(v) => self.fixed(value, name, |buf| buf.put_u8(u8::from(*v))),
            Value::Int8(v) => self.fixed(value, name, |buf| buf.put_i8(*v)),
            Value::Int16(v) => self.fixed(value, name, |buf| buf.put_i16(*v)),
            Value::Int32(v) => self.fixed(value, name, |buf| buf.put_i32(*v)),
            Value::Int64(v) => self.fixed(value, name, |buf| buf.put_i64(*v)),
            Value::UInt8(v) => self.fixed(value, name, |buf| buf.put_u8(*v)),
            Value::UInt16(v) => self.fixed(value, name, |buf| buf.put_u16(*v)),
            Value::UInt32(v) => self.fixed(value, name, |buf| buf.put_u32(*v)),
            Value::UInt64(v) => self.fixed(value, name, |buf| buf.put_u64(*v)),
            Value::Float(v) => self.fixed(value, name, |buf| buf.put_f32(*v)),
            Value::Double(v) => self.fixed(value, name, |buf| buf.put_f64(*v)),
            Value::Date(v) => self.fixed(value, name, |buf| buf.put_i64(*v)),
            Value::String(text) => {
                if text.as_bytes().contains(&0) {
                    return Err(EncodeError::StringContainsNul);
                }
                self.sized(Category::String, name, text.len() + 1)?;
                self.buf.put_slice(text.as_bytes());
                self.buf.put_u8(0);
                Ok(())
            }
            Value::Raw(bytes) => {
                self.sized(Category::Raw, name, bytes.len())?;
                self.buf.put_slice(bytes);
                Ok(())
            }
            Value::Array(items) => self.container(Category::Array, name, |encoder| {
                items
                    .iter()
                    .try_for_each(|item| encoder.write_item(&[], item))
            }),
            Value::Object(entries) => self.container(Category::Object, name, |encoder| {
                entries
                    .iter()
                    .try_for_each(|(key, item)| encoder.write_item(key.as_bytes(), item))
            }),
        }
    }

    /// Tag, name length and name
    fn header(&mut self, kind: Kind, name: &[u8], short: bool) -> Result<()> {
        let name_len =
            u8::try_from(name.len()).map_err(|_| EncodeError::NameTooLong { len: name.len() })?;
        self.buf.put_u8(kind.tag_byte(short));
        self.buf.put_u8(name_len);
        self.buf.put_slice(name);
        Ok(())
    }

    fn fixed<F>(&mut self, value: &Value, name: &[u8], put: F) -> Result<()>
    where
        F: FnOnce(&mut BytesMut),
    {
        self.header(value.kind(), name, false)?;
        put(&mut self.buf);
        Ok(())
    }

    /// Header and length field for content whose length is known up front
    fn sized(&mut self, category: Category, name: &[u8], len: usize) -> Result<()> {
        let short = len <= MAX_SHORT_CONTENT;
        let long = u32::try_from(len).map_err(|_| content_too_large(len))?;
        self.header(Kind::of(category), name, short)?;
        if short {
            self.buf.put_u8(len as u8);
        } else {
            self.buf.put_u32(long);
        }
        Ok(())
    }

    /// Write children behind a 4-byte length placeholder, then shrink it
    /// to the short form if the content fits
    fn container<F>(&mut self, category: Category, name: &[u8], children: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let start = self.buf.len();
        self.header(Kind::of(category), name, false)?;
        let len_pos = self.buf.len();
        self.buf.put_u32(0);

        children(self)?;

        let content_start = len_pos + 4;
        let len = self.buf.len() - content_start;
        if len <= MAX_SHORT_CONTENT {
            self.buf[start] |= SHORT_ITEM;
            self.buf[len_pos] = len as u8;
            self.buf.copy_within(content_start.., len_pos + 1);
            self.buf.truncate(self.buf.len() - 3);
        } else {
            let long = u32::try_from(len).map_err(|_| content_too_large(len))?;
            self.buf[len_pos..content_start].copy_from_slice(&long.to_be_bytes());
        }
        trace!(%category, len, short = len <= MAX_SHORT_CONTENT, "encoded container");
        Ok(())
    }
}

fn content_too_large(size: usize) -> EncodeError {
    EncodeError::ContentTooLarge {
        size,
        max: u32::MAX as usize,
    }
}

/// Encode a value as a single item named `name`
///
/// # Errors
///
/// Returns an error if the name exceeds 255 bytes, a string holds a NUL,
/// or some content exceeds the 4-byte length field.
pub fn encode(value: &Value, name: &str) -> Result<Bytes> {
    let mut encoder = Encoder::new();
    encoder.item(name, value)?;
    Ok(encoder.finish())
}

/// Encode a top-level value with an empty name
///
/// # Errors
///
/// See [`encode`].
pub fn encode_document(value: &Value) -> Result<Bytes> {
    encode(value, "")
}
