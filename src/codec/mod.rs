//! mcpack wire format
//!
//! This module provides the tag model, the generic value tree, and the
//! decoder and encoder between the two.

mod decode;
mod encode;
mod error;
mod tag;
mod value;

pub use decode::{Decoder, decode, decode_body, decode_item, decode_item_with};
pub use encode::{Encoder, encode, encode_document};
pub use error::{DecodeError, EncodeError};
pub use tag::{
    Category, FIXED_ITEM_MASK, Kind, MAX_LONG_CONTENT, MAX_SHORT_CONTENT, SHORT_ITEM, Tag, Width,
    decode_tag, length_field_width, requires_length_field,
};
pub use value::{Item, Value};

/// Default container nesting limit
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Limits applied while decoding untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Deepest allowed container nesting; the root container is depth 1
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
