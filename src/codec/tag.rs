//! mcpack tag bytes, categories and widths

use std::fmt;

use super::DecodeError;

/// Modifier bit selecting a 1-byte content length on variable-length items
pub const SHORT_ITEM: u8 = 0x80;

/// Low nibble of a fixed-width tag holds the payload width
pub const FIXED_ITEM_MASK: u8 = 0x0F;

/// Largest content length representable by the short-item length field
pub const MAX_SHORT_CONTENT: usize = u8::MAX as usize;

/// Largest content length representable by the long-item length field
pub const MAX_LONG_CONTENT: usize = u32::MAX as usize;

/// Value categories encoded by a tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Named children
    Object,
    /// Positional children
    Array,
    /// NUL-terminated text
    String,
    /// Opaque bytes
    Raw,
    /// Signed integer
    Int,
    /// Unsigned integer
    UInt,
    /// Boolean
    Bool,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// 64-bit signed timestamp
    Date,
    /// Null
    Null,
    /// Tombstoned item, skipped on decode
    Deleted,
}

impl Category {
    /// Tag bits of the category, without the width nibble or short-item bit
    #[must_use]
    pub const fn base(self) -> u8 {
        match self {
            Self::Object => 0x10,
            Self::Array => 0x20,
            Self::String => 0x50,
            Self::Raw => 0x60,
            Self::Int => 0x10,
            Self::UInt => 0x20,
            Self::Bool => 0x30,
            Self::Float => 0x40,
            Self::Double => 0x40,
            Self::Date => 0x50,
            Self::Null => 0x61,
            Self::Deleted => 0x70,
        }
    }

    /// Whether items of this category carry a content length field
    #[must_use]
    pub const fn requires_length_field(self) -> bool {
        matches!(self, Self::Object | Self::Array | Self::String | Self::Raw)
    }

    /// Whether this is a container category
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    /// Lowercase name for diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Raw => "raw",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Double => "double",
            Self::Date => "date",
            Self::Null => "null",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload width of a fixed-size scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Width {
    /// 1 byte
    W1 = 1,
    /// 2 bytes
    W2 = 2,
    /// 4 bytes
    W4 = 4,
    /// 8 bytes
    W8 = 8,
}

impl Width {
    /// Convert from the low nibble of a tag
    #[must_use]
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            1 => Some(Self::W1),
            2 => Some(Self::W2),
            4 => Some(Self::W4),
            8 => Some(Self::W8),
            _ => None,
        }
    }

    /// Width in bytes
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Width as the low nibble of a tag
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A category together with its fixed width, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kind {
    /// Value category
    pub category: Category,
    /// Payload width for fixed-size scalars
    pub width: Option<Width>,
}

impl Kind {
    /// Kind without a fixed width
    #[must_use]
    pub const fn of(category: Category) -> Self {
        Self {
            category,
            width: None,
        }
    }

    /// Kind with a fixed width
    #[must_use]
    pub const fn sized(category: Category, width: Width) -> Self {
        Self {
            category,
            width: Some(width),
        }
    }

    /// Tag byte for this kind
    ///
    /// The short-item bit is only applied to kinds that carry a length field.
    #[must_use]
    pub const fn tag_byte(self, short: bool) -> u8 {
        let width = match self.width {
            Some(width) => width.as_u8(),
            None => 0,
        };
        let byte = self.category.base() | width;
        if short && self.width.is_none() && !matches!(self.category, Category::Null) {
            byte | SHORT_ITEM
        } else {
            byte
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width {
            Some(width) => write!(f, "{}{}", self.category, width.bytes() * 8),
            None => write!(f, "{}", self.category),
        }
    }
}

/// A validated tag byte
///
/// # Layout
///
/// ```text
///   7   6   5   4   3   2   1   0
/// +---+---------------+---------------+
/// | S |   category    |  fixed width  |
/// +---+---------------+---------------+
/// ```
///
/// `S` is the short-item modifier and is only legal on variable-length
/// tags. A tombstone (`0x70`) keeps the width nibble of the item it
/// replaced so its payload can still be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    byte: u8,
    kind: Kind,
}

impl Tag {
    /// Parse a tag byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        let short = byte & SHORT_ITEM != 0;
        let kind = match byte & !SHORT_ITEM {
            0x10 => Kind::of(Category::Object),
            0x20 => Kind::of(Category::Array),
            0x50 => Kind::of(Category::String),
            0x60 => Kind::of(Category::Raw),
            0x70 => Kind::of(Category::Deleted),
            _ if short => return None,
            0x61 => Kind::of(Category::Null),
            0x31 => Kind::sized(Category::Bool, Width::W1),
            0x44 => Kind::sized(Category::Float, Width::W4),
            0x48 => Kind::sized(Category::Double, Width::W8),
            0x58 => Kind::sized(Category::Date, Width::W8),
            other => {
                let width = Width::from_nibble(other & FIXED_ITEM_MASK)?;
                let category = match other & !FIXED_ITEM_MASK {
                    0x10 => Category::Int,
                    0x20 => Category::UInt,
                    0x70 => Category::Deleted,
                    _ => return None,
                };
                Kind::sized(category, width)
            }
        };
        Some(Self { byte, kind })
    }

    /// Tag for encoding a value of `kind`; `short` selects the 1-byte length field
    ///
    /// Returns `None` for kinds with no wire tag, such as a fixed category
    /// without its width.
    pub fn for_kind(kind: Kind, short: bool) -> Option<Self> {
        Self::from_u8(kind.tag_byte(short)).filter(|tag| tag.kind == kind)
    }

    /// Raw tag byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.byte
    }

    /// Category and fixed width
    #[must_use]
    pub const fn kind(self) -> Kind {
        self.kind
    }

    /// Category
    #[must_use]
    pub const fn category(self) -> Category {
        self.kind.category
    }

    /// Fixed payload width, if any
    #[must_use]
    pub const fn fixed_width(self) -> Option<Width> {
        self.kind.width
    }

    /// Whether the item carries a content length field
    ///
    /// True for objects, arrays, strings and raws, and for tombstones that
    /// replaced one of them.
    #[must_use]
    pub const fn requires_length_field(self) -> bool {
        match self.kind.category {
            Category::Deleted => self.kind.width.is_none(),
            category => category.requires_length_field(),
        }
    }

    /// Whether the short-item modifier is set
    #[must_use]
    pub const fn is_short(self) -> bool {
        self.byte & SHORT_ITEM != 0
    }

    /// Width in bytes of the content length field (1 or 4)
    #[must_use]
    pub const fn length_field_width(self) -> usize {
        if self.is_short() { 1 } else { 4 }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.kind, self.byte)
    }
}

/// Decode a tag byte into its category and fixed width
pub fn decode_tag(byte: u8) -> Result<(Category, Option<Width>), DecodeError> {
    Tag::from_u8(byte)
        .map(|tag| (tag.category(), tag.fixed_width()))
        .ok_or(DecodeError::InvalidTag { offset: 0, byte })
}

/// Whether items of `category` carry a content length field
#[must_use]
pub const fn requires_length_field(category: Category) -> bool {
    category.requires_length_field()
}

/// Width of the content length field selected by the tag's modifier bit
#[must_use]
pub const fn length_field_width(tag: u8) -> usize {
    if tag & SHORT_ITEM != 0 { 1 } else { 4 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        let cases = [
            (0x10, Category::Object, None),
            (0x90, Category::Object, None),
            (0x20, Category::Array, None),
            (0xA0, Category::Array, None),
            (0x50, Category::String, None),
            (0xD0, Category::String, None),
            (0x60, Category::Raw, None),
            (0xE0, Category::Raw, None),
            (0x11, Category::Int, Some(Width::W1)),
            (0x18, Category::Int, Some(Width::W8)),
            (0x22, Category::UInt, Some(Width::W2)),
            (0x24, Category::UInt, Some(Width::W4)),
            (0x31, Category::Bool, Some(Width::W1)),
            (0x44, Category::Float, Some(Width::W4)),
            (0x48, Category::Double, Some(Width::W8)),
            (0x58, Category::Date, Some(Width::W8)),
            (0x61, Category::Null, None),
            (0x70, Category::Deleted, None),
            (0xF0, Category::Deleted, None),
            (0x74, Category::Deleted, Some(Width::W4)),
        ];

        for (byte, category, width) in cases {
            assert_eq!(decode_tag(byte).unwrap(), (category, width), "tag {byte:#04x}");
        }
    }

    #[test]
    fn test_short_flag_only_on_variable_tags() {
        for byte in [0x91, 0xA4, 0xB1, 0xC8, 0xD8, 0xE1, 0xF4] {
            assert!(matches!(
                decode_tag(byte),
                Err(DecodeError::InvalidTag { byte: b, .. }) if b == byte
            ));
        }
    }

    #[test]
    fn test_tag_totality() {
        let valid: Vec<u8> = (0u8..=255).filter(|b| Tag::from_u8(*b).is_some()).collect();
        let expected = [
            0x10, 0x11, 0x12, 0x14, 0x18, //
            0x20, 0x21, 0x22, 0x24, 0x28, //
            0x31, 0x44, 0x48, 0x50, 0x58, 0x60, 0x61, //
            0x70, 0x71, 0x72, 0x74, 0x78, //
            0x90, 0xA0, 0xD0, 0xE0, 0xF0,
        ];
        assert_eq!(valid, expected);

        for byte in 0u8..=255 {
            match decode_tag(byte) {
                Ok((Category::Int | Category::UInt | Category::Bool, width)) => {
                    assert!(width.is_some(), "tag {byte:#04x}");
                }
                Ok(_) => {}
                Err(err) => assert_eq!(err, DecodeError::InvalidTag { offset: 0, byte }),
            }
        }
    }

    #[test]
    fn test_length_field_width() {
        assert_eq!(length_field_width(0x90), 1);
        assert_eq!(length_field_width(0x10), 4);
        assert!(requires_length_field(Category::Raw));
        assert!(!requires_length_field(Category::Date));
        assert!(Tag::from_u8(0xF0).unwrap().requires_length_field());
        assert!(!Tag::from_u8(0x72).unwrap().requires_length_field());
    }

    #[test]
    fn test_for_kind_roundtrip() {
        for byte in 0u8..=255 {
            if let Some(tag) = Tag::from_u8(byte) {
                let rebuilt = Tag::for_kind(tag.kind(), tag.is_short()).unwrap();
                assert_eq!(rebuilt.as_u8(), byte, "tag {byte:#04x}");
            }
        }
    }

    #[test]
    fn test_for_kind_rejects_unsized_scalar() {
        assert!(Tag::for_kind(Kind::of(Category::Int), false).is_none());
        assert!(Tag::for_kind(Kind::sized(Category::Bool, Width::W4), false).is_none());
    }
}
