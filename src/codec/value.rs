//! Generic in-memory mcpack documents
//!
//! A [`Value`] owns its children outright. Objects are ordered lists of
//! `(name, value)` pairs: names need not be unique and their order is kept
//! when re-encoding.
//!
//! ```
//! use mcpack::Value;
//!
//! let doc = Value::object([
//!     ("count", Value::UInt32(5)),
//!     ("items", Value::array([Value::Int8(1), Value::Int8(2)])),
//! ]);
//!
//! assert_eq!(doc.get("count").and_then(Value::as_u64), Some(5));
//! assert_eq!(doc.get("items").map(Value::len), Some(2));
//! ```

use bytes::Bytes;

use super::tag::{Category, Kind, Width};

/// A decoded mcpack value
///
/// Equality is structural. `Float` and `Double` compare by bit pattern, so
/// a NaN equals itself and `0.0` differs from `-0.0`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Null
    Null,
    /// Boolean
    Bool(bool),
    /// 8-bit signed integer
    Int8(i8),
    /// 16-bit signed integer
    Int16(i16),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// 8-bit unsigned integer
    UInt8(u8),
    /// 16-bit unsigned integer
    UInt16(u16),
    /// 32-bit unsigned integer
    UInt32(u32),
    /// 64-bit unsigned integer
    UInt64(u64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// 64-bit signed timestamp
    Date(i64),
    /// Text without the wire NUL terminator
    String(String),
    /// Opaque bytes
    Raw(Bytes),
    /// Positional children
    Array(Vec<Value>),
    /// Named children in encounter order
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Build an object from `(name, value)` pairs
    pub fn object<N, I>(entries: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Value)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Build an array from values
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Array(items.into_iter().collect())
    }

    /// Build a raw value
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Self::Raw(bytes.into())
    }

    /// Category of this value
    #[must_use]
    pub const fn category(&self) -> Category {
        self.kind().category
    }

    /// Category and width of this value
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::of(Category::Null),
            Self::Bool(_) => Kind::sized(Category::Bool, Width::W1),
            Self::Int8(_) => Kind::sized(Category::Int, Width::W1),
            Self::Int16(_) => Kind::sized(Category::Int, Width::W2),
            Self::Int32(_) => Kind::sized(Category::Int, Width::W4),
            Self::Int64(_) => Kind::sized(Category::Int, Width::W8),
            Self::UInt8(_) => Kind::sized(Category::UInt, Width::W1),
            Self::UInt16(_) => Kind::sized(Category::UInt, Width::W2),
            Self::UInt32(_) => Kind::sized(Category::UInt, Width::W4),
            Self::UInt64(_) => Kind::sized(Category::UInt, Width::W8),
            Self::Float(_) => Kind::sized(Category::Float, Width::W4),
            Self::Double(_) => Kind::sized(Category::Double, Width::W8),
            Self::Date(_) => Kind::sized(Category::Date, Width::W8),
            Self::String(_) => Kind::of(Category::String),
            Self::Raw(_) => Kind::of(Category::Raw),
            Self::Array(_) => Kind::of(Category::Array),
            Self::Object(_) => Kind::of(Category::Object),
        }
    }

    /// Check if null
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// First child of an object named `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// All children of an object named `name`, in encounter order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.as_object()
            .unwrap_or_default()
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Array element at `index`
    #[must_use]
    pub fn index(&self, index: usize) -> Option<&Value> {
        self.as_array()?.get(index)
    }

    /// Number of children of an array or object, zero otherwise
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(entries) => entries.len(),
            _ => 0,
        }
    }

    /// Check if this is an empty container or a scalar
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Object entries
    #[must_use]
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Array items
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// String contents
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Raw bytes
    #[must_use]
    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            Self::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Boolean
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Any signed integer, widened
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int8(n) => Some(*n as i64),
            Self::Int16(n) => Some(*n as i64),
            Self::Int32(n) => Some(*n as i64),
            Self::Int64(n) => Some(*n),
            _ => None,
        }
    }

    /// Any unsigned integer, widened
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt8(n) => Some(*n as u64),
            Self::UInt16(n) => Some(*n as u64),
            Self::UInt32(n) => Some(*n as u64),
            Self::UInt64(n) => Some(*n),
            _ => None,
        }
    }

    /// Float or double, widened
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n as f64),
            Self::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Timestamp
    #[must_use]
    pub const fn as_date(&self) -> Option<i64> {
        match self {
            Self::Date(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int8(a), Self::Int8(b)) => a == b,
            (Self::Int16(a), Self::Int16(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::UInt8(a), Self::UInt8(b)) => a == b,
            (Self::UInt16(a), Self::UInt16(b)) => a == b,
            (Self::UInt32(a), Self::UInt32(b)) => a == b,
            (Self::UInt64(a), Self::UInt64(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    Bytes => Raw,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// One named item: the unit the decoder consumes and the encoder emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Item name; empty for array elements and most documents
    pub name: String,
    /// Item value
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_first_match_wins() {
        let doc = Value::object([("x", Value::Int8(1)), ("x", Value::from("two"))]);

        assert_eq!(doc.get("x"), Some(&Value::Int8(1)));
        assert_eq!(doc.get_all("x").count(), 2);
        assert_eq!(doc.get("y"), None);
    }

    #[test]
    fn test_structural_equality_respects_order() {
        let a = Value::object([("a", Value::Null), ("b", Value::Bool(true))]);
        let b = Value::object([("b", Value::Bool(true)), ("a", Value::Null)]);

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        let nan = Value::object([("f", Value::Double(f64::NAN)), ("g", Value::Float(f32::NAN))]);

        assert_eq!(nan, nan.clone());
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_ne!(Value::Float(1.0), Value::Double(1.0));
        assert_eq!(Value::Float(f32::INFINITY), Value::Float(f32::INFINITY));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::UInt16(3).kind(), Kind::sized(Category::UInt, Width::W2));
        assert_eq!(Value::from("hi").category(), Category::String);
        assert_eq!(Value::from(None::<u8>), Value::Null);
    }

    #[test]
    fn test_accessors() {
        let arr = Value::array([Value::Int16(-4), Value::Float(1.5)]);

        assert_eq!(arr.index(0).and_then(Value::as_i64), Some(-4));
        assert_eq!(arr.index(1).and_then(Value::as_f64), Some(1.5));
        assert!(arr.index(2).is_none());
        assert!(Value::Null.is_empty());
        assert_eq!(arr.get("anything"), None);
    }
}
