//! Conversions between Rust field types and mcpack values

use bytes::Bytes;

use super::BindError;
use crate::codec::{Category, Kind, Value, Width};

/// A Rust type stored in one record field
///
/// `KIND` is the exact category and width the field accepts; binding
/// never widens or narrows.
pub trait FieldValue: Sized {
    /// Wire kind of this field type
    const KIND: Kind;

    /// Convert from a value of kind [`Self::KIND`]
    fn from_value(value: &Value) -> Result<Self, BindError>;

    /// Convert into a value
    fn to_value(&self) -> Value;
}

/// DATE field: signed 64-bit timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

/// Check the kind of `value`, then convert it
pub(crate) fn convert<T: FieldValue>(value: &Value) -> Result<T, BindError> {
    let found = value.kind();
    if found != T::KIND {
        return Err(BindError::mismatch(T::KIND, found));
    }
    T::from_value(value)
}

macro_rules! scalar_field {
    ($($ty:ty => $variant:ident, $category:ident, $width:ident;)*) => {
        $(
            impl FieldValue for $ty {
                const KIND: Kind = Kind::sized(Category::$category, Width::$width);

                fn from_value(value: &Value) -> Result<Self, BindError> {
                    match value {
                        Value::$variant(v) => Ok(*v),
                        other => Err(BindError::mismatch(Self::KIND, other.kind())),
                    }
                }

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }
            }
        )*
    };
}

scalar_field! {
    bool => Bool, Bool, W1;
    i8 => Int8, Int, W1;
    i16 => Int16, Int, W2;
    i32 => Int32, Int, W4;
    i64 => Int64, Int, W8;
    u8 => UInt8, UInt, W1;
    u16 => UInt16, UInt, W2;
    u32 => UInt32, UInt, W4;
    u64 => UInt64, UInt, W8;
    f32 => Float, Float, W4;
    f64 => Double, Double, W8;
}

impl FieldValue for Timestamp {
    const KIND: Kind = Kind::sized(Category::Date, Width::W8);

    fn from_value(value: &Value) -> Result<Self, BindError> {
        match value {
            Value::Date(ts) => Ok(Self(*ts)),
            other => Err(BindError::mismatch(Self::KIND, other.kind())),
        }
    }

    fn to_value(&self) -> Value {
        Value::Date(self.0)
    }
}

impl FieldValue for String {
    const KIND: Kind = Kind::of(Category::String);

    fn from_value(value: &Value) -> Result<Self, BindError> {
        match value {
            Value::String(text) => Ok(text.clone()),
            other => Err(BindError::mismatch(Self::KIND, other.kind())),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FieldValue for Bytes {
    const KIND: Kind = Kind::of(Category::Raw);

    fn from_value(value: &Value) -> Result<Self, BindError> {
        match value {
            Value::Raw(bytes) => Ok(bytes.clone()),
            other => Err(BindError::mismatch(Self::KIND, other.kind())),
        }
    }

    fn to_value(&self) -> Value {
        Value::Raw(self.clone())
    }
}

/// Arrays bind element by element; every element must have `T::KIND`
impl<T: FieldValue> FieldValue for Vec<T> {
    const KIND: Kind = Kind::of(Category::Array);

    fn from_value(value: &Value) -> Result<Self, BindError> {
        let items = value
            .as_array()
            .ok_or_else(|| BindError::mismatch(Self::KIND, value.kind()))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| convert::<T>(item).map_err(|err| err.at(&format!("[{index}]"))))
            .collect()
    }

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(FieldValue::to_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds_match_values() {
        assert_eq!(u32::KIND, Value::UInt32(0).kind());
        assert_eq!(i8::KIND, Value::Int8(0).kind());
        assert_eq!(f64::KIND, Value::Double(0.0).kind());
        assert_eq!(Timestamp::KIND, Value::Date(0).kind());
        assert_eq!(bool::KIND, Value::Bool(false).kind());
    }

    #[test]
    fn test_no_width_coercion() {
        let err = convert::<u32>(&Value::UInt16(7)).unwrap_err();
        assert_eq!(
            err,
            BindError::mismatch(u32::KIND, Value::UInt16(7).kind())
        );
        assert!(convert::<i64>(&Value::UInt64(7)).is_err());
    }

    #[test]
    fn test_vec_reports_element_index() {
        let value = Value::array([Value::Int8(1), Value::Int16(2)]);

        let err = convert::<Vec<i8>>(&value).unwrap_err();
        assert_eq!(
            err,
            BindError::FieldTypeMismatch {
                name: "[1]".to_owned(),
                expected: i8::KIND,
                found: Value::Int16(2).kind(),
            }
        );
        assert_eq!(
            convert::<Vec<i8>>(&Value::array([Value::Int8(1)])).unwrap(),
            vec![1]
        );
    }

    #[test]
    fn test_to_value() {
        assert_eq!(Timestamp(9).to_value(), Value::Date(9));
        assert_eq!(
            vec!["a".to_owned()].to_value(),
            Value::array([Value::from("a")])
        );
    }
}
