//! Binding value trees to typed records
//!
//! A [`RecordSchema`] is an explicit, const-constructible list of field
//! names, kinds and presence rules. Schemas are usually generated by
//! [`record!`](crate::record), but hand-written tables work the same way:
//!
//! ```
//! use mcpack::{Category, FieldSchema, Kind, RecordSchema, Value, Width};
//!
//! const LOGIN: RecordSchema = RecordSchema::new(&[
//!     FieldSchema::required("user", Kind::of(Category::String)),
//!     FieldSchema::optional("retries", Kind::sized(Category::UInt, Width::W4)),
//! ]);
//!
//! let doc = Value::object([("user", Value::from("ann")), ("extra", Value::Null)]);
//! let fields = LOGIN.bind(&doc)?;
//!
//! assert_eq!(fields.get("user"), Some(&Value::from("ann")));
//! assert_eq!(fields.get("retries"), None);
//! # Ok::<(), mcpack::BindError>(())
//! ```

mod error;
mod field;
mod record;

pub use error::BindError;
pub use field::{FieldValue, Timestamp};
pub use record::{Record, bind, project};

use crate::codec::{Kind, Value};

/// One field of a record schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Wire name
    pub name: &'static str,
    /// Expected category and width
    pub kind: Kind,
    /// Whether binding fails when the field is absent
    pub required: bool,
}

impl FieldSchema {
    /// Required field
    #[must_use]
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// Optional field
    #[must_use]
    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Ordered field list describing a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    fields: &'static [FieldSchema],
}

impl RecordSchema {
    /// Create a schema from its fields, in projection order
    #[must_use]
    pub const fn new(fields: &'static [FieldSchema]) -> Self {
        Self { fields }
    }

    /// Fields in projection order
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldSchema] {
        self.fields
    }

    /// Look up a field by wire name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Locate every schema field in an object without checking it
    ///
    /// The first entry with a matching name wins. Entries the schema does
    /// not mention are ignored. A `Null` entry for an optional field counts
    /// as absent. Presence and kind are checked later, field by field, by
    /// [`BoundFields::required`] and [`BoundFields::optional`].
    ///
    /// # Errors
    ///
    /// Returns [`BindError::ExpectedObject`] for a non-object value.
    pub fn locate<'v>(&self, value: &'v Value) -> Result<BoundFields<'v>, BindError> {
        let entries = value.as_object().ok_or(BindError::ExpectedObject {
            found: value.category(),
        })?;

        let values = self
            .fields
            .iter()
            .map(|field| {
                entries
                    .iter()
                    .find(|(name, _)| name == field.name)
                    .map(|(_, value)| value)
                    .filter(|value| field.required || !value.is_null())
            })
            .collect();

        Ok(BoundFields {
            fields: self.fields,
            values,
        })
    }

    /// Locate and type-check every schema field in an object
    ///
    /// Fields are located as by [`locate`](Self::locate), then checked in
    /// schema order and the first failure is returned. Nested records and
    /// array elements are not looked into.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::ExpectedObject`] for a non-object value,
    /// [`BindError::MissingField`] for an absent required field and
    /// [`BindError::FieldTypeMismatch`] for a present field of the wrong kind.
    pub fn bind<'v>(&self, value: &'v Value) -> Result<BoundFields<'v>, BindError> {
        let fields = self.locate(value)?;
        for (field, found) in self.fields.iter().zip(&fields.values) {
            check(field, *found)?;
        }
        Ok(fields)
    }

    /// Build an object from per-field values given in schema order
    ///
    /// Optional fields with no value are omitted; required fields are always
    /// emitted, as `Null` when no value is supplied.
    pub fn project<I>(&self, values: I) -> Value
    where
        I: IntoIterator<Item = Option<Value>>,
    {
        let entries = self
            .fields
            .iter()
            .zip(values)
            .filter_map(|(field, value)| match value {
                Some(value) => Some((field.name.to_owned(), value)),
                None if field.required => Some((field.name.to_owned(), Value::Null)),
                None => None,
            })
            .collect();
        Value::Object(entries)
    }
}

/// Schema fields located in an object
///
/// Produced by [`RecordSchema::bind`], which has already checked every
/// field, or by [`RecordSchema::locate`], which leaves the checks to
/// [`required`](Self::required) and [`optional`](Self::optional).
#[derive(Debug, Clone)]
pub struct BoundFields<'v> {
    fields: &'static [FieldSchema],
    values: Vec<Option<&'v Value>>,
}

impl<'v> BoundFields<'v> {
    /// Value bound to field `name`, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'v Value> {
        let index = self.fields.iter().position(|field| field.name == name)?;
        self.values.get(index).copied().flatten()
    }

    /// Check and convert required field `name`
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MissingField`] if the field is absent,
    /// [`BindError::FieldTypeMismatch`] if it has the wrong kind, or the
    /// conversion error of a nested record or array.
    pub fn required<T: FieldValue>(&self, name: &str) -> Result<T, BindError> {
        self.optional(name)?.ok_or_else(|| BindError::MissingField {
            name: name.to_owned(),
        })
    }

    /// Check and convert optional field `name`
    ///
    /// # Errors
    ///
    /// Returns [`BindError::FieldTypeMismatch`] if the field has the wrong
    /// kind, or the conversion error of a nested record or array.
    pub fn optional<T: FieldValue>(&self, name: &str) -> Result<Option<T>, BindError> {
        let Some(index) = self.fields.iter().position(|field| field.name == name) else {
            return Ok(None);
        };
        let Some(value) = self.values.get(index).copied().flatten() else {
            return Ok(None);
        };
        check(&self.fields[index], Some(value))?;
        field::convert::<T>(value)
            .map(Some)
            .map_err(|err| err.at(name))
    }

    /// Number of schema fields that were present
    #[must_use]
    pub fn present(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }
}

/// Presence and kind of one located field
fn check(field: &FieldSchema, found: Option<&Value>) -> Result<(), BindError> {
    match found {
        None if field.required => Err(BindError::MissingField {
            name: field.name.to_owned(),
        }),
        Some(value) if value.kind() != field.kind => Err(BindError::FieldTypeMismatch {
            name: field.name.to_owned(),
            expected: field.kind,
            found: value.kind(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Category, Width};

    const SCHEMA: RecordSchema = RecordSchema::new(&[
        FieldSchema::required("name", Kind::of(Category::String)),
        FieldSchema::optional("age", Kind::sized(Category::UInt, Width::W1)),
    ]);

    #[test]
    fn test_bind_missing_required() {
        let err = SCHEMA.bind(&Value::object::<&str, _>([])).unwrap_err();
        assert_eq!(
            err,
            BindError::MissingField {
                name: "name".to_owned()
            }
        );
    }

    #[test]
    fn test_bind_expected_object() {
        let err = SCHEMA.bind(&Value::array([])).unwrap_err();
        assert_eq!(
            err,
            BindError::ExpectedObject {
                found: Category::Array
            }
        );
    }

    #[test]
    fn test_bind_type_mismatch() {
        let doc = Value::object([("name", Value::from("ann")), ("age", Value::UInt16(3))]);

        let err = SCHEMA.bind(&doc).unwrap_err();
        assert_eq!(
            err,
            BindError::FieldTypeMismatch {
                name: "age".to_owned(),
                expected: Kind::sized(Category::UInt, Width::W1),
                found: Kind::sized(Category::UInt, Width::W2),
            }
        );
    }

    #[test]
    fn test_bind_first_duplicate_wins() {
        let doc = Value::object([
            ("name", Value::from("first")),
            ("name", Value::Int32(2)),
        ]);

        let fields = SCHEMA.bind(&doc).unwrap();
        assert_eq!(fields.get("name"), Some(&Value::from("first")));
        assert_eq!(fields.present(), 1);
    }

    #[test]
    fn test_bind_null_optional_is_absent() {
        let doc = Value::object([("name", Value::from("ann")), ("age", Value::Null)]);

        let fields = SCHEMA.bind(&doc).unwrap();
        assert_eq!(fields.optional::<u8>("age"), Ok(None));
    }

    #[test]
    fn test_bind_null_required_is_mismatch() {
        let doc = Value::object([("name", Value::Null)]);

        assert!(matches!(
            SCHEMA.bind(&doc),
            Err(BindError::FieldTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_project_schema_order() {
        let value = SCHEMA.project([None, Some(Value::UInt8(4))]);

        assert_eq!(
            value,
            Value::object([("name", Value::Null), ("age", Value::UInt8(4))])
        );
        assert_eq!(
            SCHEMA.project([Some(Value::from("bo")), None]),
            Value::object([("name", Value::from("bo"))])
        );
    }
}
