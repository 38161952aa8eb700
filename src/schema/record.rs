//! Typed records and the `record!` macro

use super::{BindError, BoundFields, RecordSchema};
use crate::codec::Value;

/// A Rust type with a fixed mcpack schema
///
/// Implemented by [`record!`](crate::record); hand-written impls must keep
/// `from_fields` and `project` consistent with `SCHEMA`, and `from_fields`
/// must read every field through [`BoundFields::required`] or
/// [`BoundFields::optional`] in schema order.
pub trait Record: Sized {
    /// Field names, kinds and presence rules, in projection order
    const SCHEMA: RecordSchema;

    /// Build the record from located fields, converting them in schema order
    fn from_fields(fields: &BoundFields<'_>) -> Result<Self, BindError>;

    /// Build an object value in schema order
    fn project(&self) -> Value;
}

/// Bind an object value to a record
///
/// # Errors
///
/// Returns the first schema violation, in schema field order. Each field,
/// including its nested records and array elements, is fully checked
/// before the next one.
pub fn bind<R: Record>(value: &Value) -> Result<R, BindError> {
    let fields = R::SCHEMA.locate(value)?;
    R::from_fields(&fields)
}

/// Project a record to an object value
pub fn project<R: Record>(record: &R) -> Value {
    record.project()
}

/// Declare a struct together with its mcpack schema
///
/// Each field is marked `required` or `optional`; optional fields are
/// stored as `Option<T>` and `None` is omitted on projection. A field can
/// use a different wire name with `as "name"`. Field types implement
/// [`FieldValue`](crate::FieldValue), and so do generated records, which
/// lets them nest.
///
/// ```
/// mcpack::record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Login {
///         required user: String,
///         optional retries: u32,
///         optional session_id: u64 as "sessionId",
///     }
/// }
///
/// let login = Login { user: "ann".into(), retries: None, session_id: Some(7) };
/// let value = mcpack::project(&login);
///
/// assert_eq!(value.get("sessionId"), Some(&mcpack::Value::UInt64(7)));
/// assert_eq!(mcpack::bind::<Login>(&value)?, login);
/// # Ok::<(), mcpack::BindError>(())
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $presence:ident $field:ident : $ty:ty $(as $wire:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $crate::__record_field_type!($presence $ty),
            )*
        }

        impl $crate::Record for $name {
            const SCHEMA: $crate::RecordSchema = $crate::RecordSchema::new(&[
                $(
                    $crate::FieldSchema {
                        name: $crate::__record_wire_name!($field $($wire)?),
                        kind: <$ty as $crate::FieldValue>::KIND,
                        required: $crate::__record_required!($presence),
                    },
                )*
            ]);

            fn from_fields(
                fields: &$crate::BoundFields<'_>,
            ) -> ::core::result::Result<Self, $crate::BindError> {
                ::core::result::Result::Ok(Self {
                    $(
                        $field: $crate::__record_take!(
                            $presence fields, $crate::__record_wire_name!($field $($wire)?), $ty
                        )?,
                    )*
                })
            }

            fn project(&self) -> $crate::Value {
                <Self as $crate::Record>::SCHEMA.project([
                    $( $crate::__record_put!($presence &self.$field), )*
                ])
            }
        }

        impl $crate::FieldValue for $name {
            const KIND: $crate::Kind = $crate::Kind::of($crate::Category::Object);

            fn from_value(value: &$crate::Value) -> ::core::result::Result<Self, $crate::BindError> {
                $crate::bind::<Self>(value)
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Record::project(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field_type {
    (required $ty:ty) => { $ty };
    (optional $ty:ty) => { ::core::option::Option<$ty> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_required {
    (required) => { true };
    (optional) => { false };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_wire_name {
    ($field:ident) => { ::core::stringify!($field) };
    ($field:ident $wire:literal) => { $wire };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_take {
    (required $fields:ident, $name:expr, $ty:ty) => { $fields.required::<$ty>($name) };
    (optional $fields:ident, $name:expr, $ty:ty) => { $fields.optional::<$ty>($name) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_put {
    (required $value:expr) => {
        ::core::option::Option::Some($crate::FieldValue::to_value($value))
    };
    (optional $value:expr) => {
        ::core::option::Option::as_ref($value).map($crate::FieldValue::to_value)
    };
}

#[cfg(test)]
mod tests {
    use crate::{BindError, Category, Kind, Value, Width, bind, project};

    crate::record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Point {
            required x: i32,
            required y: i32,
        }
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Shape {
            required name: String,
            optional origin: Point,
            optional tags: Vec<String> as "tagList",
        }
    }

    #[test]
    fn test_schema_generated() {
        let fields = <Shape as crate::Record>::SCHEMA.fields();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name, "name");
        assert!(fields[0].required);
        assert_eq!(fields[1].kind, Kind::of(Category::Object));
        assert_eq!(fields[2].name, "tagList");
        assert!(!fields[2].required);
    }

    #[test]
    fn test_project_omits_unset_optionals() {
        let shape = Shape {
            name: "dot".to_owned(),
            ..Shape::default()
        };

        assert_eq!(project(&shape), Value::object([("name", Value::from("dot"))]));
    }

    #[test]
    fn test_nested_roundtrip() {
        let shape = Shape {
            name: "arrow".to_owned(),
            origin: Some(Point { x: -1, y: 2 }),
            tags: Some(vec!["a".to_owned(), "b".to_owned()]),
        };

        let value = project(&shape);
        assert_eq!(
            value.get("origin"),
            Some(&Value::object([("x", Value::Int32(-1)), ("y", Value::Int32(2))]))
        );
        assert_eq!(bind::<Shape>(&value).unwrap(), shape);
    }

    #[test]
    fn test_nested_error_names_field() {
        let value = Value::object([
            ("name", Value::from("bad")),
            ("origin", Value::object([("x", Value::Int32(1))])),
        ]);

        assert_eq!(
            bind::<Shape>(&value),
            Err(BindError::InField {
                name: "origin".to_owned(),
                source: Box::new(BindError::MissingField {
                    name: "y".to_owned()
                }),
            })
        );
    }

    crate::record! {
        #[derive(Debug, Clone, PartialEq)]
        struct Labelled {
            optional origin: Point,
            required label: String,
        }
    }

    #[test]
    fn test_earlier_nested_error_wins() {
        let value = Value::object([("origin", Value::object::<&str, _>([]))]);

        assert_eq!(
            bind::<Labelled>(&value),
            Err(BindError::InField {
                name: "origin".to_owned(),
                source: Box::new(BindError::MissingField {
                    name: "x".to_owned()
                }),
            })
        );
    }

    #[test]
    fn test_array_element_mismatch() {
        let value = Value::object([
            ("name", Value::from("bad")),
            ("tagList", Value::array([Value::from("ok"), Value::UInt8(1)])),
        ]);

        assert_eq!(
            bind::<Shape>(&value),
            Err(BindError::InField {
                name: "tagList".to_owned(),
                source: Box::new(BindError::FieldTypeMismatch {
                    name: "[1]".to_owned(),
                    expected: Kind::of(Category::String),
                    found: Kind::sized(Category::UInt, Width::W1),
                }),
            })
        );
    }
}
