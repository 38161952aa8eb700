//! Record binding errors

use thiserror::Error;

use crate::codec::{Category, Kind};

/// A value tree that does not fit a record schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Records bind from objects only
    #[error("expected object, found {found}")]
    ExpectedObject {
        /// Category of the value supplied
        found: Category,
    },

    /// A required field is absent
    #[error("missing required field `{name}`")]
    MissingField {
        /// Field name
        name: String,
    },

    /// A field is present with the wrong category or width
    #[error("field `{name}`: expected {expected}, found {found}")]
    FieldTypeMismatch {
        /// Field name, or `[index]` for array elements
        name: String,
        /// Kind declared by the schema
        expected: Kind,
        /// Kind found in the value tree
        found: Kind,
    },

    /// An error inside a nested record or array
    #[error("in field `{name}`: {source}")]
    InField {
        /// Enclosing field name
        name: String,
        /// Error raised inside the field
        source: Box<BindError>,
    },
}

impl BindError {
    /// Mismatch not yet attributed to a field
    pub(crate) fn mismatch(expected: Kind, found: Kind) -> Self {
        Self::FieldTypeMismatch {
            name: String::new(),
            expected,
            found,
        }
    }

    /// Attribute this error to field `name`
    #[must_use]
    pub(crate) fn at(self, name: &str) -> Self {
        match self {
            Self::FieldTypeMismatch {
                name: unnamed,
                expected,
                found,
            } if unnamed.is_empty() => Self::FieldTypeMismatch {
                name: name.to_owned(),
                expected,
                found,
            },
            other => Self::InField {
                name: name.to_owned(),
                source: Box::new(other),
            },
        }
    }
}
