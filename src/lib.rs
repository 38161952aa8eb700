//! mcpack - tagged binary serialization with nshead framing
//!
//! mcpack encodes scalars, strings, raw blobs, arrays and objects into a
//! compact stream of tagged items. This crate decodes such streams into a
//! generic [`Value`] tree, encodes trees back to bytes, and binds trees to
//! typed records through explicit schemas.
//!
//! # Quick Start
//!
//! ```rust
//! use mcpack::{Value, decode, encode_document};
//!
//! let doc = Value::object([
//!     ("count", Value::UInt32(5)),
//!     ("items", Value::array([Value::Int8(1), Value::Int8(2), Value::Int8(3)])),
//! ]);
//!
//! let bytes = encode_document(&doc)?;
//! assert_eq!(decode(&bytes)?, doc);
//! # Ok::<(), mcpack::Error>(())
//! ```
//!
//! # Typed records
//!
//! ```rust
//! mcpack::record! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct Query {
//!         required name: String,
//!         optional limit: u32,
//!     }
//! }
//!
//! let value = mcpack::decode(&mcpack::encode_document(&mcpack::Value::object([
//!     ("name", mcpack::Value::from("users")),
//!     ("limit", mcpack::Value::UInt32(10)),
//! ]))?)?;
//!
//! let query: Query = mcpack::bind(&value)?;
//! assert_eq!(query, Query { name: "users".into(), limit: Some(10) });
//! # Ok::<(), mcpack::Error>(())
//! ```
//!
//! # Framing
//!
//! [`nshead`] wraps an encoded body in a 36-byte header for transport on
//! a byte stream.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]

pub mod codec;
mod error;
pub mod nshead;
pub mod schema;

pub use codec::{
    Category, DecodeConfig, DecodeError, Decoder, EncodeError, Encoder, Item, Kind, Tag, Value,
    Width, decode, decode_body, decode_item, decode_tag, encode, encode_document,
    length_field_width, requires_length_field,
};
pub use error::{Error, Result};
pub use nshead::{FrameConfig, FrameError, NsHead, Packet};
pub use schema::{
    BindError, BoundFields, FieldSchema, FieldValue, Record, RecordSchema, Timestamp, bind,
    project,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
