//! mcpack error types

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};
use crate::nshead::FrameError;
use crate::schema::BindError;

/// mcpack errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed mcpack input
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Value tree cannot be encoded
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Value tree does not fit a record schema
    #[error("bind error: {0}")]
    Bind(#[from] BindError),

    /// nshead frame could not be read or written
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
