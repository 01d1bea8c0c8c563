//! Identifier types for the Resolwe client layer.
//!
//! Every remote resource is addressable either by its numeric id or by its
//! human readable slug. This crate defines:
//! - [`ResourceId`]: the server-assigned numeric identifier
//! - [`Identifier`]: a caller supplied reference that is one or the other

mod ids;

pub use ids::{Identifier, ResourceId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when parsing identifiers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid resource id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("malformed identifier: {0:?}")]
    MalformedIdentifier(String),
}
