//! Core data model for SEG-Y seismic data: byte codecs, field registries and fixed-size header
//! buffers. This is the foundation for the `segy-io` streaming pipeline. It can be built either
//! with serialization support, or in a slightly more lightweight manner without it (see features).
#![allow(clippy::derive_partial_eq_without_eq)]

#[cfg(any(feature = "to_json", feature = "serde"))]
extern crate serde;
#[cfg(feature = "to_json")]
extern crate serde_json;

pub mod bitconverter;
pub mod enums;
pub mod errors;
pub mod header;
pub mod registry;

pub use enums::*;
pub use errors::SegyError;
pub use header::{FieldValue, HeaderBuffer, ReelHeader, TraceHeader};
pub use registry::{FieldDescriptor, REEL_FIELDS, TRACE_FIELDS};

pub const TEXT_HEADER_LEN: usize = header::TEXT_HEADER_LEN;
pub const BIN_HEADER_LEN: usize = header::BIN_HEADER_LEN;
pub const REEL_HEADER_LEN: usize = header::REEL_HEADER_LEN;
pub const TRACE_HEADER_LEN: usize = header::TRACE_HEADER_LEN;
