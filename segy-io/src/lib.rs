//! Streaming reader/writer and transform pipeline for SEG-Y seismic data.
//!
//! Unlike a memory-mapped, random-access reader, this crate is built around a single forward
//! pass over the input stream: the reel header is read once, then traces are read, transformed
//! and (optionally) written one at a time, so the process's resident memory is bounded by one
//! trace rather than by the file size.
extern crate encoding8;
extern crate num;

pub mod coordinates;
pub mod filter;
pub mod pipeline;
pub mod reader;
pub mod sample_codec;
pub mod selector;
pub mod writer;

pub use coordinates::{CoordinateRecord, CoordinateTable};
pub use filter::{FilterOptions, Range};
pub use pipeline::{run, ArithOp, ChangeRecord, Options, ScanStats, TraceSink};
pub use reader::{read_reel_header, read_trace, RawTrace};
pub use selector::{parse_selector, SelectedField};
pub use writer::{write_reel_header, write_trace};

pub use segy_core::{HeaderBuffer, ReelHeader, SegyError, TraceHeader};
