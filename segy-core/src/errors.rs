//! Error types shared by the codec, registry and streaming pipeline.

/// All of the ways a SEG-Y stream or a field selector can fail to make sense.
///
/// Every variant here is fatal unless its own documentation says otherwise; warnings
/// (degraded-but-continuing conditions) are logged through the `log` crate at the call site
/// instead of being represented as an error.
#[derive(Debug)]
pub enum SegyError {
    /// The reel header could not be read in full (fewer than 3600 bytes available).
    ShortHeader { got: usize },
    /// A trace header read stopped partway through the 240-byte header.
    TruncatedTraceHeader { got: usize },
    /// A trace's sample payload was shorter than its declared length.
    TruncatedPayload { expected: usize, got: usize },
    /// `DATA_SAMPLE_FORMAT_CODE` is not one of the four formats this codec understands.
    UnknownSampleFormat { code: i16 },
    /// A trace declared zero samples and no `-samples_per_trace` override was given.
    ZeroSamples,
    /// A selector or change-file record named a field that is not in the registry.
    WrongFieldName { name: String },
    /// A selector named an offset that is not in the registry.
    WrongFieldOffset { offset: usize },
    /// A field selector string could not be tokenised.
    SelectorSyntax { selector: String },
    /// `-change_trace_fields`: the file's next record triple did not match the current trace.
    ChangeFileDesync {
        expected: (i32, i32, i32),
        found: (i32, i32, i32),
    },
    /// `-change_trace_fields`: the output stream still has traces but the change file ran out
    /// of records.
    ChangeFileExhausted { at: (i32, i32, i32) },
    /// A coordinate-file row could not be parsed.
    CoordinateFileSyntax { line: String },
    /// An input, output, or side file could not be opened.
    OpenFailed { path: String, source: std::io::Error },
    /// Wrapped `std::io::Error` from a read or write that was not otherwise classified.
    Io(std::io::Error),
    /// `TryFromSliceError` while slicing a fixed-size field out of a buffer.
    TryFromSlice(std::array::TryFromSliceError),
}

impl From<std::io::Error> for SegyError {
    fn from(e: std::io::Error) -> Self {
        SegyError::Io(e)
    }
}

impl From<std::array::TryFromSliceError> for SegyError {
    fn from(e: std::array::TryFromSliceError) -> Self {
        SegyError::TryFromSlice(e)
    }
}

impl std::fmt::Display for SegyError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SegyError::*;
        match self {
            ShortHeader { got } => write!(fmt, "reel header too short: got {} of 3600 bytes", got),
            TruncatedTraceHeader { got } => {
                write!(fmt, "trace header truncated: got {} of 240 bytes", got)
            }
            TruncatedPayload { expected, got } => write!(
                fmt,
                "trace payload truncated: expected {} bytes, got {}",
                expected, got
            ),
            UnknownSampleFormat { code } => {
                write!(fmt, "unknown sample format code {}; correct the reel header", code)
            }
            ZeroSamples => write!(fmt, "trace declares zero samples; pass -samples_per_trace to override"),
            WrongFieldName { name } => write!(fmt, "wrong parameter name: {}", name),
            WrongFieldOffset { offset } => write!(fmt, "no registered field at offset {}", offset),
            SelectorSyntax { selector } => write!(fmt, "could not parse field selector: {}", selector),
            ChangeFileDesync { expected, found } => write!(
                fmt,
                "change file desync: expected rec/seq/num {:?}, found {:?} in output stream",
                expected, found
            ),
            ChangeFileExhausted { at } => write!(
                fmt,
                "change file desync: ran out of records, but output stream reached rec/seq/num {:?}",
                at
            ),
            CoordinateFileSyntax { line } => write!(fmt, "could not parse coordinate row: {}", line),
            OpenFailed { path, source } => write!(fmt, "could not open {}: {}", path, source),
            Io(e) => write!(fmt, "{}", e),
            TryFromSlice(e) => write!(fmt, "{}", e),
        }
    }
}

impl std::error::Error for SegyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use SegyError::*;
        match self {
            OpenFailed { source, .. } => Some(source),
            Io(e) => Some(e),
            TryFromSlice(e) => Some(e),
            _ => None,
        }
    }
}
