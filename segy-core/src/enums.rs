//! Small liberal-reader enums used by the field registry and sample codec.
//!
//! Each follows the source's `::new(source) -> Self`-with-fallback idiom rather than returning
//! a `Result`: unrecognised on-disk values are reported once (by the caller, via `log::warn!`)
//! and processing continues, matching the source's tolerance for non-conformant files.
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

/// The scalar type of a registered header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Signed 16-bit integer ("S" in the numeric selector syntax).
    Short,
    /// Signed 32-bit integer ("I").
    Integer,
    /// IEEE-754 32-bit float ("F").
    IeeeFloat,
    /// Unsigned 16-bit integer ("U").
    UShort,
}

impl ScalarKind {
    /// Byte width of this scalar on disk.
    pub fn width(self) -> usize {
        match self {
            ScalarKind::Short | ScalarKind::UShort => 2,
            ScalarKind::Integer | ScalarKind::IeeeFloat => 4,
        }
    }

    /// Parse the one-letter type tag used in the numeric selector syntax (`off:T[:v]`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "S" => Some(ScalarKind::Short),
            "I" => Some(ScalarKind::Integer),
            "F" => Some(ScalarKind::IeeeFloat),
            "U" => Some(ScalarKind::UShort),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ScalarKind::Short => "S",
            ScalarKind::Integer => "I",
            ScalarKind::IeeeFloat => "F",
            ScalarKind::UShort => "U",
        }
    }
}

/// `DATA_SAMPLE_FORMAT_CODE`: the on-disk numeric encoding of every sample in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum SampleFormatCode {
    IbmFloat32 = 1,
    Int32 = 2,
    Int16 = 3,
    Float32 = 5,
}

impl SampleFormatCode {
    /// Liberal-reader constructor: returns `None` for anything outside `{1,2,3,5}` rather than
    /// failing outright. Decoding a trace under an unrecognised code is what actually fails.
    pub fn new(code: i16) -> Option<Self> {
        FromPrimitive::from_i16(code)
    }

    /// Byte width of one sample in this format.
    pub fn sample_size(self) -> usize {
        match self {
            SampleFormatCode::IbmFloat32 | SampleFormatCode::Int32 | SampleFormatCode::Float32 => 4,
            SampleFormatCode::Int16 => 2,
        }
    }

    /// The `-convert` CLI letter for this format (`S`hort/`I`nteger/`F`loat/`E` for IBM).
    pub fn from_convert_tag(tag: &str) -> Option<Self> {
        match tag {
            "S" => Some(SampleFormatCode::Int16),
            "I" => Some(SampleFormatCode::Int32),
            "F" => Some(SampleFormatCode::Float32),
            "E" => Some(SampleFormatCode::IbmFloat32),
            _ => None,
        }
    }
}

impl std::fmt::Display for SampleFormatCode {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SampleFormatCode::IbmFloat32 => "IBM float32",
            SampleFormatCode::Int32 => "int32",
            SampleFormatCode::Int16 => "int16",
            SampleFormatCode::Float32 => "IEEE float32",
        };
        write!(fmt, "{}", name)
    }
}

/// `COORDINATE_UNITS` at trace-header offset 88.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum CoordinateUnits {
    LengthMetersOrFeet = 1,
    ArcSeconds = 2,
}

impl CoordinateUnits {
    pub fn new(code: i16) -> Self {
        FromPrimitive::from_i16(code).unwrap_or(CoordinateUnits::LengthMetersOrFeet)
    }

    /// Parse the coordinate file's unit word (`meters`/`feet`/`arcsec`).
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "meters" | "feet" => Some(CoordinateUnits::LengthMetersOrFeet),
            "arcsec" => Some(CoordinateUnits::ArcSeconds),
            _ => None,
        }
    }
}

/// `MEASUREMENT_SYSTEM` at reel-header offset 3254.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum MeasurementSystem {
    Meters = 1,
    Feet = 2,
}

impl MeasurementSystem {
    pub fn new(code: i16) -> Option<Self> {
        FromPrimitive::from_i16(code)
    }
}

/// Which endpoint of a trace a coordinate injection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateTarget {
    Source,
    Receiver,
}

impl CoordinateTarget {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "SOURCE" => Some(CoordinateTarget::Source),
            "RECEIVER" => Some(CoordinateTarget::Receiver),
            _ => None,
        }
    }
}
