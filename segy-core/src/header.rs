//! Fixed-size byte-buffer header types with typed accessors derived from the field registry.
//!
//! Per-field endian handling happens only inside the accessors: the buffer itself always holds
//! the bytes as they came off (or will go to) disk, big-endian. This keeps a single source of
//! truth for "what does byte N mean" in the registry, instead of duplicating offsets into a
//! parsed struct the way a hand-written header type would.
use crate::bitconverter::{host_is_little_endian, read_i16, read_i32, read_ieee_f32, read_u16,
    write_i16, write_i32, write_ieee_f32, write_u16};
use crate::enums::ScalarKind;
use crate::errors::SegyError;
use crate::registry::{self, FieldDescriptor, REEL_FIELDS, TRACE_FIELDS};
use std::convert::TryInto;

pub const TEXT_HEADER_LEN: usize = 3200;
pub const BIN_HEADER_LEN: usize = 400;
pub const REEL_HEADER_LEN: usize = TEXT_HEADER_LEN + BIN_HEADER_LEN;
pub const TRACE_HEADER_LEN: usize = 240;
/// Offset (relative to the start of the reel header) where the provenance watermark is written.
pub const EBCDIC_WATERMARK_OFFSET: usize = 3120;
pub const EBCDIC_WATERMARK_LEN: usize = 77;

/// A scalar value read out of, or to be written into, a registered field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Short(i16),
    Integer(i32),
    IeeeFloat(f32),
    UShort(u16),
}

impl FieldValue {
    /// Interpret the value as `f64`, the common currency used by the filter predicate and the
    /// `-change_trace_fields`/`-change_header_fields` selectors.
    pub fn as_f64(self) -> f64 {
        match self {
            FieldValue::Short(v) => v as f64,
            FieldValue::Integer(v) => v as f64,
            FieldValue::IeeeFloat(v) => v as f64,
            FieldValue::UShort(v) => v as f64,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            FieldValue::Short(v) => v as i64,
            FieldValue::Integer(v) => v as i64,
            FieldValue::IeeeFloat(v) => v as i64,
            FieldValue::UShort(v) => v as i64,
        }
    }

    /// Build a value of the given kind from a textual representation, using `atoi`/`atof`
    /// semantics: parse failures fall back to zero rather than aborting the selector.
    pub fn parse(kind: ScalarKind, text: &str) -> FieldValue {
        match kind {
            ScalarKind::Short => FieldValue::Short(text.trim().parse().unwrap_or(0)),
            ScalarKind::Integer => FieldValue::Integer(text.trim().parse().unwrap_or(0)),
            ScalarKind::IeeeFloat => FieldValue::IeeeFloat(text.trim().parse().unwrap_or(0.0)),
            ScalarKind::UShort => FieldValue::UShort(text.trim().parse().unwrap_or(0)),
        }
    }
}

/// A fixed-size byte buffer with registry-driven field access, shared by [`ReelHeader`] and
/// [`TraceHeader`].
pub trait HeaderBuffer {
    fn bytes(&self) -> &[u8];
    fn bytes_mut(&mut self) -> &mut [u8];

    fn get_at(&self, offset: usize, kind: ScalarKind) -> Result<FieldValue, SegyError> {
        let le = host_is_little_endian();
        let b = self.bytes();
        if offset + kind.width() > b.len() {
            return Err(SegyError::WrongFieldOffset { offset });
        }
        Ok(match kind {
            ScalarKind::Short => FieldValue::Short(read_i16(b[offset..offset + 2].try_into()?, le)),
            ScalarKind::UShort => FieldValue::UShort(read_u16(b[offset..offset + 2].try_into()?, le)),
            ScalarKind::Integer => FieldValue::Integer(read_i32(b[offset..offset + 4].try_into()?, le)),
            ScalarKind::IeeeFloat => {
                FieldValue::IeeeFloat(read_ieee_f32(b[offset..offset + 4].try_into()?, le))
            }
        })
    }

    fn set_at(&mut self, offset: usize, value: FieldValue) -> Result<(), SegyError> {
        let le = host_is_little_endian();
        let width = match value {
            FieldValue::Short(_) | FieldValue::UShort(_) => 2,
            FieldValue::Integer(_) | FieldValue::IeeeFloat(_) => 4,
        };
        let b = self.bytes_mut();
        if offset + width > b.len() {
            return Err(SegyError::WrongFieldOffset { offset });
        }
        match value {
            FieldValue::Short(v) => b[offset..offset + 2].copy_from_slice(&write_i16(v, le)),
            FieldValue::UShort(v) => b[offset..offset + 2].copy_from_slice(&write_u16(v, le)),
            FieldValue::Integer(v) => b[offset..offset + 4].copy_from_slice(&write_i32(v, le)),
            FieldValue::IeeeFloat(v) => {
                b[offset..offset + 4].copy_from_slice(&write_ieee_f32(v, le))
            }
        }
        Ok(())
    }

    /// Reverse the byte order of every registered field. Used by `-flip_endianess` to normalise
    /// a file written on an opposite-endian architecture.
    fn flip_registered_fields(&mut self, table: &'static [FieldDescriptor]) {
        for f in table {
            let w = f.kind.width();
            let b = self.bytes_mut();
            if f.offset + w <= b.len() {
                b[f.offset..f.offset + w].reverse();
            }
        }
    }
}

/// The 3600-byte SEG-Y reel header: a 3200-byte EBCDIC text block followed by the 400-byte
/// binary block.
#[derive(Debug, Clone)]
pub struct ReelHeader {
    buf: [u8; REEL_HEADER_LEN],
}

impl Default for ReelHeader {
    fn default() -> Self {
        ReelHeader { buf: [0u8; REEL_HEADER_LEN] }
    }
}

impl HeaderBuffer for ReelHeader {
    fn bytes(&self) -> &[u8] {
        &self.buf
    }
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl ReelHeader {
    pub fn from_bytes(buf: [u8; REEL_HEADER_LEN]) -> Self {
        ReelHeader { buf }
    }

    pub fn ebcdic_block(&self) -> &[u8] {
        &self.buf[..TEXT_HEADER_LEN]
    }

    pub fn ebcdic_block_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..TEXT_HEADER_LEN]
    }

    /// Overwrite a range of the EBCDIC block (absolute reel-header offset) with raw bytes,
    /// truncating to fit. Used both for `-EBCDIC <path>` and the provenance watermark.
    pub fn write_ebcdic_range(&mut self, offset: usize, data: &[u8]) {
        let end = (offset + data.len()).min(TEXT_HEADER_LEN);
        if offset >= end {
            return;
        }
        let n = end - offset;
        self.buf[offset..end].copy_from_slice(&data[..n]);
    }

    pub fn get(&self, name: &str) -> Result<FieldValue, SegyError> {
        let f = registry::by_name(REEL_FIELDS, name)
            .ok_or_else(|| SegyError::WrongFieldName { name: name.to_string() })?;
        self.get_at(f.offset, f.kind)
    }

    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), SegyError> {
        let f = registry::by_name(REEL_FIELDS, name)
            .ok_or_else(|| SegyError::WrongFieldName { name: name.to_string() })?;
        self.set_at(f.offset, value)
    }

    pub fn sample_format_code(&self) -> i16 {
        match self.get_at(3224, ScalarKind::Short) {
            Ok(FieldValue::Short(v)) => v,
            _ => 0,
        }
    }

    pub fn set_sample_format_code(&mut self, code: i16) {
        let _ = self.set_at(3224, FieldValue::Short(code));
    }

    pub fn samples_per_trace(&self) -> i16 {
        match self.get_at(3220, ScalarKind::Short) {
            Ok(FieldValue::Short(v)) => v,
            _ => 0,
        }
    }

    pub fn set_samples_per_trace(&mut self, n: i16) {
        let _ = self.set_at(3220, FieldValue::Short(n));
    }

    pub fn sample_interval(&self) -> i16 {
        match self.get_at(3216, ScalarKind::Short) {
            Ok(FieldValue::Short(v)) => v,
            _ => 0,
        }
    }

    pub fn set_sample_interval(&mut self, v: i16) {
        let _ = self.set_at(3216, FieldValue::Short(v));
    }

    pub fn traces_per_record(&self) -> i16 {
        match self.get_at(3212, ScalarKind::Short) {
            Ok(FieldValue::Short(v)) => v,
            _ => 0,
        }
    }

    pub fn flip_endianness(&mut self) {
        self.flip_registered_fields(REEL_FIELDS);
    }
}

/// The 240-byte per-trace header.
#[derive(Debug, Clone)]
pub struct TraceHeader {
    buf: [u8; TRACE_HEADER_LEN],
}

impl Default for TraceHeader {
    fn default() -> Self {
        TraceHeader { buf: [0u8; TRACE_HEADER_LEN] }
    }
}

impl HeaderBuffer for TraceHeader {
    fn bytes(&self) -> &[u8] {
        &self.buf
    }
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl TraceHeader {
    pub fn from_bytes(buf: [u8; TRACE_HEADER_LEN]) -> Self {
        TraceHeader { buf }
    }

    pub fn get(&self, name: &str) -> Result<FieldValue, SegyError> {
        let f = registry::by_name(TRACE_FIELDS, name)
            .ok_or_else(|| SegyError::WrongFieldName { name: name.to_string() })?;
        self.get_at(f.offset, f.kind)
    }

    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), SegyError> {
        let f = registry::by_name(TRACE_FIELDS, name)
            .ok_or_else(|| SegyError::WrongFieldName { name: name.to_string() })?;
        self.set_at(f.offset, value)
    }

    pub fn field_record_number(&self) -> i32 {
        match self.get_at(8, ScalarKind::Integer) {
            Ok(FieldValue::Integer(v)) => v,
            _ => 0,
        }
    }

    pub fn set_field_record_number(&mut self, v: i32) {
        let _ = self.set_at(8, FieldValue::Integer(v));
    }

    pub fn trace_number_within_record(&self) -> i32 {
        match self.get_at(12, ScalarKind::Integer) {
            Ok(FieldValue::Integer(v)) => v,
            _ => 0,
        }
    }

    pub fn set_trace_number_within_record(&mut self, v: i32) {
        let _ = self.set_at(12, FieldValue::Integer(v));
    }

    pub fn trace_sequence_within_reel(&self) -> i32 {
        match self.get_at(4, ScalarKind::Integer) {
            Ok(FieldValue::Integer(v)) => v,
            _ => 0,
        }
    }

    /// `NUMBER_OF_SAMPLES_IN_THIS_TRACE` at offset 114, read as raw `i16` bits and then
    /// reinterpreted as unsigned (the source stores sample counts above 32767 as a negative
    /// two's-complement value, since the field has no unsigned SEG-Y-standard type).
    pub fn raw_sample_count(&self) -> u16 {
        let le = host_is_little_endian();
        let bytes: [u8; 2] = self.buf[114..116].try_into().expect("2 bytes");
        read_i16(&bytes, le) as u16
    }

    pub fn set_sample_count(&mut self, n: u16) {
        let _ = self.set_at(114, FieldValue::UShort(n));
    }

    pub fn sample_interval(&self) -> i16 {
        match self.get_at(116, ScalarKind::Short) {
            Ok(FieldValue::Short(v)) => v,
            _ => 0,
        }
    }

    pub fn set_sample_interval(&mut self, v: i16) {
        let _ = self.set_at(116, FieldValue::Short(v));
    }

    pub fn delay_time(&self) -> i16 {
        match self.get_at(108, ScalarKind::Short) {
            Ok(FieldValue::Short(v)) => v,
            _ => 0,
        }
    }

    pub fn set_delay_time(&mut self, v: i16) {
        let _ = self.set_at(108, FieldValue::Short(v));
    }

    pub fn flip_endianness(&mut self) {
        self.flip_registered_fields(TRACE_FIELDS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reel_header_sample_format_round_trip() {
        let mut h = ReelHeader::default();
        h.set_sample_format_code(5);
        assert_eq!(h.sample_format_code(), 5);
        assert_eq!(h.get("DATA_SAMPLE_FORMAT_CODE").unwrap(), FieldValue::Short(5));
    }

    #[test]
    fn trace_header_negative_sample_count_reinterpreted_unsigned() {
        let mut h = TraceHeader::default();
        // -1 as i16 is 0xFFFF -> 65535 as u16.
        h.set_at(114, FieldValue::Short(-1)).unwrap();
        assert_eq!(h.raw_sample_count(), 65535);
    }

    #[test]
    fn trace_header_named_accessors_match_offsets() {
        let mut h = TraceHeader::default();
        h.set("ORIGINAL_FIELD_RECORD_NUMBER", FieldValue::Integer(42)).unwrap();
        assert_eq!(h.field_record_number(), 42);
        assert_eq!(h.get("ORIGINAL_FIELD_RECORD_NUMBER").unwrap(), FieldValue::Integer(42));
    }

    #[test]
    fn unknown_field_name_is_an_error() {
        let h = TraceHeader::default();
        assert!(matches!(h.get("NOT_A_FIELD"), Err(SegyError::WrongFieldName { .. })));
    }

    #[test]
    fn flip_endianness_reverses_registered_field_bytes() {
        let mut h = TraceHeader::default();
        h.buf[8..12].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        h.flip_endianness();
        assert_eq!(&h.buf[8..12], &[0x04, 0x03, 0x02, 0x01]);
    }
}
