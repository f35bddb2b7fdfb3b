//! Streaming, single-pass reads of the reel header and successive traces.
use segy_core::header::HeaderBuffer;
use segy_core::{ReelHeader, SegyError, TraceHeader, REEL_HEADER_LEN, TRACE_HEADER_LEN};
use std::io::Read;

/// Read the 3600-byte reel header. Applies `-flip_endianess` to every registered field when
/// `flip_endianness` is set, which normalises a file written on an opposite-endian architecture.
pub fn read_reel_header<R: Read>(stream: &mut R, flip_endianness: bool) -> Result<ReelHeader, SegyError> {
    let mut buf = [0u8; REEL_HEADER_LEN];
    let got = read_fill(stream, &mut buf)?;
    if got != REEL_HEADER_LEN {
        return Err(SegyError::ShortHeader { got });
    }
    let mut header = ReelHeader::from_bytes(buf);
    if flip_endianness {
        header.flip_endianness();
    }

    let format = header.sample_format_code();
    if !matches!(format, 1 | 2 | 3 | 5) {
        log::warn!("DATA_SAMPLE_FORMAT_CODE {} is not a known format; correct the reel header", format);
    }
    if header.traces_per_record() == 0 {
        log::warn!("NUMBER_OF_DATA_TRACES_PER_RECORD is zero; treating as 1 for renumbering");
    }
    Ok(header)
}

/// One trace as read from the stream: its header plus raw (still on-disk-encoded) payload
/// bytes. Decoding into `f64` samples is a separate step (`sample_codec::decode_samples`) so
/// the reader stays agnostic of the sample format beyond sizing the payload read.
#[derive(Debug)]
pub struct RawTrace {
    pub header: TraceHeader,
    pub payload: Vec<u8>,
}

/// Read one trace. Returns `Ok(None)` at a clean EOF before any header bytes were read.
///
/// `samples_per_trace_override`: if the header's sample count is zero, this value (from
/// `-samples_per_trace`) is used instead of failing with `ZeroSamples`.
#[allow(clippy::too_many_arguments)]
pub fn read_trace<R: Read>(
    stream: &mut R,
    flip_endianness: bool,
    sample_size: usize,
    samples_per_trace_override: Option<u16>,
) -> Result<Option<RawTrace>, SegyError> {
    let mut hbuf = [0u8; TRACE_HEADER_LEN];
    let got = read_fill(stream, &mut hbuf)?;
    if got == 0 {
        return Ok(None);
    }
    if got != TRACE_HEADER_LEN {
        return Err(SegyError::TruncatedTraceHeader { got });
    }
    let mut header = TraceHeader::from_bytes(hbuf);
    if flip_endianness {
        header.flip_endianness();
    }

    let mut n_samples = header.raw_sample_count();
    if n_samples == 0 {
        match samples_per_trace_override {
            Some(n) => n_samples = n,
            None => return Err(SegyError::ZeroSamples),
        }
    }

    let expected = n_samples as usize * sample_size;
    let mut payload = vec![0u8; expected];
    let got = read_fill(stream, &mut payload)?;
    if got != expected {
        return Err(SegyError::TruncatedPayload { expected, got });
    }
    if flip_endianness {
        for chunk in payload.chunks_mut(sample_size) {
            chunk.reverse();
        }
    }
    Ok(Some(RawTrace { header, payload }))
}

/// Read until `buf` is full or EOF, returning the number of bytes actually read (short reads
/// from intermediate `read()` calls are retried, matching `Read::read_exact`'s semantics but
/// tolerating a clean EOF at the very start of the buffer).
fn read_fill<R: Read>(stream: &mut R, buf: &mut [u8]) -> Result<usize, SegyError> {
    let mut total = 0;
    while total < buf.len() {
        match stream.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(SegyError::Io(e)),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn short_reel_header_is_an_error() {
        let mut cursor = Cursor::new(vec![0u8; 100]);
        let err = read_reel_header(&mut cursor, false).unwrap_err();
        assert!(matches!(err, SegyError::ShortHeader { got: 100 }));
    }

    #[test]
    fn reel_header_reads_sample_format_code() {
        let mut bytes = vec![0u8; REEL_HEADER_LEN];
        bytes[3224..3226].copy_from_slice(&5i16.to_be_bytes());
        let mut cursor = Cursor::new(bytes);
        let h = read_reel_header(&mut cursor, false).unwrap();
        assert_eq!(h.sample_format_code(), 5);
    }

    #[test]
    fn clean_eof_before_trace_header_returns_none() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let t = read_trace(&mut cursor, false, 4, None).unwrap();
        assert!(t.is_none());
    }

    #[test]
    fn truncated_trace_header_is_an_error() {
        let mut cursor = Cursor::new(vec![0u8; 50]);
        let err = read_trace(&mut cursor, false, 4, None).unwrap_err();
        assert!(matches!(err, SegyError::TruncatedTraceHeader { got: 50 }));
    }

    #[test]
    fn reads_full_trace_with_payload() {
        let mut bytes = vec![0u8; TRACE_HEADER_LEN];
        bytes[114..116].copy_from_slice(&4i16.to_be_bytes());
        bytes.extend(std::iter::repeat(0u8).take(4 * 4));
        let mut cursor = Cursor::new(bytes);
        let t = read_trace(&mut cursor, false, 4, None).unwrap().unwrap();
        assert_eq!(t.payload.len(), 16);
    }

    #[test]
    fn zero_samples_overridden() {
        let bytes = vec![0u8; TRACE_HEADER_LEN];
        let mut cursor = Cursor::new(bytes);
        let t = read_trace(&mut cursor, false, 4, Some(3)).unwrap().unwrap();
        assert_eq!(t.payload.len(), 12);
    }

    #[test]
    fn zero_samples_without_override_is_an_error() {
        let bytes = vec![0u8; TRACE_HEADER_LEN];
        let mut cursor = Cursor::new(bytes);
        let err = read_trace(&mut cursor, false, 4, None).unwrap_err();
        assert!(matches!(err, SegyError::ZeroSamples));
    }
}
