//! Streaming writes of the reel header and successive traces, including the EBCDIC text-block
//! replacement and the provenance watermark.
use segy_core::header::HeaderBuffer;
use segy_core::{ReelHeader, SegyError, TraceHeader};
use std::io::Write;

/// The provenance string stamped at offset 3120 of the EBCDIC block unless `-no_EBCDIC_stamp`
/// is given. Exactly [`segy_core::header::EBCDIC_WATERMARK_LEN`] (77) characters.
pub const WATERMARK: &str = "This SEG-Y file was rewritten by the segy transform pipeline on this machine.";

/// Translate an ASCII string to EBCDIC bytes, truncating or padding with spaces to `len`.
pub fn ascii_to_ebcdic(text: &str, len: usize) -> Vec<u8> {
    let mut out: Vec<u8> = text
        .bytes()
        .take(len)
        .map(encoding8::ascii::to_ebcdic)
        .collect();
    out.resize(len, encoding8::ascii::to_ebcdic(b' '));
    out
}

/// Write the reel header. If `ebcdic_text` is `Some`, the 3200-byte EBCDIC block is overwritten
/// with its ASCII->EBCDIC translation (truncated at 3200) before the watermark is applied.
pub fn write_reel_header<W: Write>(
    stream: &mut W,
    header: &mut ReelHeader,
    ebcdic_text: Option<&str>,
    stamp_watermark: bool,
) -> Result<(), SegyError> {
    if let Some(text) = ebcdic_text {
        let translated = ascii_to_ebcdic(text, segy_core::TEXT_HEADER_LEN);
        header.ebcdic_block_mut().copy_from_slice(&translated);
    }
    if stamp_watermark {
        let stamp = ascii_to_ebcdic(WATERMARK, segy_core::header::EBCDIC_WATERMARK_LEN);
        header.write_ebcdic_range(segy_core::header::EBCDIC_WATERMARK_OFFSET, &stamp);
    }
    stream.write_all(header.bytes())?;
    Ok(())
}

/// Write one trace: header then payload, in that order, matching the pipeline's ordering
/// guarantee that trace *i* is fully written before trace *i+1* begins.
pub fn write_trace<W: Write>(stream: &mut W, header: &TraceHeader, payload: &[u8]) -> Result<(), SegyError> {
    stream.write_all(header.bytes())?;
    stream.write_all(payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use segy_core::TEXT_HEADER_LEN;

    #[test]
    fn watermark_is_exactly_77_characters() {
        assert_eq!(WATERMARK.len(), segy_core::header::EBCDIC_WATERMARK_LEN);
    }

    #[test]
    fn ascii_to_ebcdic_pads_to_length() {
        let out = ascii_to_ebcdic("hi", 5);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn write_reel_header_stamps_watermark_by_default() {
        let mut header = ReelHeader::default();
        let mut out = Vec::new();
        write_reel_header(&mut out, &mut header, None, true).unwrap();
        assert_eq!(out.len(), segy_core::REEL_HEADER_LEN);
        let expected = ascii_to_ebcdic(WATERMARK, segy_core::header::EBCDIC_WATERMARK_LEN);
        let off = segy_core::header::EBCDIC_WATERMARK_OFFSET;
        assert_eq!(&out[off..off + expected.len()], &expected[..]);
    }

    #[test]
    fn write_reel_header_suppresses_watermark_when_asked() {
        let mut header = ReelHeader::default();
        let mut out = Vec::new();
        write_reel_header(&mut out, &mut header, None, false).unwrap();
        let off = segy_core::header::EBCDIC_WATERMARK_OFFSET;
        assert!(out[off..off + 77].iter().all(|&b| b == 0));
    }

    #[test]
    fn write_reel_header_replaces_ebcdic_text_when_given() {
        let mut header = ReelHeader::default();
        let mut out = Vec::new();
        write_reel_header(&mut out, &mut header, Some("hello"), false).unwrap();
        assert_eq!(out.len(), segy_core::REEL_HEADER_LEN);
        assert_ne!(&out[..TEXT_HEADER_LEN], &[0u8; TEXT_HEADER_LEN][..]);
    }
}
