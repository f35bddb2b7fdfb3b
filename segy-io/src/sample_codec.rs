//! Conversion of a trace's raw payload bytes to and from an in-memory sequence of `f64`
//! samples, plus the two sample-domain transforms that operate on that sequence: windowing
//! (`-skip_n_samples`/`-only_n_samples`) and vertical stacking (`-vertical_stack`).
use segy_core::bitconverter::{
    decode_ibm_float32, decode_ieee_float32, decode_int16, decode_int32, encode_ibm_float32,
    encode_ieee_float32, encode_int16, encode_int32, SampleDecoder, SampleEncoder,
};
use segy_core::{SampleFormatCode, SegyError};

/// Choose the decode function for a sample format. There is no little-endian branch here: the
/// on-disk sample payload is always big-endian, unlike the `-flip_endianess` header-swap option
/// which is handled separately by the caller before decoding begins.
pub fn decoder_for(format: SampleFormatCode) -> SampleDecoder {
    match format {
        SampleFormatCode::IbmFloat32 => decode_ibm_float32,
        SampleFormatCode::Int32 => decode_int32,
        SampleFormatCode::Int16 => decode_int16,
        SampleFormatCode::Float32 => decode_ieee_float32,
    }
}

pub fn encoder_for(format: SampleFormatCode) -> SampleEncoder {
    match format {
        SampleFormatCode::IbmFloat32 => encode_ibm_float32,
        SampleFormatCode::Int32 => encode_int32,
        SampleFormatCode::Int16 => encode_int16,
        SampleFormatCode::Float32 => encode_ieee_float32,
    }
}

/// Decode a trace payload into `f64` samples given the reel's declared format.
pub fn decode_samples(payload: &[u8], format: SampleFormatCode) -> Vec<f64> {
    let width = format.sample_size();
    let decode = decoder_for(format);
    payload.chunks_exact(width).map(decode).collect()
}

/// Encode `f64` samples into their on-disk byte layout for the given format.
pub fn encode_samples(samples: &[f64], format: SampleFormatCode) -> Vec<u8> {
    let width = format.sample_size();
    let encode = encoder_for(format);
    let mut out = vec![0u8; samples.len() * width];
    for (chunk, &s) in out.chunks_exact_mut(width).zip(samples) {
        encode(s, chunk);
    }
    out
}

/// Raise `SegyError::UnknownSampleFormat` if the reel's declared code is not decodable.
pub fn require_format(code: i16) -> Result<SampleFormatCode, SegyError> {
    SampleFormatCode::new(code).ok_or(SegyError::UnknownSampleFormat { code })
}

/// Apply `-skip_n_samples s` and/or `-only_n_samples n` to a decoded sample sequence.
/// Returns the windowed samples and the delay-time increment (in the header's time units,
/// truncated toward zero) that the caller must add to the trace's delay time.
pub fn window_samples(samples: &[f64], skip: usize, only: Option<usize>, sample_interval: i16) -> (Vec<f64>, i16) {
    if skip == 0 && only.is_none() {
        return (samples.to_vec(), 0);
    }
    let remaining = samples.len().saturating_sub(skip);
    let len = only.map(|n| n.min(remaining)).unwrap_or(remaining);
    let windowed = samples.get(skip..skip + len).unwrap_or(&[]).to_vec();
    let delay_increment = if skip == 0 {
        0
    } else {
        ((skip as i64) * (sample_interval as i64) / 1000) as i16
    };
    (windowed, delay_increment)
}

/// Sum consecutive groups of `k` samples. The trailing `samples.len() % k` samples that do not
/// form a full group are dropped, matching the `⌊samples / k⌋` output length from the spec.
pub fn vertical_stack(samples: &[f64], k: usize) -> Vec<f64> {
    if k < 2 {
        return samples.to_vec();
    }
    samples.chunks_exact(k).map(|group| group.iter().sum()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_ieee_float() {
        let samples = [0.5, -1.0, 0.0, 16.0];
        let bytes = encode_samples(&samples, SampleFormatCode::Float32);
        let back = decode_samples(&bytes, SampleFormatCode::Float32);
        assert_eq!(back, samples);
    }

    #[test]
    fn convert_to_ibm_matches_known_fixture() {
        let bytes = encode_samples(&[-1.0], SampleFormatCode::IbmFloat32);
        assert_eq!(bytes, vec![0xC1, 0x10, 0x00, 0x00]);
    }

    #[test]
    fn window_skip_and_only() {
        let samples: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let (windowed, delay) = window_samples(&samples, 2, Some(3), 4000);
        assert_eq!(windowed, vec![2.0, 3.0, 4.0]);
        assert_eq!(delay, 8);
    }

    #[test]
    fn window_only_clamped_to_remaining() {
        let samples: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let (windowed, _) = window_samples(&samples, 3, Some(100), 1000);
        assert_eq!(windowed, vec![3.0, 4.0]);
    }

    #[test]
    fn vertical_stack_sums_groups_and_drops_remainder() {
        let samples = vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 9.0];
        let stacked = vertical_stack(&samples, 3);
        assert_eq!(stacked, vec![3.0, 6.0]);
    }
}
