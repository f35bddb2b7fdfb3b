//! The trace keep/drop predicate (`-record`, `-trace`, `-only_traces_with`).
use crate::selector::SelectedField;
use segy_core::header::HeaderBuffer;
use segy_core::TraceHeader;

/// Inclusive bounds, defaulting to `[0, 99999999]` per the spec (`-all` forces both back to
/// these defaults).
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub lo: i64,
    pub hi: i64,
}

impl Default for Range {
    fn default() -> Self {
        Range { lo: 0, hi: 99_999_999 }
    }
}

impl Range {
    pub fn contains(self, v: i64) -> bool {
        v >= self.lo && v <= self.hi
    }
}

/// Parameters for `keep_trace`.
pub struct FilterOptions {
    pub trace_range: Range,
    /// Offset of the field `-num_trace_offset` addresses; defaults to 12
    /// (`TRACE_NUMBER_WITHIN_FIELD_RECORD`).
    pub trace_number_offset: usize,
    pub record_range: Range,
    pub only_traces_with: Vec<SelectedField>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            trace_range: Range::default(),
            trace_number_offset: 12,
            record_range: Range::default(),
            only_traces_with: Vec::new(),
        }
    }
}

/// Evaluate the keep/drop predicate for one trace.
pub fn keep_trace(header: &TraceHeader, opts: &FilterOptions) -> bool {
    let trace_num = header
        .get_at(opts.trace_number_offset, segy_core::enums::ScalarKind::Integer)
        .map(|v| v.as_i64())
        .unwrap_or(0);
    if !opts.trace_range.contains(trace_num) {
        return false;
    }

    if !opts.record_range.contains(header.field_record_number() as i64) {
        return false;
    }

    for sel in &opts.only_traces_with {
        let expected = match sel.value {
            Some(v) => v.as_f64(),
            None => continue,
        };
        let actual = match header.get_at(sel.offset, sel.kind) {
            Ok(v) => v.as_f64(),
            Err(_) => return false,
        };
        if (actual - expected).abs() > f64::EPSILON {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use segy_core::enums::ScalarKind;
    use segy_core::header::FieldValue;

    #[test]
    fn default_range_keeps_everything_reasonable() {
        let h = TraceHeader::default();
        let opts = FilterOptions::default();
        assert!(keep_trace(&h, &opts));
    }

    #[test]
    fn trace_range_excludes_out_of_bounds() {
        let mut h = TraceHeader::default();
        h.set_trace_number_within_record(5);
        let opts = FilterOptions { trace_range: Range { lo: 10, hi: 20 }, ..FilterOptions::default() };
        assert!(!keep_trace(&h, &opts));
    }

    #[test]
    fn only_traces_with_matches_equality() {
        let mut h = TraceHeader::default();
        h.set_at(28, FieldValue::UShort(1)).unwrap();
        let opts = FilterOptions {
            only_traces_with: vec![SelectedField { offset: 28, kind: ScalarKind::UShort, value: Some(FieldValue::UShort(1)) }],
            ..FilterOptions::default()
        };
        assert!(keep_trace(&h, &opts));

        h.set_at(28, FieldValue::UShort(2)).unwrap();
        assert!(!keep_trace(&h, &opts));
    }
}
