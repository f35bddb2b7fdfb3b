//! The reel-header and trace-header field registries: static `(name, offset, scalar kind)`
//! tables that let every other component address a header field either by byte offset plus
//! type, or by symbolic name.
use crate::enums::ScalarKind;

/// One entry of a registry: a field's symbolic name, its byte offset, and its scalar type.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub offset: usize,
    pub kind: ScalarKind,
}

use ScalarKind::*;

/// The binary reel header's registered fields, at their absolute file offsets (the 3200-byte
/// EBCDIC block precedes them, so offsets start at 3200).
pub const REEL_FIELDS: &[FieldDescriptor] = &[
    fd("JOB_IDENTIFICATION_NUMBER", 3200, Integer),
    fd("LINE_NUMBER", 3204, Integer),
    fd("REEL_NUMBER", 3208, Integer),
    fd("NUMBER_OF_DATA_TRACES_PER_RECORD", 3212, Short),
    fd("NUMBER_OF_AUXILIARY_TRACES_PER_RECORD", 3214, UShort),
    fd("SAMPLE_INTERVAL_FOR_THIS_REEL_MICROSECONDS", 3216, Short),
    fd("SAMPLE_INTERVAL_OF_ORIGINAL_FIELD_RECORDING", 3218, UShort),
    fd("NUMBER_OF_SAMPLES_PER_DATA_TRACE_FOR_THIS_REEL", 3220, Short),
    fd("NUMBER_OF_SAMPLES_OF_ORIGINAL_FIELD_RECORDING", 3222, UShort),
    fd("DATA_SAMPLE_FORMAT_CODE", 3224, Short),
    fd("ENSEMBLE_FOLD", 3226, UShort),
    fd("TRACE_SORTING_CODE", 3228, Short),
    fd("VERTICAL_SUM_CODE", 3230, UShort),
    fd("SWEEP_FREQUENCY_AT_START", 3232, UShort),
    fd("SWEEP_FREQUENCY_AT_END", 3234, UShort),
    fd("SWEEP_LENGTH", 3236, UShort),
    fd("SWEEP_TYPE_CODE", 3238, Short),
    fd("TRACE_NUMBER_OF_SWEEP_CHANNEL", 3240, UShort),
    fd("SWEEP_TRACE_TAPER_LENGTH_AT_START", 3242, UShort),
    fd("SWEEP_TRACE_TAPER_LENGTH_AT_END", 3244, UShort),
    fd("TAPER_TYPE", 3246, Short),
    fd("CORRELATED_DATA_TRACES", 3248, Short),
    fd("BINARY_GAIN_RECOVERED", 3250, Short),
    fd("AMPLITUDE_RECOVERY_METHOD", 3252, Short),
    fd("MEASUREMENT_SYSTEM", 3254, Short),
    fd("IMPULSE_SIGNAL_POLARITY", 3256, Short),
    fd("VIBRATORY_POLARITY_CODE", 3258, Short),
];

/// The per-trace header's registered fields, at their offsets within the 240-byte trace header.
pub const TRACE_FIELDS: &[FieldDescriptor] = &[
    fd("TRACE_SEQUENCE_NUMBER_WITHIN_LINE", 0, Integer),
    fd("TRACE_SEQUENCE_NUMBER_WITHIN_REEL", 4, Integer),
    fd("ORIGINAL_FIELD_RECORD_NUMBER", 8, Integer),
    fd("TRACE_NUMBER_WITHIN_FIELD_RECORD", 12, Integer),
    fd("ENERGY_SOURCE_POINT_NUMBER", 16, Integer),
    fd("ENSEMBLE_NUMBER", 20, Integer),
    fd("TRACE_NUMBER_WITHIN_ENSEMBLE", 24, Integer),
    fd("TRACE_IDENTIFICATION_CODE", 28, UShort),
    fd("NUMBER_OF_VERTICALLY_SUMMED_TRACES", 30, UShort),
    fd("NUMBER_OF_HORIZONTALLY_STACKED_TRACES", 32, UShort),
    fd("DATA_USE", 34, UShort),
    fd("SOURCE_TO_RECEIVER_DISTANCE", 36, Integer),
    fd("ELEVATION_OF_RECEIVER_GROUP", 40, Integer),
    fd("SURFACE_ELEVATION_OF_SOURCE", 44, Integer),
    fd("SOURCE_DEPTH", 48, Integer),
    fd("DATUM_ELEVATION_OF_RECEIVER_GROUP", 52, Integer),
    fd("DATUM_ELEVATION_OF_SOURCE", 56, Integer),
    fd("WATER_COLUMN_HEIGHT_AT_SOURCE", 60, Integer),
    fd("WATER_COLUMN_HEIGHT_AT_GROUP", 64, Integer),
    fd("ELEVATION_SCALAR", 68, Short),
    fd("COORDINATE_MULTIPLICATION_SCALAR", 70, Short),
    fd("SOURCE_X", 72, Integer),
    fd("SOURCE_Y", 76, Integer),
    fd("RECEIVER_X", 80, Integer),
    fd("RECEIVER_Y", 84, Integer),
    fd("COORDINATE_UNITS", 88, Short),
    fd("WEATHERING_VELOCITY", 90, UShort),
    fd("SUB_WEATHERING_VELOCITY", 92, UShort),
    fd("UPHOLE_TIME_AT_SOURCE", 94, UShort),
    fd("UPHOLE_TIME_AT_GROUP", 96, UShort),
    fd("SOURCE_STATIC_CORRECTION", 98, UShort),
    fd("GROUP_STATIC_CORRECTION", 100, UShort),
    fd("TOTAL_STATIC_APPLIED", 102, UShort),
    fd("LAG_TIME_A", 104, UShort),
    fd("LAG_TIME_B", 106, UShort),
    fd("DELAY_TIME", 108, Short),
    fd("MUTE_TIME_START", 110, UShort),
    fd("MUTE_TIME_END", 112, UShort),
    fd("NUMBER_OF_SAMPLES_IN_THIS_TRACE", 114, UShort),
    fd("SAMPLE_INTERVAL_MICROSECONDS", 116, Short),
    fd("GAIN_TYPE", 118, UShort),
    fd("INSTRUMENT_GAIN_CONSTANT", 120, UShort),
    fd("INSTRUMENT_INITIAL_GAIN", 122, UShort),
    fd("CORRELATED", 124, UShort),
    fd("SWEEP_FREQUENCY_AT_START", 126, UShort),
    fd("SWEEP_FREQUENCY_AT_END", 128, UShort),
    fd("SWEEP_LENGTH", 130, UShort),
    fd("SWEEP_TYPE", 132, UShort),
    fd("SWEEP_TRACE_TAPER_LENGTH_AT_START", 134, UShort),
    fd("SWEEP_TRACE_TAPER_LENGTH_AT_END", 136, UShort),
    fd("TAPER_TYPE", 138, UShort),
    fd("ALIAS_FILTER_FREQUENCY", 140, UShort),
    fd("ALIAS_FILTER_SLOPE", 142, UShort),
    fd("NOTCH_FILTER_FREQUENCY", 144, UShort),
    fd("NOTCH_FILTER_SLOPE", 146, UShort),
    fd("LOW_CUT_FREQUENCY", 148, UShort),
    fd("HIGH_CUT_FREQUENCY", 150, UShort),
    fd("LOW_CUT_SLOPE", 152, UShort),
    fd("HIGH_CUT_SLOPE", 154, UShort),
    fd("YEAR_RECORDED", 156, UShort),
    fd("DAY_OF_YEAR", 158, UShort),
    fd("HOUR_OF_DAY", 160, UShort),
    fd("MINUTE_OF_HOUR", 162, UShort),
    fd("SECOND_OF_MINUTE", 164, UShort),
    fd("TIME_BASIS_CODE", 166, UShort),
    fd("TRACE_WEIGHTING_FACTOR", 168, UShort),
    fd("GEOPHONE_GROUP_NUMBER_ROLL_POS1", 170, UShort),
    fd("GEOPHONE_GROUP_NUMBER_FIRST_TRACE", 172, UShort),
    fd("GEOPHONE_GROUP_NUMBER_LAST_TRACE", 174, UShort),
    fd("GAP_SIZE", 176, UShort),
    fd("OVER_TRAVEL", 178, UShort),
    fd("CDP_X", 180, Integer),
    fd("CDP_Y", 184, Integer),
    fd("INLINE_NUMBER", 188, Integer),
    fd("CROSSLINE_NUMBER", 192, Integer),
    fd("SHOT_POINT_NUMBER", 196, Integer),
    fd("SHOT_POINT_SCALAR", 200, UShort),
    fd("TRACE_VALUE_MEASUREMENT_UNIT", 202, UShort),
    fd("TRANSDUCTION_CONSTANT_MANTISSA", 204, Integer),
    fd("TRANSDUCTION_CONSTANT_EXPONENT", 208, Short),
    fd("TRANSDUCTION_UNITS", 210, UShort),
    fd("DEVICE_TRACE_IDENTIFIER", 212, UShort),
    fd("TIMES_SCALAR", 214, Short),
    fd("SOURCE_TYPE_ORIENTATION", 216, UShort),
    fd("SOURCE_ENERGY_DIRECTION_MANTISSA", 218, Integer),
    fd("SOURCE_ENERGY_DIRECTION_EXPONENT", 222, Short),
    fd("SOURCE_MEASUREMENT_MANTISSA", 224, Integer),
    fd("SOURCE_MEASUREMENT_EXPONENT", 228, Short),
    fd("SOURCE_MEASUREMENT_UNIT", 230, UShort),
];

const fn fd(name: &'static str, offset: usize, kind: ScalarKind) -> FieldDescriptor {
    FieldDescriptor { name, offset, kind }
}

/// Look up a field by symbolic name in either registry.
pub fn by_name(table: &'static [FieldDescriptor], name: &str) -> Option<FieldDescriptor> {
    table.iter().copied().find(|f| f.name == name)
}

/// Look up a field by its byte offset in either registry.
pub fn by_offset(table: &'static [FieldDescriptor], offset: usize) -> Option<FieldDescriptor> {
    table.iter().copied().find(|f| f.offset == offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reel_fields_unique_offsets() {
        let mut offsets: Vec<usize> = REEL_FIELDS.iter().map(|f| f.offset).collect();
        let len = offsets.len();
        offsets.sort_unstable();
        offsets.dedup();
        assert_eq!(offsets.len(), len, "duplicate offsets in reel registry");
    }

    #[test]
    fn trace_fields_unique_offsets() {
        let mut offsets: Vec<usize> = TRACE_FIELDS.iter().map(|f| f.offset).collect();
        let len = offsets.len();
        offsets.sort_unstable();
        offsets.dedup();
        assert_eq!(offsets.len(), len, "duplicate offsets in trace registry");
    }

    #[test]
    fn sample_format_code_by_name() {
        let f = by_name(REEL_FIELDS, "DATA_SAMPLE_FORMAT_CODE").unwrap();
        assert_eq!(f.offset, 3224);
        assert_eq!(f.kind, ScalarKind::Short);
    }

    #[test]
    fn coordinate_fields_by_offset() {
        assert_eq!(by_offset(TRACE_FIELDS, 70).unwrap().name, "COORDINATE_MULTIPLICATION_SCALAR");
        assert_eq!(by_offset(TRACE_FIELDS, 114).unwrap().name, "NUMBER_OF_SAMPLES_IN_THIS_TRACE");
    }

    #[test]
    fn rev1_trailing_fields_registered() {
        assert_eq!(by_name(TRACE_FIELDS, "TRANSDUCTION_CONSTANT_MANTISSA").unwrap().offset, 204);
        assert_eq!(by_name(TRACE_FIELDS, "SOURCE_MEASUREMENT_UNIT").unwrap().offset, 230);
    }

    #[test]
    fn unknown_name_and_offset() {
        assert!(by_name(TRACE_FIELDS, "NOT_A_FIELD").is_none());
        assert!(by_offset(TRACE_FIELDS, 9999).is_none());
    }
}
