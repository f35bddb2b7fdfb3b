//! Parses user-supplied field selectors into a canonical offset+type(+value) list.
//!
//! A selector has two syntactic forms, switched by the `-use_names` flag:
//! - numeric: `off0:T0[:v0]{,off1:T1[:v1]...}` where `T` is one of `S`/`I`/`F`/`U`;
//! - named: `name0[:v0]{,name1[:v1]...}`, resolved against a field registry before the rest of
//!   the pipeline sees it.
//!
//! The parser splits on commas at the top level and on colons within a token; the first colon
//! separates the name-or-offset from the type or value.
use segy_core::enums::ScalarKind;
use segy_core::header::FieldValue;
use segy_core::registry::{self, FieldDescriptor};
use segy_core::SegyError;

/// Maximum total selector length in bytes, per the spec's documented cap.
pub const MAX_SELECTOR_LEN: usize = 2048;

/// One resolved `(offset, type, optional value)` entry from a selector string.
#[derive(Debug, Clone, Copy)]
pub struct SelectedField {
    pub offset: usize,
    pub kind: ScalarKind,
    pub value: Option<FieldValue>,
}

/// Parse a selector string against the given registry (reel or trace fields).
///
/// `use_names` selects the named (`name[:v]`) syntax; otherwise the numeric
/// (`off:T[:v]`) syntax is used.
pub fn parse_selector(
    selector: &str,
    registry: &'static [FieldDescriptor],
    use_names: bool,
) -> Result<Vec<SelectedField>, SegyError> {
    if selector.len() > MAX_SELECTOR_LEN {
        return Err(SegyError::SelectorSyntax { selector: selector.to_string() });
    }
    selector
        .split(',')
        .filter(|t| !t.is_empty())
        .map(|token| parse_token(token, registry, use_names))
        .collect()
}

fn parse_token(
    token: &str,
    registry: &'static [FieldDescriptor],
    use_names: bool,
) -> Result<SelectedField, SegyError> {
    let mut parts = token.splitn(3, ':');
    let head = parts
        .next()
        .ok_or_else(|| SegyError::SelectorSyntax { selector: token.to_string() })?;

    let (offset, kind, value_part) = if use_names {
        let field = registry::by_name(registry, head)
            .ok_or_else(|| SegyError::WrongFieldName { name: head.to_string() })?;
        (field.offset, field.kind, parts.next())
    } else {
        let offset: usize = head
            .parse()
            .map_err(|_| SegyError::SelectorSyntax { selector: token.to_string() })?;
        let tag = parts
            .next()
            .ok_or_else(|| SegyError::SelectorSyntax { selector: token.to_string() })?;
        let kind = ScalarKind::from_tag(tag)
            .ok_or_else(|| SegyError::SelectorSyntax { selector: token.to_string() })?;
        if registry::by_offset(registry, offset).is_none() {
            return Err(SegyError::WrongFieldOffset { offset });
        }
        (offset, kind, parts.next())
    };

    let value = value_part.map(|text| FieldValue::parse(kind, text));
    Ok(SelectedField { offset, kind, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use segy_core::TRACE_FIELDS;

    #[test]
    fn numeric_form_with_value() {
        let fields = parse_selector("12:I:7", TRACE_FIELDS, false).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].offset, 12);
        assert_eq!(fields[0].kind, ScalarKind::Integer);
        assert_eq!(fields[0].value.unwrap().as_i64(), 7);
    }

    #[test]
    fn named_form_resolves_via_registry() {
        let fields = parse_selector("TRACE_NUMBER_WITHIN_FIELD_RECORD:3", TRACE_FIELDS, true).unwrap();
        assert_eq!(fields[0].offset, 12);
    }

    #[test]
    fn multiple_comma_separated_entries() {
        let fields = parse_selector("8:I:1,12:I:2", TRACE_FIELDS, false).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].offset, 12);
    }

    #[test]
    fn unknown_name_is_wrong_field_name() {
        let err = parse_selector("NOT_A_FIELD:1", TRACE_FIELDS, true).unwrap_err();
        assert!(matches!(err, SegyError::WrongFieldName { .. }));
    }

    #[test]
    fn unregistered_offset_is_wrong_field_offset() {
        let err = parse_selector("9999:I:1", TRACE_FIELDS, false).unwrap_err();
        assert!(matches!(err, SegyError::WrongFieldOffset { .. }));
    }

    #[test]
    fn malformed_numeric_token_is_selector_syntax_error() {
        let err = parse_selector("not-an-offset", TRACE_FIELDS, false).unwrap_err();
        assert!(matches!(err, SegyError::SelectorSyntax { .. }));
    }
}
