use serde_json::Value;

use super::ParseError;

/// One already-extracted input row, keyed by column header.
///
/// Key order is the column order of the source file.
pub type RawRecord = serde_json::Map<String, Value>;

pub(crate) fn field<'a>(
    record: &'a RawRecord,
    index: usize,
    name: &'static str,
) -> Result<&'a Value, ParseError> {
    match record.get(name) {
        Some(Value::Null) | None => Err(ParseError::MissingField { index, field: name }),
        Some(v) => Ok(v),
    }
}

/// String form of an identifier cell; numeric ids are written without quotes.
pub(crate) fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric value of a cell: JSON numbers, or strings that parse as a float.
pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
