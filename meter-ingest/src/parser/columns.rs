use meter_client::domain::MeterType;

use super::{ParseError, RawRecord};
use crate::conversion::ConversionTable;

/// Marker identifying energy type columns, e.g. `Electricity Use  (kWh (thousand Watt-hours))`.
///
/// The two spaces are part of the export format and must not be normalized.
pub const TYPE_COLUMN_MARKER: &str = " Use  (";

const USE_TOKEN: &str = " Use";

/// Energy type column headers of a record, in column order.
pub fn find_type_columns(record: &RawRecord) -> Vec<&str> {
    record
        .keys()
        .filter(|k| k.contains(TYPE_COLUMN_MARKER))
        .map(String::as_str)
        .collect()
}

/// Split a type column header into its energy type name and unit label.
///
/// The type name is everything before the first ` Use`; the unit is what sits
/// between the first `(` after it and the header's final character.
pub fn split_type_unit(column: &str) -> Result<(&str, &str), ParseError> {
    let malformed = || ParseError::MalformedColumn {
        column: column.to_string(),
    };

    let use_position = column.find(USE_TOKEN).ok_or_else(malformed)?;
    let type_name = &column[..use_position];

    let unit_start = column[use_position..]
        .find('(')
        .map(|offset| use_position + offset + 1)
        .ok_or_else(malformed)?;
    let unit_end = column
        .char_indices()
        .last()
        .map(|(idx, _)| idx)
        .ok_or_else(malformed)?;

    if unit_end < unit_start {
        return Err(malformed());
    }

    Ok((type_name, &column[unit_start..unit_end]))
}

/// A type column resolved against the organization's conversion table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn<'a> {
    pub type_name: &'a str,
    pub unit: &'a str,
    pub meter_type: MeterType,
    pub factor: f64,
}

pub fn resolve_column<'a>(
    column: &'a str,
    table: &ConversionTable,
) -> Result<ResolvedColumn<'a>, ParseError> {
    let (type_name, unit) = split_type_unit(column)?;

    let meter_type = MeterType::from_pm_name(type_name).ok_or_else(|| ParseError::UnknownEnergyType {
        type_name: type_name.to_string(),
    })?;
    let factor = table.factor(type_name, unit)?;

    Ok(ResolvedColumn {
        type_name,
        unit,
        meter_type,
        factor,
    })
}
