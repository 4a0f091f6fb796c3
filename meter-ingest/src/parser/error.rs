/// Fatal conditions that abort a meter import.
///
/// An unresolvable property id is not one of them: those records are skipped and
/// reported through the unlinkable id list instead.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("unknown energy type '{type_name}'")]
    UnknownEnergyType { type_name: String },
    #[error("no conversion factor for energy type '{type_name}' in unit '{unit}'")]
    MissingConversionFactor { type_name: String, unit: String },
    #[error("malformed energy type column '{column}'")]
    MalformedColumn { column: String },
    #[error("record {index}: reading in column '{column}' is not numeric: {value}")]
    NonNumericReading {
        index: usize,
        column: String,
        value: String,
    },
    #[error("record {index}: invalid month '{value}', expected Mon-YY")]
    InvalidMonth { index: usize, value: String },
    #[error("record {index}: missing field '{field}'")]
    MissingField { index: usize, field: &'static str },
    #[error("record {index}: invalid interval: {reason}")]
    InvalidInterval { index: usize, reason: String },
    #[error("store error: {0}")]
    Store(String),
}
