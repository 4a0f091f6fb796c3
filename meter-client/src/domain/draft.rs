use time::OffsetDateTime;

use super::{MeterSource, MeterType, PropertyId};

/// A reading that has not been persisted yet.
///
/// `reading` is already converted; `source_unit` and `conversion_factor` are
/// kept so the raw magnitude can be recovered as `reading / conversion_factor`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReadingDraft {
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub start_time: OffsetDateTime,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub end_time: OffsetDateTime,
    pub reading: f64,
    pub source_unit: String,
    pub conversion_factor: f64,
}

impl ReadingDraft {
    pub fn source_reading(&self) -> f64 {
        self.reading / self.conversion_factor
    }
}

/// A meter and the readings collected for it during one import.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MeterDraft {
    pub source: MeterSource,
    pub source_id: String,
    pub property_id: Option<PropertyId>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub meter_type: MeterType,
    pub readings: Vec<ReadingDraft>,
}
