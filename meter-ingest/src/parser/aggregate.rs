use std::collections::HashMap;

use meter_client::domain::{MeterDraft, MeterSource, MeterType, PropertyId, ReadingDraft};
use time::OffsetDateTime;

use super::{
    columns::{find_type_columns, resolve_column},
    record::number,
    ParseError, RawRecord,
};
use crate::conversion::ConversionTable;

const IDENTITY_DELIMITER: &str = "-";

/// Meter metadata shared by every type column of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedMeterDetails {
    pub source: MeterSource,
    pub source_id: String,
    pub property_id: Option<PropertyId>,
}

impl SharedMeterDetails {
    /// Composite identity of the meter this record feeds for `meter_type`.
    ///
    /// Fields are always joined in the order source, source_id, property_id,
    /// type; the property is left out when there is none.
    pub fn identity(&self, meter_type: MeterType) -> String {
        let mut parts = vec![self.source.code().to_string(), self.source_id.clone()];
        if let Some(property_id) = self.property_id {
            parts.push(property_id.to_string());
        }
        parts.push(meter_type.code().to_string());

        parts.join(IDENTITY_DELIMITER)
    }
}

/// Meter drafts keyed by composite identity, in first-seen order.
#[derive(Debug, Default)]
pub struct MeterAccumulator {
    meters: Vec<MeterDraft>,
    by_identity: HashMap<String, usize>,
}

impl MeterAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one reading per type column of `record`.
    ///
    /// Readings for a meter that was already seen are appended to it; otherwise
    /// a new meter is started. Returns the number of readings added.
    pub fn add_record(
        &mut self,
        record: &RawRecord,
        index: usize,
        shared: &SharedMeterDetails,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
        table: &ConversionTable,
    ) -> Result<usize, ParseError> {
        let columns = find_type_columns(record);

        for column in &columns {
            let resolved = resolve_column(column, table)?;

            let raw = &record[*column];
            let value = number(raw).ok_or_else(|| ParseError::NonNumericReading {
                index,
                column: column.to_string(),
                value: raw.to_string(),
            })?;

            let reading = ReadingDraft {
                start_time,
                end_time,
                reading: value * resolved.factor,
                source_unit: resolved.unit.to_string(),
                conversion_factor: resolved.factor,
            };

            self.push(shared, resolved.meter_type, reading);
        }

        Ok(columns.len())
    }

    fn push(&mut self, shared: &SharedMeterDetails, meter_type: MeterType, reading: ReadingDraft) {
        let identity = shared.identity(meter_type);

        match self.by_identity.get(&identity) {
            Some(&idx) => self.meters[idx].readings.push(reading),
            None => {
                self.by_identity.insert(identity, self.meters.len());
                self.meters.push(MeterDraft {
                    source: shared.source,
                    source_id: shared.source_id.clone(),
                    property_id: shared.property_id,
                    meter_type,
                    readings: vec![reading],
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.meters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }

    pub fn into_meters(self) -> Vec<MeterDraft> {
        self.meters
    }
}
