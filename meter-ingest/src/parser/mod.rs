//! Meter usage import parsing.
//!
//! Raw rows come in one of two layouts:
//!
//! ```text
//! { "Property Id": <pm id>, "Month": "Jan-16", "<type> Use  (<unit>)": <reading>, ... }
//! { "start_time": <epoch s>, "source_id": <id>, "duration": <s>, "<type> Use  (<unit>)": <reading>, ... }
//! ```
//!
//! Each type column becomes one reading, converted to kBtu, and readings are
//! collected under a meter identified by source, source id, property and type.

pub mod aggregate;
pub mod columns;
pub mod error;
pub mod property;
pub mod record;
pub mod shape;
pub mod summary;

use std::{collections::HashMap, sync::Arc};

use meter_client::domain::{MeterDraft, MeterSource, PropertyId};

pub use aggregate::{MeterAccumulator, SharedMeterDetails};
pub use error::ParseError;
pub use property::PropertyResolver;
pub use record::RawRecord;
pub use shape::Shape;
pub use summary::{usage_point_id, ProposedImport, TypeUnitInfo, UnlinkablePmId};

use crate::{
    conversion::{kbtu_thermal_conversion_factors, ConversionTable},
    store::{OrganizationStore, PropertyStore},
    timezone::ReadingTimezone,
};
use columns::{find_type_columns, resolve_column};
use record::{field, id_string};

pub const PM_PROPERTY_ID_FIELD: &str = "Property Id";
pub const SOURCE_ID_FIELD: &str = "source_id";

/// Turns one batch of raw usage rows into meter and reading drafts.
///
/// A parser is single use: results, the property cache and the conversion
/// table all live as long as the instance and are never recomputed.
pub struct MetersParser<S> {
    store: S,
    org_id: i64,
    records: Vec<RawRecord>,
    source: MeterSource,
    property_id: Option<PropertyId>,
    tz: ReadingTimezone,
    shape: Option<Shape>,
    conversion_table: Option<Arc<ConversionTable>>,
    resolver: PropertyResolver,
    parsed: Option<Vec<MeterDraft>>,
}

impl<S> MetersParser<S>
where
    S: PropertyStore + OrganizationStore,
{
    /// Portfolio Manager import whose properties are resolved through `store`.
    pub fn new(
        store: S,
        org_id: i64,
        records: Vec<RawRecord>,
        tz: impl Into<ReadingTimezone>,
    ) -> Self {
        let shape = Shape::detect(&records);

        Self {
            store,
            org_id,
            records,
            source: MeterSource::PortfolioManager,
            property_id: None,
            tz: tz.into(),
            shape,
            conversion_table: None,
            resolver: PropertyResolver::new(),
            parsed: None,
        }
    }

    pub fn with_source(mut self, source: MeterSource) -> Self {
        self.source = source;
        self
    }

    /// Attach every meter to this property instead of resolving ids.
    pub fn with_property_id(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    /// Use these factors instead of the organization's built-in table.
    pub fn with_conversion_table(mut self, table: ConversionTable) -> Self {
        self.conversion_table = Some(Arc::new(table));
        self
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn source(&self) -> MeterSource {
        self.source
    }

    /// Parse every record once; later calls return the same drafts.
    ///
    /// A failed parse stores nothing, so no partial drafts are ever exposed.
    pub async fn parse(&mut self) -> Result<&[MeterDraft], ParseError> {
        if self.parsed.is_none() {
            match self.parse_all().await {
                Ok(meters) => self.parsed = Some(meters),
                Err(e) => {
                    tracing::error!(org_id = self.org_id, error = %e, "meter usage parse failed");
                    metrics::counter!("meter_parser_failures_total").increment(1);
                    return Err(e);
                }
            }
        }

        Ok(self.parsed.as_deref().unwrap_or_default())
    }

    /// Drafts from a completed [`parse`](Self::parse), if any.
    pub fn meter_and_reading_drafts(&self) -> Option<&[MeterDraft]> {
        self.parsed.as_deref()
    }

    pub fn into_meter_and_reading_drafts(self) -> Option<Vec<MeterDraft>> {
        self.parsed
    }

    /// Portfolio Manager ids that matched no property. Parses first if needed.
    pub async fn unlinkable_pm_ids(&mut self) -> Result<Vec<UnlinkablePmId>, ParseError> {
        self.parse().await?;

        Ok(self
            .resolver
            .unlinkable()
            .iter()
            .map(|id| UnlinkablePmId {
                portfolio_manager_id: id.clone(),
            })
            .collect())
    }

    /// Type and unit of every type column in the first record, as understood
    /// by the parser. Portfolio Manager imports also echo the column header.
    pub async fn validated_type_units(&mut self) -> Result<Vec<TypeUnitInfo>, ParseError> {
        if self.records.is_empty() {
            return Ok(Vec::new());
        }

        let table = self.conversion_table().await?;
        let with_header = self.source == MeterSource::PortfolioManager;

        find_type_columns(&self.records[0])
            .into_iter()
            .map(|header| {
                let resolved = resolve_column(header, &table)?;
                Ok(TypeUnitInfo {
                    parsed_type: resolved.type_name.to_string(),
                    parsed_unit: resolved.unit.to_string(),
                    column_header: with_header.then(|| header.to_string()),
                })
            })
            .collect()
    }

    /// Readings that would be created, grouped by external id.
    ///
    /// GreenButton meters are grouped by their `UsagePoint` id.
    pub async fn proposed_imports(&mut self) -> Result<Vec<ProposedImport>, ParseError> {
        let meters = self.parse().await?;

        let mut imports: Vec<ProposedImport> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();

        for meter in meters {
            let raw = meter.source_id.as_str();
            let id = match meter.source {
                MeterSource::GreenButton => usage_point_id(raw).unwrap_or_else(|| {
                    tracing::warn!(source_id = raw, "no UsagePoint in GreenButton source id");
                    raw
                }),
                _ => raw,
            }
            .to_string();

            match by_id.get(&id) {
                Some(&idx) => imports[idx].incoming += meter.readings.len(),
                None => {
                    by_id.insert(id.clone(), imports.len());
                    imports.push(ProposedImport {
                        source_id: id,
                        incoming: meter.readings.len(),
                    });
                }
            }
        }

        Ok(imports)
    }

    async fn parse_all(&mut self) -> Result<Vec<MeterDraft>, ParseError> {
        let Some(shape) = self.shape else {
            return Ok(Vec::new());
        };

        let mut meters = MeterAccumulator::new();
        let mut readings = 0usize;

        for index in 0..self.records.len() {
            let Some(shared) = self.shared_details(index).await? else {
                continue;
            };

            let (start_time, end_time) = shape.interval(&self.records[index], index, self.tz)?;
            let table = self.conversion_table().await?;

            readings += meters.add_record(
                &self.records[index],
                index,
                &shared,
                start_time,
                end_time,
                &table,
            )?;
        }

        if meters.is_empty() {
            tracing::warn!(
                org_id = self.org_id,
                records = self.records.len(),
                "no meters parsed from a non-empty batch"
            );
        }

        metrics::counter!("meter_parser_readings_total").increment(readings as u64);
        tracing::info!(
            org_id = self.org_id,
            records = self.records.len(),
            meters = meters.len(),
            readings,
            unlinkable = self.resolver.unlinkable().len(),
            "parsed meter usage records"
        );

        Ok(meters.into_meters())
    }

    /// Source, source id and property for a record, or `None` when its
    /// Portfolio Manager id cannot be linked and the record must be skipped.
    async fn shared_details(&mut self, index: usize) -> Result<Option<SharedMeterDetails>, ParseError> {
        let record = &self.records[index];
        let source = self.source;
        let id_field = match source {
            MeterSource::PortfolioManager => PM_PROPERTY_ID_FIELD,
            MeterSource::GreenButton | MeterSource::BuildingSync => SOURCE_ID_FIELD,
        };
        let source_id = id_string(field(record, index, id_field)?);

        let property_id = match (self.property_id, source) {
            (Some(property_id), _) => Some(property_id),
            (None, MeterSource::PortfolioManager) => {
                match self.resolver.resolve(&self.store, self.org_id, &source_id).await? {
                    Some(property_id) => Some(property_id),
                    None => return Ok(None),
                }
            }
            (None, _) => None,
        };

        Ok(Some(SharedMeterDetails {
            source,
            source_id,
            property_id,
        }))
    }

    async fn conversion_table(&mut self) -> Result<Arc<ConversionTable>, ParseError> {
        if let Some(table) = &self.conversion_table {
            return Ok(Arc::clone(table));
        }

        let assumption = self
            .store
            .thermal_conversion_assumption(self.org_id)
            .await
            .map_err(|e| ParseError::Store(e.to_string()))?;
        tracing::debug!(
            org_id = self.org_id,
            assumption = assumption.label(),
            "loaded thermal conversion factors"
        );

        let table = Arc::new(kbtu_thermal_conversion_factors(assumption));
        self.conversion_table = Some(Arc::clone(&table));
        Ok(table)
    }
}
