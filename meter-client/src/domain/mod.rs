pub mod draft;
pub mod meter;
pub mod organization;

pub use draft::{MeterDraft, ReadingDraft};
pub use meter::{MeterSource, MeterType, PropertyId};
pub use organization::ThermalConversionAssumption;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown meter source '{0}'")]
    UnknownMeterSource(String),
    #[error("unknown thermal conversion assumption code {0}")]
    UnknownThermalConversionAssumption(i16),
}
