use super::DomainError;

/// Organization preference selecting which thermal conversion factors apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThermalConversionAssumption {
    #[default]
    Us,
    Can,
}

impl ThermalConversionAssumption {
    pub fn from_code(code: i16) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Self::Us),
            2 => Ok(Self::Can),
            other => Err(DomainError::UnknownThermalConversionAssumption(other)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Can => "CAN",
        }
    }
}
