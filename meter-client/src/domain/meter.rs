use std::{fmt, str::FromStr};

use super::DomainError;

/// Internal identity of a property, shared by its states across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PropertyId(pub i64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a meter's readings were imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MeterSource {
    PortfolioManager,
    GreenButton,
    BuildingSync,
}

impl MeterSource {
    pub fn code(self) -> i16 {
        match self {
            Self::PortfolioManager => 1,
            Self::GreenButton => 2,
            Self::BuildingSync => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::PortfolioManager => "Portfolio Manager",
            Self::GreenButton => "GreenButton",
            Self::BuildingSync => "BuildingSync",
        }
    }
}

impl FromStr for MeterSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pm" | "portfolio_manager" | "portfolio-manager" => Ok(Self::PortfolioManager),
            "greenbutton" | "green_button" | "gb" => Ok(Self::GreenButton),
            "buildingsync" | "building_sync" => Ok(Self::BuildingSync),
            _ => Err(DomainError::UnknownMeterSource(s.to_string())),
        }
    }
}

/// Energy type of a meter.
///
/// Names follow Portfolio Manager's list of valid property-level meter types;
/// `DistrictChilledWater` is the only one not copied verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MeterType {
    CoalAnthracite,
    CoalBituminous,
    Coke,
    Diesel,
    DistrictChilledWater,
    DistrictHotWater,
    DistrictSteam,
    Electricity,
    ElectricityOnSiteRenewable,
    FuelOilNo1,
    FuelOilNo2,
    FuelOilNo4,
    FuelOilNo5And6,
    Kerosene,
    NaturalGas,
    Other,
    Propane,
    Wood,
}

impl MeterType {
    pub const ALL: [MeterType; 18] = [
        Self::CoalAnthracite,
        Self::CoalBituminous,
        Self::Coke,
        Self::Diesel,
        Self::DistrictChilledWater,
        Self::DistrictHotWater,
        Self::DistrictSteam,
        Self::Electricity,
        Self::ElectricityOnSiteRenewable,
        Self::FuelOilNo1,
        Self::FuelOilNo2,
        Self::FuelOilNo4,
        Self::FuelOilNo5And6,
        Self::Kerosene,
        Self::NaturalGas,
        Self::Other,
        Self::Propane,
        Self::Wood,
    ];

    pub fn code(self) -> i16 {
        match self {
            Self::CoalAnthracite => 1,
            Self::CoalBituminous => 2,
            Self::Coke => 3,
            Self::Diesel => 4,
            Self::DistrictChilledWater => 5,
            Self::DistrictHotWater => 6,
            Self::DistrictSteam => 7,
            Self::Electricity => 8,
            Self::ElectricityOnSiteRenewable => 9,
            Self::FuelOilNo1 => 10,
            Self::FuelOilNo2 => 11,
            Self::FuelOilNo4 => 12,
            Self::FuelOilNo5And6 => 13,
            Self::Kerosene => 14,
            Self::NaturalGas => 15,
            Self::Other => 16,
            Self::Propane => 17,
            Self::Wood => 18,
        }
    }

    pub fn pm_name(self) -> &'static str {
        match self {
            Self::CoalAnthracite => "Coal (anthracite)",
            Self::CoalBituminous => "Coal (bituminous)",
            Self::Coke => "Coke",
            Self::Diesel => "Diesel",
            Self::DistrictChilledWater => "District Chilled Water",
            Self::DistrictHotWater => "District Hot Water",
            Self::DistrictSteam => "District Steam",
            Self::Electricity => "Electricity",
            Self::ElectricityOnSiteRenewable => "Electricity - on site renewable",
            Self::FuelOilNo1 => "Fuel Oil (No. 1)",
            Self::FuelOilNo2 => "Fuel Oil (No. 2)",
            Self::FuelOilNo4 => "Fuel Oil (No. 4)",
            Self::FuelOilNo5And6 => "Fuel Oil (No. 5 & No. 6)",
            Self::Kerosene => "Kerosene",
            Self::NaturalGas => "Natural Gas",
            Self::Other => "Other",
            Self::Propane => "Propane and Liquid Propane",
            Self::Wood => "Wood",
        }
    }

    /// Exact, case-sensitive lookup by Portfolio Manager display name.
    pub fn from_pm_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.pm_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_type_codes_are_one_based_and_unique() {
        let codes: Vec<i16> = MeterType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(codes, (1..=18).collect::<Vec<i16>>());
    }

    #[test]
    fn meter_type_lookup_by_pm_name() {
        assert_eq!(MeterType::from_pm_name("Electricity"), Some(MeterType::Electricity));
        assert_eq!(
            MeterType::from_pm_name("Fuel Oil (No. 5 & No. 6)"),
            Some(MeterType::FuelOilNo5And6)
        );
        assert_eq!(MeterType::from_pm_name("electricity"), None);
        assert_eq!(MeterType::from_pm_name("Solar"), None);
    }

    #[test]
    fn meter_source_parses_cli_tokens() {
        assert_eq!("pm".parse::<MeterSource>(), Ok(MeterSource::PortfolioManager));
        assert_eq!("GreenButton".parse::<MeterSource>(), Ok(MeterSource::GreenButton));
        assert!(matches!(
            "espm".parse::<MeterSource>(),
            Err(DomainError::UnknownMeterSource(_))
        ));
    }
}
