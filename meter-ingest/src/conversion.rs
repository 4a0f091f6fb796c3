//! Thermal conversion factors into kBtu.
//!
//! Factors are keyed by Portfolio Manager energy type name, then by the unit
//! label exactly as it appears inside the column header parentheses.

use std::collections::HashMap;

use meter_client::domain::ThermalConversionAssumption;

use crate::parser::ParseError;

const KBTU: &str = "kBtu (thousand Btu)";
const MBTU: &str = "MBtu/MMBtu (million Btu)";
const GJ: &str = "GJ";
const THERMS: &str = "Therms (100,000 Btu)";
const KWH: &str = "kWh (thousand Watt-hours)";
const MWH: &str = "MWh (million Watt-hours)";
const CF: &str = "cf (cubic feet)";
const CCF: &str = "ccf (hundred cubic feet)";
const KCF: &str = "kcf (thousand cubic feet)";
const MCF: &str = "MCF (million cubic feet)";
const CM: &str = "cm (Cubic meters)";
const GALLONS_US: &str = "Gallons (US)";
const GALLONS_UK: &str = "Gallons (UK)";
const LITERS: &str = "Liters";
const POUNDS: &str = "Pounds";
const KLBS: &str = "KLbs. (thousand pounds)";
const MLBS: &str = "MLbs. (million pounds)";
const TONS: &str = "Tons";
const TONNES: &str = "Tonnes (metric)";
const TON_HOURS: &str = "Ton Hours";

const ENERGY_ONLY: &[(&str, f64)] = &[(KBTU, 1.0), (MBTU, 1000.0), (GJ, 947.817), (THERMS, 100.0)];

const US_FACTORS: &[(&str, &[(&str, f64)])] = &[
    (
        "Coal (anthracite)",
        &[(TONS, 25_090.0), (TONNES, 27_657.0), (POUNDS, 12.545), (KLBS, 12_545.0), (MLBS, 12_545_000.0)],
    ),
    (
        "Coal (bituminous)",
        &[(TONS, 24_930.0), (TONNES, 27_480.0), (POUNDS, 12.465), (KLBS, 12_465.0), (MLBS, 12_465_000.0)],
    ),
    (
        "Coke",
        &[(TONS, 24_800.0), (TONNES, 27_337.0), (POUNDS, 12.4), (KLBS, 12_400.0), (MLBS, 12_400_000.0)],
    ),
    ("Diesel", &[(GALLONS_US, 138.0), (GALLONS_UK, 165.73), (LITERS, 36.46)]),
    ("District Chilled Water", &[(TON_HOURS, 12.0)]),
    ("District Hot Water", &[]),
    (
        "District Steam",
        &[(POUNDS, 1.194), (KLBS, 1_194.0), (MLBS, 1_194_000.0)],
    ),
    ("Electricity", &[(KWH, 3.412), (MWH, 3_412.0)]),
    ("Electricity - on site renewable", &[(KWH, 3.412), (MWH, 3_412.0)]),
    ("Fuel Oil (No. 1)", &[(GALLONS_US, 139.0), (GALLONS_UK, 166.93), (LITERS, 36.72)]),
    ("Fuel Oil (No. 2)", &[(GALLONS_US, 138.0), (GALLONS_UK, 165.73), (LITERS, 36.46)]),
    ("Fuel Oil (No. 4)", &[(GALLONS_US, 146.0), (GALLONS_UK, 175.34), (LITERS, 38.57)]),
    ("Fuel Oil (No. 5 & No. 6)", &[(GALLONS_US, 150.0), (GALLONS_UK, 180.14), (LITERS, 39.63)]),
    ("Kerosene", &[(GALLONS_US, 135.0), (GALLONS_UK, 162.13), (LITERS, 35.66)]),
    (
        "Natural Gas",
        &[(CF, 1.026), (CCF, 102.6), (KCF, 1_026.0), (MCF, 1_026_000.0), (CM, 36.303)],
    ),
    ("Other", &[]),
    (
        "Propane and Liquid Propane",
        &[(GALLONS_US, 91.6), (GALLONS_UK, 110.0), (LITERS, 24.2), (CF, 2.516), (CCF, 251.6), (KCF, 2_516.0)],
    ),
    ("Wood", &[(TONS, 15_380.0), (TONNES, 16_954.0)]),
];

/// Canadian assumption overrides; everything else matches the US table.
const CAN_OVERRIDES: &[(&str, &[(&str, f64)])] = &[
    (
        "Natural Gas",
        &[(CF, 1.031), (CCF, 103.1), (KCF, 1_031.0), (MCF, 1_031_000.0), (CM, 36.42)],
    ),
    ("Diesel", &[(GALLONS_US, 138.3), (GALLONS_UK, 166.08), (LITERS, 36.54)]),
    ("Fuel Oil (No. 2)", &[(GALLONS_US, 138.3), (GALLONS_UK, 166.08), (LITERS, 36.54)]),
    ("Kerosene", &[(GALLONS_US, 135.5), (GALLONS_UK, 162.73), (LITERS, 35.8)]),
    ("Propane and Liquid Propane", &[(GALLONS_US, 90.8), (GALLONS_UK, 109.05), (LITERS, 23.99)]),
];

/// Energy type name -> unit label -> kBtu multiplier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionTable {
    factors: HashMap<String, HashMap<String, f64>>,
}

impl ConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>, unit: impl Into<String>, factor: f64) {
        self.factors
            .entry(type_name.into())
            .or_default()
            .insert(unit.into(), factor);
    }

    pub fn factor(&self, type_name: &str, unit: &str) -> Result<f64, ParseError> {
        self.factors
            .get(type_name)
            .and_then(|units| units.get(unit))
            .copied()
            .ok_or_else(|| ParseError::MissingConversionFactor {
                type_name: type_name.to_string(),
                unit: unit.to_string(),
            })
    }

    fn extend_from(&mut self, entries: &[(&str, &[(&str, f64)])]) {
        for (type_name, units) in entries {
            for (unit, factor) in ENERGY_ONLY.iter().chain(units.iter()) {
                self.insert(*type_name, *unit, *factor);
            }
        }
    }
}

impl<T, U> FromIterator<(T, U, f64)> for ConversionTable
where
    T: Into<String>,
    U: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, U, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (type_name, unit, factor) in iter {
            table.insert(type_name, unit, factor);
        }
        table
    }
}

/// Built-in kBtu factors for an organization's conversion assumption.
pub fn kbtu_thermal_conversion_factors(assumption: ThermalConversionAssumption) -> ConversionTable {
    let mut table = ConversionTable::new();
    table.extend_from(US_FACTORS);

    if assumption == ThermalConversionAssumption::Can {
        table.extend_from(CAN_OVERRIDES);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_client::domain::MeterType;

    #[test]
    fn us_electricity_kwh_factor() {
        let table = kbtu_thermal_conversion_factors(ThermalConversionAssumption::Us);
        assert_eq!(table.factor("Electricity", "kWh (thousand Watt-hours)").ok(), Some(3.412));
        assert_eq!(table.factor("Natural Gas", "cm (Cubic meters)").ok(), Some(36.303));
    }

    #[test]
    fn can_overrides_natural_gas_only_where_listed() {
        let table = kbtu_thermal_conversion_factors(ThermalConversionAssumption::Can);
        assert_eq!(table.factor("Natural Gas", "cm (Cubic meters)").ok(), Some(36.42));
        assert_eq!(table.factor("Electricity", "kWh (thousand Watt-hours)").ok(), Some(3.412));
        assert_eq!(table.factor("Natural Gas", "kBtu (thousand Btu)").ok(), Some(1.0));
    }

    #[test]
    fn every_meter_type_has_energy_units() {
        let table = kbtu_thermal_conversion_factors(ThermalConversionAssumption::Us);
        for meter_type in MeterType::ALL {
            assert_eq!(
                table.factor(meter_type.pm_name(), "kBtu (thousand Btu)").ok(),
                Some(1.0),
                "{meter_type:?}"
            );
        }
    }

    #[test]
    fn missing_unit_is_reported_with_type_and_unit() {
        let table = kbtu_thermal_conversion_factors(ThermalConversionAssumption::Us);
        match table.factor("Electricity", "Gallons (US)") {
            Err(ParseError::MissingConversionFactor { type_name, unit }) => {
                assert_eq!(type_name, "Electricity");
                assert_eq!(unit, "Gallons (US)");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn table_from_iterator() {
        let table: ConversionTable = [("Electricity", "kWh", 3.412)].into_iter().collect();
        assert_eq!(table.factor("Electricity", "kWh").ok(), Some(3.412));
        assert!(table.factor("Electricity", "MWh").is_err());
        assert!(table.factor("Wood", "kWh").is_err());
    }
}
