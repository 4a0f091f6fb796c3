use serde::Serialize;

/// How a type column header was understood, for confirmation before import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeUnitInfo {
    pub parsed_type: String,
    pub parsed_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_header: Option<String>,
}

/// Number of readings an import would create for one external id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposedImport {
    pub source_id: String,
    pub incoming: usize,
}

/// A Portfolio Manager id with no matching property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlinkablePmId {
    pub portfolio_manager_id: String,
}

/// The `UsagePoint` id inside a GreenButton source id,
/// e.g. `12345` in `/v1/User/1/UsagePoint/12345/MeterReading/1`.
pub fn usage_point_id(raw_source_id: &str) -> Option<&str> {
    let mut segments = raw_source_id.split('/');
    segments.find(|s| *s == "UsagePoint")?;
    segments.next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_usage_point_segment() {
        assert_eq!(
            usage_point_id("/v1/User/000/UsagePoint/12345/MeterReading/1"),
            Some("12345")
        );
        assert_eq!(usage_point_id(".../UsagePoint/12345/MeterReading/1"), Some("12345"));
    }

    #[test]
    fn missing_usage_point_yields_none() {
        assert_eq!(usage_point_id("/v1/User/000/MeterReading/1"), None);
        assert_eq!(usage_point_id("/v1/UsagePoint"), None);
    }

    #[test]
    fn pm_only_fields_are_omitted() {
        let info = TypeUnitInfo {
            parsed_type: "Electricity".to_string(),
            parsed_unit: "kWh".to_string(),
            column_header: None,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({ "parsed_type": "Electricity", "parsed_unit": "kWh" }));
    }
}
