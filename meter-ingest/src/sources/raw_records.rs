use std::path::Path;

use serde_json::Value;
use tokio::fs;

use crate::parser::RawRecord;

/// Load already-extracted rows from a JSON array or NDJSON file.
pub async fn load_raw_records<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read records file {}: {e}", path.display()))?;

    parse_raw_records(&contents)
}

pub fn parse_raw_records(contents: &str) -> anyhow::Result<Vec<RawRecord>> {
    if contents.trim_start().starts_with('[') {
        let rows: Vec<RawRecord> = serde_json::from_str(contents)
            .map_err(|e| anyhow::anyhow!("failed to parse records array: {e}"))?;
        return Ok(rows);
    }

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(row)) => Ok(row),
            Ok(other) => anyhow::bail!("line {}: expected a JSON object, got {other}", n + 1),
            Err(e) => anyhow::bail!("line {}: failed to parse record: {e}", n + 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_array_keeping_column_order() {
        let rows = parse_raw_records(
            r#"[{"Property Id": 1, "Month": "Jan-16", "Natural Gas Use  (GJ)": 1, "Electricity Use  (kWh)": 2}]"#,
        )
        .unwrap();

        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["Property Id", "Month", "Natural Gas Use  (GJ)", "Electricity Use  (kWh)"]
        );
    }

    #[test]
    fn parses_ndjson_and_skips_blank_lines() {
        let rows = parse_raw_records(
            "{\"start_time\": 0, \"duration\": 60, \"source_id\": \"a\"}\n\n{\"start_time\": 60, \"duration\": 60, \"source_id\": \"a\"}\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn rejects_non_object_lines() {
        let err = parse_raw_records("{\"a\": 1}\n[1, 2]\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
