use anyhow::{bail, Context, Result};
use meter_client::domain::{MeterSource, PropertyId};
use meter_ingest::{
    config::AppConfig,
    observability,
    sources::load_raw_records,
    store::PgMeterStore,
    MetersParser,
};
use sqlx::postgres::PgPoolOptions;
use std::env;

/// Dry-run a meter usage import and print the drafts and summaries as JSON.
///
/// Nothing is written to the database.
///
/// Usage:
///   meter-ingest <records.json> <org_id> [pm|greenbutton|buildingsync] [property_id]
#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: meter-ingest <records.json> <org_id> [pm|greenbutton|buildingsync] [property_id]");
    }
    let records_path = &args[1];
    let org_id: i64 = args[2].parse().context("org_id must be an integer")?;
    let source: MeterSource = match args.get(3) {
        Some(s) => s.parse()?,
        None => MeterSource::PortfolioManager,
    };
    let property_id = args
        .get(4)
        .map(|s| s.parse::<i64>().map(PropertyId))
        .transpose()
        .context("property_id must be an integer")?;

    // Load configuration (METER_INGEST_CONFIG can point to another file).
    let cfg = AppConfig::load()?;
    let tz = cfg.parser.timezone()?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    let records = load_raw_records(records_path).await?;
    tracing::info!(records = records.len(), org_id, source = source.display_name(), "loaded raw records");

    let mut parser = MetersParser::new(PgMeterStore::new(pool), org_id, records, tz).with_source(source);
    if let Some(property_id) = property_id {
        parser = parser.with_property_id(property_id);
    }

    let validated_type_units = parser.validated_type_units().await?;
    let drafts = parser.parse().await?.to_vec();
    let proposed_imports = parser.proposed_imports().await?;
    let unlinkable_pm_ids = parser.unlinkable_pm_ids().await?;

    let report = serde_json::json!({
        "validated_type_units": validated_type_units,
        "proposed_imports": proposed_imports,
        "unlinkable_pm_ids": unlinkable_pm_ids,
        "meter_and_reading_drafts": drafts,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
