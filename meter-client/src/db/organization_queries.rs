use anyhow::{anyhow, Result};
use sqlx::PgPool;

use crate::domain::ThermalConversionAssumption;

/// Load the thermal conversion assumption an organization has selected.
pub async fn thermal_conversion_assumption(
    pool: &PgPool,
    org_id: i64,
) -> Result<ThermalConversionAssumption> {
    let code = sqlx::query_scalar::<_, i16>(
        r#"
        SELECT thermal_conversion_assumption
        FROM organizations
        WHERE id = $1
        "#,
    )
    .bind(org_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| anyhow!("organization {org_id} not found"))?;

    Ok(ThermalConversionAssumption::from_code(code)?)
}
