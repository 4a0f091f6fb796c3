use anyhow::Result;
use sqlx::PgPool;

use crate::domain::PropertyId;

/// Find the property behind the first property state carrying this
/// Portfolio Manager id within an organization.
///
/// Several states (one per cycle) usually match, but they all hang off the same
/// property, so the lowest state id is taken.
pub async fn first_property_id_for_pm_id(
    pool: &PgPool,
    org_id: i64,
    pm_property_id: &str,
) -> Result<Option<PropertyId>> {
    let row = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT
            pv.property_id
        FROM property_states ps
        JOIN property_views pv ON pv.state_id = ps.id
        WHERE ps.pm_property_id = $1
          AND ps.organization_id = $2
        ORDER BY ps.id, pv.id
        LIMIT 1
        "#,
    )
    .bind(pm_property_id)
    .bind(org_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(PropertyId))
}
