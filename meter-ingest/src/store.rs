use meter_client::{
    db::{organization_queries, property_queries},
    domain::{PropertyId, ThermalConversionAssumption},
};
use sqlx::PgPool;

/// Lookup of internal properties by external Portfolio Manager id.
#[async_trait::async_trait]
pub trait PropertyStore: Send + Sync {
    async fn first_property_id(
        &self,
        org_id: i64,
        pm_property_id: &str,
    ) -> anyhow::Result<Option<PropertyId>>;
}

/// Organization-level import preferences.
#[async_trait::async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn thermal_conversion_assumption(
        &self,
        org_id: i64,
    ) -> anyhow::Result<ThermalConversionAssumption>;
}

/// Both stores backed by Postgres.
#[derive(Clone)]
pub struct PgMeterStore {
    pool: PgPool,
}

impl PgMeterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PropertyStore for PgMeterStore {
    async fn first_property_id(
        &self,
        org_id: i64,
        pm_property_id: &str,
    ) -> anyhow::Result<Option<PropertyId>> {
        property_queries::first_property_id_for_pm_id(&self.pool, org_id, pm_property_id).await
    }
}

#[async_trait::async_trait]
impl OrganizationStore for PgMeterStore {
    async fn thermal_conversion_assumption(
        &self,
        org_id: i64,
    ) -> anyhow::Result<ThermalConversionAssumption> {
        organization_queries::thermal_conversion_assumption(&self.pool, org_id).await
    }
}
