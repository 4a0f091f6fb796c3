pub mod organization_queries;
pub mod property_queries;
