pub use sea_orm_migration::prelude::*;

mod m20250901_000000_create_billing_export;
mod m20250901_000001_create_cost_and_usage_daily;
mod m20250901_000002_create_support_case_history;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000000_create_billing_export::Migration),
            Box::new(m20250901_000001_create_cost_and_usage_daily::Migration),
            Box::new(m20250901_000002_create_support_case_history::Migration),
        ]
    }
}
