use sea_orm_migration::prelude::*;

/// Raw billing export rows, one per project/service/usage interval.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS billing_export (
                id BIGSERIAL PRIMARY KEY,
                project_id TEXT NOT NULL,
                service_description TEXT NOT NULL,
                cost NUMERIC(18, 6) NOT NULL DEFAULT 0 CHECK (cost >= 0),
                usage_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                usage_start_time TIMESTAMPTZ NOT NULL,
                exported_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_billing_export_usage_start ON billing_export (usage_start_time)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS billing_export")
            .await?;
        Ok(())
    }
}
