use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // One row per project, day and service; re-aggregating a day overwrites it.
        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS project_cost_and_usage_daily (
                project_id TEXT NOT NULL,
                usage_date DATE NOT NULL,
                service_name TEXT NOT NULL,
                cost NUMERIC(18, 6) NOT NULL DEFAULT 0 CHECK (cost >= 0),
                usage_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
                aggregated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (project_id, usage_date, service_name)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_cost_usage_daily_date ON project_cost_and_usage_daily (usage_date)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS project_cost_and_usage_daily")
            .await?;
        Ok(())
    }
}
