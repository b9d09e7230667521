use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            CREATE TABLE IF NOT EXISTS support_case_history (
                id BIGSERIAL PRIMARY KEY,
                customer_account_id TEXT NOT NULL,
                case_id TEXT NOT NULL,
                title TEXT NOT NULL,
                priority TEXT NOT NULL,
                state TEXT NOT NULL,
                last_update TEXT,
                snapshot_date DATE NOT NULL,
                recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                UNIQUE (case_id, snapshot_date)
            )
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS support_case_history")
            .await?;
        Ok(())
    }
}
