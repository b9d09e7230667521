//! PostgreSQL warehouse over `project_cost_and_usage_daily`, `billing_export`
//! and `support_case_history`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, TransactionTrait,
};

use crate::error::TamResult;
use crate::models::{CostRow, SupportCase, TimeWindow, UsageSummary};
use crate::sources::{CostWarehouse, UsageLedger};

#[derive(Clone)]
pub struct PgCostWarehouse {
    db: DatabaseConnection,
}

impl PgCostWarehouse {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct CostRowRecord {
    service_name: String,
    cost: f64,
    usage_date: NaiveDate,
    usage_amount: f64,
}

impl From<CostRowRecord> for CostRow {
    fn from(r: CostRowRecord) -> Self {
        Self {
            service_name: r.service_name,
            cost: r.cost,
            usage_date: r.usage_date,
            usage_amount: r.usage_amount,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct UsageSummaryRecord {
    row_count: i64,
    project_count: i64,
    service_count: i64,
    total_cost: f64,
    total_usage_amount: f64,
}

#[async_trait]
impl CostWarehouse for PgCostWarehouse {
    async fn cost_rows(&self, project_id: &str, window: TimeWindow) -> TamResult<Vec<CostRow>> {
        let sql = r#"
            SELECT service_name, cost::float8 AS cost, usage_date, usage_amount
            FROM project_cost_and_usage_daily
            WHERE project_id = $1 AND usage_date BETWEEN $2 AND $3
            ORDER BY usage_date, service_name
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [project_id.into(), window.start().into(), window.end().into()],
        );

        let rows = CostRowRecord::find_by_statement(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl UsageLedger for PgCostWarehouse {
    async fn aggregate_daily_usage(&self, day: NaiveDate) -> TamResult<u64> {
        let sql = r#"
            INSERT INTO project_cost_and_usage_daily
                (project_id, usage_date, service_name, cost, usage_amount, aggregated_at)
            SELECT project_id, $1::date, service_description, SUM(cost), SUM(usage_amount), NOW()
            FROM billing_export
            WHERE usage_start_time >= $1::date
              AND usage_start_time < $1::date + INTERVAL '1 day'
            GROUP BY project_id, service_description
            ON CONFLICT (project_id, usage_date, service_name) DO UPDATE SET
                cost = EXCLUDED.cost,
                usage_amount = EXCLUDED.usage_amount,
                aggregated_at = EXCLUDED.aggregated_at
        "#;

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [day.into()]);
        let result = self.db.execute_raw(stmt).await?;
        Ok(result.rows_affected())
    }

    async fn record_support_snapshot(
        &self,
        customer_account_id: &str,
        day: NaiveDate,
        cases: &[SupportCase],
    ) -> TamResult<u64> {
        let sql = r#"
            INSERT INTO support_case_history
                (customer_account_id, case_id, title, priority, state, last_update, snapshot_date)
            VALUES ($1, $2, $3, $4, 'OPEN', $5, $6)
            ON CONFLICT (case_id, snapshot_date) DO UPDATE SET
                title = EXCLUDED.title,
                priority = EXCLUDED.priority,
                last_update = EXCLUDED.last_update,
                recorded_at = NOW()
        "#;

        let txn = self.db.begin().await?;
        let mut written = 0;
        for case in cases {
            let stmt = Statement::from_sql_and_values(
                DbBackend::Postgres,
                sql,
                [
                    customer_account_id.into(),
                    case.case_id.as_str().into(),
                    case.title.as_str().into(),
                    case.priority.as_str().into(),
                    case.last_update.clone().into(),
                    day.into(),
                ],
            );
            written += txn.execute_raw(stmt).await?.rows_affected();
        }
        txn.commit().await?;

        Ok(written)
    }

    async fn usage_summary(&self, day: NaiveDate) -> TamResult<UsageSummary> {
        let sql = r#"
            SELECT COUNT(*)::int8 AS row_count,
                   COUNT(DISTINCT project_id)::int8 AS project_count,
                   COUNT(DISTINCT service_name)::int8 AS service_count,
                   COALESCE(SUM(cost), 0)::float8 AS total_cost,
                   COALESCE(SUM(usage_amount), 0)::float8 AS total_usage_amount
            FROM project_cost_and_usage_daily
            WHERE usage_date = $1
        "#;

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [day.into()]);
        let record = UsageSummaryRecord::find_by_statement(stmt).one(&self.db).await?;

        Ok(record
            .map(|r| UsageSummary {
                rows: r.row_count.max(0) as u64,
                projects: r.project_count.max(0) as u64,
                services: r.service_count.max(0) as u64,
                total_cost: r.total_cost,
                total_usage_amount: r.total_usage_amount,
            })
            .unwrap_or_default())
    }
}
