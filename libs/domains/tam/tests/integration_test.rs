//! Integration tests for the PostgreSQL warehouse
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - Billing export rows roll up per project, day and service
//! - Re-aggregating a day overwrites instead of duplicating
//! - Support snapshots are idempotent per case and day
//! - Cost queries respect the window bounds

use domain_tam::models::TimeWindow;
use domain_tam::*;
use sea_orm::ConnectionTrait;
use test_utils::{TestDataBuilder, TestDatabase};

async fn insert_billing(db: &TestDatabase, project: &str, service: &str, cost: f64, usage: f64, at: &str) {
    db.connection
        .execute_unprepared(&format!(
            "INSERT INTO billing_export (project_id, service_description, cost, usage_amount, usage_start_time) \
             VALUES ('{project}', '{service}', {cost}, {usage}, '{at}')"
        ))
        .await
        .unwrap();
}

fn case(id: &str, priority: &str) -> SupportCase {
    SupportCase {
        case_id: id.to_string(),
        title: format!("Case {}", id),
        priority: priority.to_string(),
        last_update: None,
    }
}

// ============================================================================
// Daily aggregation
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_aggregate_daily_usage_groups_by_service() {
    let db = TestDatabase::new().await;
    let warehouse = PgCostWarehouse::new(db.connection());
    let builder = TestDataBuilder::from_test_name("aggregate_groups");
    let project = builder.project_id();
    let day = TestDataBuilder::date(2025, 8, 14);

    insert_billing(&db, &project, "Compute Engine", 10.5, 2.0, "2025-08-14T01:00:00Z").await;
    insert_billing(&db, &project, "Compute Engine", 4.5, 1.0, "2025-08-14T23:59:59Z").await;
    insert_billing(&db, &project, "BigQuery", 3.0, 7.0, "2025-08-14T12:00:00Z").await;
    // Outside the day
    insert_billing(&db, &project, "BigQuery", 99.0, 1.0, "2025-08-15T00:00:00Z").await;

    let written = warehouse.aggregate_daily_usage(day).await.unwrap();
    assert_eq!(written, 2);

    let window = TimeWindow::new(day, day).unwrap();
    let rows = warehouse.cost_rows(&project, window).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].service_name, "BigQuery");
    assert_eq!(rows[0].cost, 3.0);
    assert_eq!(rows[1].service_name, "Compute Engine");
    assert_eq!(rows[1].cost, 15.0);
    assert_eq!(rows[1].usage_amount, 3.0);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_reaggregation_overwrites_day() {
    let db = TestDatabase::new().await;
    let warehouse = PgCostWarehouse::new(db.connection());
    let builder = TestDataBuilder::from_test_name("reaggregate_overwrites");
    let project = builder.project_id();
    let day = TestDataBuilder::date(2025, 8, 20);

    insert_billing(&db, &project, "Cloud Storage", 1.0, 1.0, "2025-08-20T06:00:00Z").await;
    warehouse.aggregate_daily_usage(day).await.unwrap();

    // A late export line arrives
    insert_billing(&db, &project, "Cloud Storage", 2.0, 1.0, "2025-08-20T07:00:00Z").await;
    warehouse.aggregate_daily_usage(day).await.unwrap();

    let rows = warehouse
        .cost_rows(&project, TimeWindow::new(day, day).unwrap())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cost, 3.0);

    let summary = warehouse.usage_summary(day).await.unwrap();
    assert!(summary.rows >= 1);
    assert!(summary.total_cost >= 3.0);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_usage_summary_for_empty_day() {
    let db = TestDatabase::new().await;
    let warehouse = PgCostWarehouse::new(db.connection());

    let summary = warehouse
        .usage_summary(TestDataBuilder::date(1999, 1, 1))
        .await
        .unwrap();
    assert_eq!(summary.rows, 0);
    assert_eq!(summary.total_cost, 0.0);
}

// ============================================================================
// Cost queries
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_cost_rows_respect_window_bounds() {
    let db = TestDatabase::new().await;
    let warehouse = PgCostWarehouse::new(db.connection());
    let builder = TestDataBuilder::from_test_name("cost_rows_window");
    let project = builder.project_id();

    db.connection
        .execute_unprepared(&format!(
            "INSERT INTO project_cost_and_usage_daily (project_id, usage_date, service_name, cost, usage_amount) VALUES \
             ('{project}', '2025-06-30', 'Compute Engine', 1, 0), \
             ('{project}', '2025-07-01', 'Compute Engine', 2, 0), \
             ('{project}', '2025-09-30', 'Compute Engine', 3, 0), \
             ('{project}', '2025-10-01', 'Compute Engine', 4, 0), \
             ('other-project', '2025-08-01', 'Compute Engine', 5, 0)"
        ))
        .await
        .unwrap();

    let q3 = Quarter::parse("Q3-2025").unwrap();
    let rows = warehouse.cost_rows(&project, q3.window()).await.unwrap();

    let costs: Vec<f64> = rows.iter().map(|r| r.cost).collect();
    assert_eq!(costs, vec![2.0, 3.0]);
}

// ============================================================================
// Support snapshots
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_support_snapshot_is_idempotent_per_day() {
    let db = TestDatabase::new().await;
    let warehouse = PgCostWarehouse::new(db.connection());
    let builder = TestDataBuilder::from_test_name("support_snapshot");
    let account = builder.customer_account_id();
    let day = TestDataBuilder::date(2025, 8, 21);

    let cases = vec![case("snap-1", "P1"), case("snap-2", "P3")];
    assert_eq!(warehouse.record_support_snapshot(&account, day, &cases).await.unwrap(), 2);

    let escalated = vec![case("snap-2", "P1")];
    warehouse.record_support_snapshot(&account, day, &escalated).await.unwrap();

    let row = db
        .connection
        .query_one_raw(sea_orm::Statement::from_string(
            sea_orm::DbBackend::Postgres,
            "SELECT COUNT(*)::int8 AS n FROM support_case_history WHERE case_id IN ('snap-1', 'snap-2')",
        ))
        .await
        .unwrap()
        .unwrap();
    let count: i64 = row.try_get("", "n").unwrap();
    assert_eq!(count, 2);

    let row = db
        .connection
        .query_one_raw(sea_orm::Statement::from_string(
            sea_orm::DbBackend::Postgres,
            "SELECT priority FROM support_case_history WHERE case_id = 'snap-2'",
        ))
        .await
        .unwrap()
        .unwrap();
    let priority: String = row.try_get("", "priority").unwrap();
    assert_eq!(priority, "P1");
}
