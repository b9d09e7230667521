use chrono::{DateTime, Days, Utc};
use observability::ReportingMetrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::error::{TamError, TamResult};
use crate::models::AggregationResponse;
use crate::sources::{SupportCaseSource, UsageLedger};

/// Nightly rollup of the billing export and support case snapshot.
pub struct DailyAggregator {
    ledger: Arc<dyn UsageLedger>,
    support: Arc<dyn SupportCaseSource>,
    customer_account_id: Option<String>,
}

impl DailyAggregator {
    pub fn new(
        ledger: Arc<dyn UsageLedger>,
        support: Arc<dyn SupportCaseSource>,
        customer_account_id: Option<String>,
    ) -> Self {
        Self {
            ledger,
            support,
            customer_account_id,
        }
    }

    pub async fn run(&self) -> TamResult<AggregationResponse> {
        self.run_at(Utc::now()).await
    }

    /// Aggregates the day before `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> TamResult<AggregationResponse> {
        let started = Instant::now();
        let result = self.aggregate(now).await;

        match &result {
            Ok(response) => ReportingMetrics::record_aggregation(
                true,
                response.rows_aggregated,
                started.elapsed(),
            ),
            Err(e) => {
                error!(error = %e, "Daily aggregation failed");
                ReportingMetrics::record_aggregation(false, 0, started.elapsed());
            }
        }
        result
    }

    async fn aggregate(&self, now: DateTime<Utc>) -> TamResult<AggregationResponse> {
        let usage_date = now
            .date_naive()
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| TamError::Internal(format!("no day before {}", now)))?;

        let rows_aggregated = self.ledger.aggregate_daily_usage(usage_date).await?;
        info!(%usage_date, rows_aggregated, "Aggregated billing export");

        let support_snapshot_rows = match &self.customer_account_id {
            Some(account) => {
                let cases = self.support.open_cases(account).await?;
                let written = self
                    .ledger
                    .record_support_snapshot(account, usage_date, &cases)
                    .await?;
                info!(customer_account_id = %account, cases = cases.len(), "Recorded support case snapshot");
                written
            }
            None => {
                info!("TAM_CUSTOMER_ACCOUNT_ID not set, skipping support case snapshot");
                0
            }
        };

        let summary = self.ledger.usage_summary(usage_date).await?;
        info!(
            %usage_date,
            rows = summary.rows,
            projects = summary.projects,
            services = summary.services,
            total_cost = summary.total_cost,
            total_usage_amount = summary.total_usage_amount,
            "Daily usage summary"
        );

        Ok(AggregationResponse {
            status: "success".to_string(),
            timestamp: now,
            usage_date,
            rows_aggregated,
            support_snapshot_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SupportCase, UsageSummary};
    use crate::sources::{MockSupportCaseSource, MockUsageLedger};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 2, 0, 0).unwrap()
    }

    fn yesterday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[tokio::test]
    async fn test_aggregates_yesterday_without_account() {
        let mut ledger = MockUsageLedger::new();
        ledger
            .expect_aggregate_daily_usage()
            .withf(|day| *day == yesterday())
            .times(1)
            .returning(|_| Ok(42));
        ledger.expect_record_support_snapshot().never();
        ledger
            .expect_usage_summary()
            .returning(|_| Ok(UsageSummary::default()));

        let mut support = MockSupportCaseSource::new();
        support.expect_open_cases().never();

        let aggregator = DailyAggregator::new(Arc::new(ledger), Arc::new(support), None);
        let response = aggregator.run_at(now()).await.unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.usage_date, yesterday());
        assert_eq!(response.rows_aggregated, 42);
        assert_eq!(response.support_snapshot_rows, 0);
        assert_eq!(response.timestamp, now());
    }

    #[tokio::test]
    async fn test_snapshots_cases_for_configured_account() {
        let mut ledger = MockUsageLedger::new();
        ledger.expect_aggregate_daily_usage().returning(|_| Ok(3));
        ledger
            .expect_record_support_snapshot()
            .withf(|account, day, cases| account == "organizations/42" && *day == yesterday() && cases.len() == 2)
            .times(1)
            .returning(|_, _, cases| Ok(cases.len() as u64));
        ledger
            .expect_usage_summary()
            .returning(|_| Ok(UsageSummary::default()));

        let mut support = MockSupportCaseSource::new();
        support.expect_open_cases().returning(|_| {
            Ok(vec![
                SupportCase { case_id: "1".into(), title: "a".into(), priority: "P1".into(), last_update: None },
                SupportCase { case_id: "2".into(), title: "b".into(), priority: "P2".into(), last_update: None },
            ])
        });

        let aggregator = DailyAggregator::new(
            Arc::new(ledger),
            Arc::new(support),
            Some("organizations/42".into()),
        );
        let response = aggregator.run_at(now()).await.unwrap();
        assert_eq!(response.support_snapshot_rows, 2);
    }

    #[tokio::test]
    async fn test_ledger_failure_fails_the_run() {
        let mut ledger = MockUsageLedger::new();
        ledger
            .expect_aggregate_daily_usage()
            .returning(|_| Err(TamError::Database(sea_orm::DbErr::Custom("relation missing".into()))));
        ledger.expect_usage_summary().never();

        let aggregator = DailyAggregator::new(
            Arc::new(ledger),
            Arc::new(MockSupportCaseSource::new()),
            None,
        );
        assert!(aggregator.run_at(now()).await.is_err());
    }
}
