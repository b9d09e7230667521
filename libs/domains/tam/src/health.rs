use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::aggregation::{daily_totals, trend_percent};
use crate::error::TamResult;
use crate::models::{HealthStatus, HealthSummary, PlatformHealthResponse, TimeWindow};
use crate::signal::Signal;
use crate::sources::{CostWarehouse, FindingsSource, MetricsSource, RecommendationSource};

/// More samples than this is a warning.
pub const WARNING_SAMPLE_THRESHOLD: u64 = 10;
/// More samples than this is critical.
pub const CRITICAL_SAMPLE_THRESHOLD: u64 = 20;

pub fn status_for_samples(over_threshold_samples: u64) -> HealthStatus {
    if over_threshold_samples > CRITICAL_SAMPLE_THRESHOLD {
        HealthStatus::Critical
    } else if over_threshold_samples > WARNING_SAMPLE_THRESHOLD {
        HealthStatus::Warning
    } else {
        HealthStatus::Ok
    }
}

/// Combines performance, cost, security and optimization signals into one verdict.
pub struct HealthEvaluator {
    metrics: Arc<dyn MetricsSource>,
    warehouse: Arc<dyn CostWarehouse>,
    findings: Arc<dyn FindingsSource>,
    recommendations: Arc<dyn RecommendationSource>,
}

impl HealthEvaluator {
    pub fn new(
        metrics: Arc<dyn MetricsSource>,
        warehouse: Arc<dyn CostWarehouse>,
        findings: Arc<dyn FindingsSource>,
        recommendations: Arc<dyn RecommendationSource>,
    ) -> Self {
        Self {
            metrics,
            warehouse,
            findings,
            recommendations,
        }
    }

    pub async fn evaluate(&self, project_id: &str, time_period_days: u32) -> TamResult<PlatformHealthResponse> {
        self.evaluate_at(project_id, time_period_days, Utc::now()).await
    }

    /// Fails only when the window itself is invalid. Each unavailable
    /// signal contributes its neutral value.
    pub async fn evaluate_at(
        &self,
        project_id: &str,
        time_period_days: u32,
        now: DateTime<Utc>,
    ) -> TamResult<PlatformHealthResponse> {
        let window = TimeWindow::trailing_days(now.date_naive(), time_period_days.max(1))?;

        let performance = Signal::observe(
            "performance",
            self.metrics.over_threshold_samples(project_id, window).await,
        )
        .map(status_for_samples);

        let cost_trend = Signal::observe(
            "cost_trend",
            self.warehouse.cost_rows(project_id, window).await,
        )
        .map(|rows| trend_percent(&daily_totals(&rows)));

        let findings = Signal::observe(
            "critical_findings",
            self.findings.critical_findings_since(window.start_time()).await,
        );

        let recommendations = Signal::observe(
            "recommendations",
            self.recommendations.recommendations(project_id).await,
        )
        .map(|descriptions| descriptions.len() as u64);

        let health_summary = HealthSummary {
            performance_status: performance.unwrap_or_neutral(),
            cost_trend_percent: cost_trend.unwrap_or(0.0),
            new_critical_findings: findings.unwrap_or_neutral(),
            optimization_recommendations: recommendations.unwrap_or_neutral(),
        };

        info!(
            project_id,
            time_period_days,
            status = %health_summary.performance_status,
            cost_trend_percent = health_summary.cost_trend_percent,
            "Evaluated platform health"
        );

        Ok(PlatformHealthResponse {
            project_id: project_id.to_string(),
            health_summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TamError;
    use crate::models::CostRow;
    use crate::sources::{
        MockCostWarehouse, MockFindingsSource, MockMetricsSource, MockRecommendationSource,
    };
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 10, 12, 0, 0).unwrap()
    }

    fn unavailable_evaluator() -> HealthEvaluator {
        let mut metrics = MockMetricsSource::new();
        metrics
            .expect_over_threshold_samples()
            .times(1)
            .returning(|_, _| Err(TamError::upstream("cloud_monitoring", "403")));

        let mut warehouse = MockCostWarehouse::new();
        warehouse
            .expect_cost_rows()
            .times(1)
            .returning(|_, _| Err(TamError::Internal("connection reset".into())));

        let mut findings = MockFindingsSource::new();
        findings
            .expect_critical_findings_since()
            .times(1)
            .returning(|_| Err(TamError::upstream("security_command_center", "timeout")));

        let mut recommendations = MockRecommendationSource::new();
        recommendations
            .expect_recommendations()
            .times(1)
            .returning(|_| Err(TamError::upstream("recommender", "500")));

        HealthEvaluator::new(
            Arc::new(metrics),
            Arc::new(warehouse),
            Arc::new(findings),
            Arc::new(recommendations),
        )
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(status_for_samples(0), HealthStatus::Ok);
        assert_eq!(status_for_samples(10), HealthStatus::Ok);
        assert_eq!(status_for_samples(11), HealthStatus::Warning);
        assert_eq!(status_for_samples(20), HealthStatus::Warning);
        assert_eq!(status_for_samples(21), HealthStatus::Critical);
        assert_eq!(status_for_samples(500), HealthStatus::Critical);
    }

    #[tokio::test]
    async fn test_all_signals_unavailable_yields_neutral_verdict() {
        let evaluator = unavailable_evaluator();

        let response = evaluator.evaluate_at("acme-prod", 7, now()).await.unwrap();

        assert_eq!(response.project_id, "acme-prod");
        assert_eq!(response.health_summary, HealthSummary::default());
        assert_eq!(response.health_summary.performance_status, HealthStatus::Ok);
        assert_eq!(response.health_summary.cost_trend_percent, 0.0);
    }

    #[tokio::test]
    async fn test_signals_are_combined() {
        let mut metrics = MockMetricsSource::new();
        metrics
            .expect_over_threshold_samples()
            .withf(|project, window| {
                project == "acme-prod"
                    && window.start() == NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
                    && window.end() == NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()
            })
            .returning(|_, _| Ok(15));

        let mut warehouse = MockCostWarehouse::new();
        warehouse.expect_cost_rows().returning(|_, _| {
            let day = |d| NaiveDate::from_ymd_opt(2025, 7, d).unwrap();
            Ok(vec![
                CostRow { service_name: "Compute Engine".into(), cost: 60.0, usage_date: day(4), usage_amount: 1.0 },
                CostRow { service_name: "BigQuery".into(), cost: 40.0, usage_date: day(4), usage_amount: 1.0 },
                CostRow { service_name: "Compute Engine".into(), cost: 150.0, usage_date: day(10), usage_amount: 1.0 },
            ])
        });

        let mut findings = MockFindingsSource::new();
        findings
            .expect_critical_findings_since()
            .withf(|since| *since == Utc.with_ymd_and_hms(2025, 7, 4, 0, 0, 0).unwrap())
            .returning(|_| Ok(2));

        let mut recommendations = MockRecommendationSource::new();
        recommendations
            .expect_recommendations()
            .returning(|_| Ok(vec!["Resize vm-1".into(), "Resize vm-2".into(), "Resize vm-3".into()]));

        let evaluator = HealthEvaluator::new(
            Arc::new(metrics),
            Arc::new(warehouse),
            Arc::new(findings),
            Arc::new(recommendations),
        );

        let summary = evaluator.evaluate_at("acme-prod", 7, now()).await.unwrap().health_summary;
        assert_eq!(summary.performance_status, HealthStatus::Warning);
        assert_eq!(summary.cost_trend_percent, 50.0);
        assert_eq!(summary.new_critical_findings, 2);
        assert_eq!(summary.optimization_recommendations, 3);
    }

    #[tokio::test]
    async fn test_one_failing_signal_keeps_the_others() {
        let mut metrics = MockMetricsSource::new();
        metrics.expect_over_threshold_samples().returning(|_, _| Ok(25));

        let mut warehouse = MockCostWarehouse::new();
        warehouse.expect_cost_rows().returning(|_, _| Ok(vec![]));

        let mut findings = MockFindingsSource::new();
        findings
            .expect_critical_findings_since()
            .returning(|_| Err(TamError::upstream("security_command_center", "denied")));

        let mut recommendations = MockRecommendationSource::new();
        recommendations.expect_recommendations().returning(|_| Ok(vec!["x".into()]));

        let evaluator = HealthEvaluator::new(
            Arc::new(metrics),
            Arc::new(warehouse),
            Arc::new(findings),
            Arc::new(recommendations),
        );

        let summary = evaluator.evaluate_at("acme-prod", 1, now()).await.unwrap().health_summary;
        assert_eq!(summary.performance_status, HealthStatus::Critical);
        assert_eq!(summary.new_critical_findings, 0);
        assert_eq!(summary.optimization_recommendations, 1);
    }
}
