use chrono::{NaiveDate, Utc};
use observability::ReportingMetrics;
use std::sync::Arc;
use tracing::info;

use crate::aggregation::{round2, top_services, total_cost, trend_percent, usage_highlights};
use crate::error::TamResult;
use crate::models::{CostRow, QuarterlyReport};
use crate::quarter::Quarter;
use crate::signal::Signal;
use crate::sources::CostWarehouse;

pub const TOP_SERVICES: usize = 5;
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Curated talking points, most impactful first.
pub const CURATED_RECOMMENDATIONS: [&str; 5] = [
    "Consider migrating batch workloads to Spot VMs for 60-90% cost savings",
    "Enable committed use discounts for predictable workloads",
    "Review and right-size underutilized compute instances",
    "Implement lifecycle policies for Cloud Storage to optimize costs",
    "Enable Cloud Armor DDoS protection for public-facing services",
];

/// Builds quarterly business review data from the warehouse.
pub struct QbrGenerator {
    warehouse: Arc<dyn CostWarehouse>,
}

impl QbrGenerator {
    pub fn new(warehouse: Arc<dyn CostWarehouse>) -> Self {
        Self { warehouse }
    }

    /// Fails only for an invalid quarter label.
    pub async fn generate(&self, project_id: &str, quarter: Option<&str>) -> TamResult<QuarterlyReport> {
        self.generate_on(project_id, quarter, Utc::now().date_naive()).await
    }

    pub async fn generate_on(
        &self,
        project_id: &str,
        quarter: Option<&str>,
        today: NaiveDate,
    ) -> TamResult<QuarterlyReport> {
        let quarter = Quarter::resolve(quarter, today)?;
        Ok(self.build(project_id, quarter).await)
    }

    async fn build(&self, project_id: &str, quarter: Quarter) -> QuarterlyReport {
        let rows = self.fetch(project_id, Some(quarter)).await;
        let previous_rows = self.fetch(project_id, quarter.previous().ok()).await;

        let total = total_cost(&rows);
        let previous_total = total_cost(&previous_rows);

        let report = QuarterlyReport {
            project_id: project_id.to_string(),
            quarter_label: quarter.label(),
            total_cost: round2(total),
            cost_trend_percent: trend_percent(&[previous_total, total]),
            top_services: top_services(&rows, TOP_SERVICES),
            recommendations: CURATED_RECOMMENDATIONS
                .iter()
                .take(MAX_RECOMMENDATIONS)
                .map(|r| r.to_string())
                .collect(),
            usage_highlights: usage_highlights(&rows),
        };

        ReportingMetrics::record_report_generated(&report.quarter_label);
        info!(
            project_id,
            quarter = %report.quarter_label,
            total_cost = report.total_cost,
            services = report.top_services.len(),
            "Generated QBR data"
        );
        report
    }

    async fn fetch(&self, project_id: &str, quarter: Option<Quarter>) -> Vec<CostRow> {
        let Some(quarter) = quarter else {
            return Vec::new();
        };
        Signal::observe(
            "quarter_costs",
            self.warehouse.cost_rows(project_id, quarter.window()).await,
        )
        .unwrap_or_neutral()
    }
}
