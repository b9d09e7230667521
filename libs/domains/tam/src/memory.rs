//! In-memory collaborators with the PostgreSQL and Google API semantics,
//! available to tests and under the `testing` feature.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{TamError, TamResult};
use crate::models::{CostRow, SupportCase, TimeWindow, UsageRow, UsageSummary};
use crate::sources::{
    CostWarehouse, FindingsSource, MetricsSource, RecommendationSource, SupportCaseSource,
    UsageLedger,
};

/// A raw billing export line.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingLine {
    pub project_id: String,
    pub service_description: String,
    pub cost: f64,
    pub usage_amount: f64,
    pub usage_date: NaiveDate,
}

#[derive(Default)]
struct WarehouseState {
    daily: Vec<UsageRow>,
    billing: Vec<BillingLine>,
    snapshots: BTreeMap<(String, NaiveDate), SupportCase>,
}

/// Vector-backed warehouse with the same semantics as the PostgreSQL one.
#[derive(Clone, Default)]
pub struct InMemoryWarehouse {
    state: Arc<Mutex<WarehouseState>>,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<UsageRow>) -> Self {
        let warehouse = Self::new();
        for row in rows {
            warehouse.insert_daily(row);
        }
        warehouse
    }

    fn lock(&self) -> TamResult<MutexGuard<'_, WarehouseState>> {
        self.state
            .lock()
            .map_err(|_| TamError::Internal("warehouse lock poisoned".to_string()))
    }

    /// Inserts or replaces the row keyed by project, date and service.
    pub fn insert_daily(&self, row: UsageRow) {
        if let Ok(mut state) = self.lock() {
            upsert_daily(&mut state.daily, row);
        }
    }

    pub fn insert_billing(&self, line: BillingLine) {
        if let Ok(mut state) = self.lock() {
            state.billing.push(line);
        }
    }

    pub fn daily_rows(&self) -> Vec<UsageRow> {
        self.lock().map(|s| s.daily.clone()).unwrap_or_default()
    }

    pub fn snapshot_count(&self) -> usize {
        self.lock().map(|s| s.snapshots.len()).unwrap_or_default()
    }
}

fn upsert_daily(daily: &mut Vec<UsageRow>, row: UsageRow) {
    match daily.iter_mut().find(|r| {
        r.project_id == row.project_id
            && r.usage_date == row.usage_date
            && r.service_name == row.service_name
    }) {
        Some(existing) => *existing = row,
        None => daily.push(row),
    }
}

#[async_trait]
impl CostWarehouse for InMemoryWarehouse {
    async fn cost_rows(&self, project_id: &str, window: TimeWindow) -> TamResult<Vec<CostRow>> {
        let state = self.lock()?;
        let mut rows: Vec<&UsageRow> = state
            .daily
            .iter()
            .filter(|r| r.project_id == project_id && window.contains(r.usage_date))
            .collect();
        rows.sort_by(|a, b| {
            a.usage_date
                .cmp(&b.usage_date)
                .then_with(|| a.service_name.cmp(&b.service_name))
        });
        Ok(rows.into_iter().map(CostRow::from).collect())
    }
}

#[async_trait]
impl UsageLedger for InMemoryWarehouse {
    async fn aggregate_daily_usage(&self, day: NaiveDate) -> TamResult<u64> {
        let mut state = self.lock()?;

        let mut grouped: BTreeMap<(String, String), (f64, f64)> = BTreeMap::new();
        for line in state.billing.iter().filter(|l| l.usage_date == day) {
            let entry = grouped
                .entry((line.project_id.clone(), line.service_description.clone()))
                .or_default();
            entry.0 += line.cost;
            entry.1 += line.usage_amount;
        }

        let written = grouped.len() as u64;
        for ((project_id, service_name), (cost, usage_amount)) in grouped {
            upsert_daily(
                &mut state.daily,
                UsageRow {
                    project_id,
                    usage_date: day,
                    service_name,
                    cost,
                    usage_amount,
                },
            );
        }
        Ok(written)
    }

    async fn record_support_snapshot(
        &self,
        _customer_account_id: &str,
        day: NaiveDate,
        cases: &[SupportCase],
    ) -> TamResult<u64> {
        let mut state = self.lock()?;
        for case in cases {
            state
                .snapshots
                .insert((case.case_id.clone(), day), case.clone());
        }
        Ok(cases.len() as u64)
    }

    async fn usage_summary(&self, day: NaiveDate) -> TamResult<UsageSummary> {
        let state = self.lock()?;
        let rows: Vec<&UsageRow> = state.daily.iter().filter(|r| r.usage_date == day).collect();

        Ok(UsageSummary {
            rows: rows.len() as u64,
            projects: rows.iter().map(|r| r.project_id.as_str()).collect::<BTreeSet<_>>().len() as u64,
            services: rows.iter().map(|r| r.service_name.as_str()).collect::<BTreeSet<_>>().len() as u64,
            total_cost: rows.iter().map(|r| r.cost).sum(),
            total_usage_amount: rows.iter().map(|r| r.usage_amount).sum(),
        })
    }
}

/// Fixed health signal values, or an upstream failure for each when `None`.
#[derive(Debug, Clone, Default)]
pub struct StaticSignals {
    pub over_threshold_samples: Option<u64>,
    pub critical_findings: Option<u64>,
    pub recommendations: Option<Vec<String>>,
}

impl StaticSignals {
    /// Every signal fails.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

fn fixed<T: Clone>(value: &Option<T>, source: &'static str) -> TamResult<T> {
    value
        .clone()
        .ok_or_else(|| TamError::upstream(source, "no fixture value"))
}

#[async_trait]
impl MetricsSource for StaticSignals {
    async fn over_threshold_samples(&self, _project_id: &str, _window: TimeWindow) -> TamResult<u64> {
        fixed(&self.over_threshold_samples, "cloud_monitoring")
    }
}

#[async_trait]
impl FindingsSource for StaticSignals {
    async fn critical_findings_since(&self, _since: DateTime<Utc>) -> TamResult<u64> {
        fixed(&self.critical_findings, "security_command_center")
    }
}

#[async_trait]
impl RecommendationSource for StaticSignals {
    async fn recommendations(&self, _project_id: &str) -> TamResult<Vec<String>> {
        fixed(&self.recommendations, "recommender")
    }
}

/// Open cases keyed by customer account; unknown accounts fail upstream.
#[derive(Debug, Clone, Default)]
pub struct InMemorySupportCases {
    cases: BTreeMap<String, Vec<SupportCase>>,
}

impl InMemorySupportCases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cases(mut self, customer_account_id: &str, cases: Vec<SupportCase>) -> Self {
        self.cases.insert(customer_account_id.to_string(), cases);
        self
    }
}

#[async_trait]
impl SupportCaseSource for InMemorySupportCases {
    async fn open_cases(&self, customer_account_id: &str) -> TamResult<Vec<SupportCase>> {
        self.cases
            .get(customer_account_id)
            .cloned()
            .ok_or_else(|| TamError::upstream("cloud_support", format!("unknown account {}", customer_account_id)))
    }
}
