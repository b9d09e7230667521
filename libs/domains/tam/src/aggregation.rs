//! Trend and top-N derivations over warehouse rows.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{CostRow, ServiceCost};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage change from the first to the last period, rounded to two decimals.
///
/// 0.0 when there are fewer than two periods or the first period cost is zero.
pub fn trend_percent(period_costs: &[f64]) -> f64 {
    if period_costs.len() < 2 {
        return 0.0;
    }
    let (first, last) = (period_costs[0], period_costs[period_costs.len() - 1]);
    if first == 0.0 {
        return 0.0;
    }
    round2((last - first) / first * 100.0)
}

/// Sums cost per service and keeps the `n` most expensive.
///
/// Services with equal totals keep the order in which they first appear in `rows`.
pub fn top_services(rows: &[CostRow], n: usize) -> Vec<ServiceCost> {
    let mut totals: Vec<ServiceCost> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        match index.get(row.service_name.as_str()) {
            Some(&i) => totals[i].cost += row.cost,
            None => {
                index.insert(row.service_name.as_str(), totals.len());
                totals.push(ServiceCost {
                    service_name: row.service_name.clone(),
                    cost: row.cost,
                });
            }
        }
    }

    // sort_by is stable
    totals.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    totals.truncate(n);
    for service in &mut totals {
        service.cost = round2(service.cost);
    }
    totals
}

/// Cost per usage date in ascending date order.
pub fn daily_totals(rows: &[CostRow]) -> Vec<f64> {
    let mut by_day: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
    for row in rows {
        *by_day.entry(row.usage_date).or_default() += row.cost;
    }
    by_day.into_values().collect()
}

pub fn total_cost(rows: &[CostRow]) -> f64 {
    rows.iter().map(|r| r.cost).sum()
}

/// Headline numbers for a report period.
pub fn usage_highlights(rows: &[CostRow]) -> BTreeMap<String, f64> {
    let services: BTreeSet<&str> = rows.iter().map(|r| r.service_name.as_str()).collect();
    let days: BTreeSet<chrono::NaiveDate> = rows.iter().map(|r| r.usage_date).collect();
    let total_usage: f64 = rows.iter().map(|r| r.usage_amount).sum();
    let daily_average = if days.is_empty() {
        0.0
    } else {
        total_cost(rows) / days.len() as f64
    };

    BTreeMap::from([
        ("active_services".to_string(), services.len() as f64),
        ("billing_days".to_string(), days.len() as f64),
        ("total_usage_amount".to_string(), round2(total_usage)),
        ("daily_average_cost".to_string(), round2(daily_average)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(service: &str, cost: f64, day: u32) -> CostRow {
        CostRow {
            service_name: service.to_string(),
            cost,
            usage_date: NaiveDate::from_ymd_opt(2025, 7, day).unwrap(),
            usage_amount: 1.0,
        }
    }

    #[test]
    fn test_trend_needs_two_periods() {
        assert_eq!(trend_percent(&[]), 0.0);
        assert_eq!(trend_percent(&[120.0]), 0.0);
    }

    #[test]
    fn test_trend_zero_first_period() {
        assert_eq!(trend_percent(&[0.0, 150.0]), 0.0);
    }

    #[test]
    fn test_trend_increase() {
        assert_eq!(trend_percent(&[100.0, 150.0]), 50.0);
    }

    #[test]
    fn test_trend_uses_first_and_last_only() {
        assert_eq!(trend_percent(&[200.0, 900.0, 10.0, 150.0]), -25.0);
    }

    #[test]
    fn test_trend_rounds_to_two_decimals() {
        assert_eq!(trend_percent(&[3.0, 4.0]), 33.33);
        assert_eq!(trend_percent(&[3.0, 2.0]), -33.33);
    }

    #[test]
    fn test_top_services_breaks_ties_by_first_seen() {
        let rows = vec![row("A", 10.0, 1), row("B", 30.0, 1), row("A", 20.0, 2), row("C", 5.0, 2)];

        let top = top_services(&rows, 2);
        assert_eq!(
            top,
            vec![
                ServiceCost { service_name: "A".into(), cost: 30.0 },
                ServiceCost { service_name: "B".into(), cost: 30.0 },
            ]
        );
    }

    #[test]
    fn test_top_services_descending() {
        let rows = vec![row("Storage", 1.5, 1), row("Compute Engine", 9.0, 1), row("BigQuery", 4.25, 1)];

        let names: Vec<_> = top_services(&rows, 5).into_iter().map(|s| s.service_name).collect();
        assert_eq!(names, vec!["Compute Engine", "BigQuery", "Storage"]);
    }

    #[test]
    fn test_top_services_empty() {
        assert!(top_services(&[], 5).is_empty());
    }

    #[test]
    fn test_daily_totals_sorted_by_date() {
        let rows = vec![row("A", 5.0, 3), row("A", 1.0, 1), row("B", 2.0, 1)];
        assert_eq!(daily_totals(&rows), vec![3.0, 5.0]);
    }

    #[test]
    fn test_usage_highlights() {
        let rows = vec![row("A", 10.0, 1), row("B", 20.0, 1), row("A", 30.0, 2)];
        let highlights = usage_highlights(&rows);

        assert_eq!(highlights["active_services"], 2.0);
        assert_eq!(highlights["billing_days"], 2.0);
        assert_eq!(highlights["total_usage_amount"], 3.0);
        assert_eq!(highlights["daily_average_cost"], 30.0);
    }

    #[test]
    fn test_usage_highlights_without_rows() {
        let highlights = usage_highlights(&[]);
        assert!(highlights.values().all(|v| *v == 0.0));
        assert_eq!(highlights.len(), 4);
    }
}
