use async_trait::async_trait;
use chrono::{NaiveTime, SecondsFormat};
use serde::Deserialize;

use super::{GoogleApiClient, api_url, collect_pages};
use crate::error::TamResult;
use crate::models::TimeWindow;
use crate::sources::MetricsSource;

const MONITORING_API: &str = "https://monitoring.googleapis.com/v3";
const SOURCE: &str = "cloud_monitoring";

const PAGE_SIZE: u32 = 1000;

pub const CPU_UTILIZATION_METRIC: &str = "compute.googleapis.com/instance/cpu/utilization";
/// Samples strictly above this utilization count against performance.
pub const CPU_UTILIZATION_THRESHOLD: f64 = 0.8;

/// Cloud Monitoring time series client
pub struct CloudMonitoring {
    api: GoogleApiClient,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTimeSeriesResponse {
    #[serde(default)]
    time_series: Vec<TimeSeries>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    #[serde(default)]
    points: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct Point {
    value: TypedValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypedValue {
    double_value: Option<f64>,
}

impl CloudMonitoring {
    pub fn new(api: GoogleApiClient) -> Self {
        Self { api }
    }
}

fn count_over_threshold(series: &[TimeSeries], threshold: f64) -> u64 {
    series
        .iter()
        .flat_map(|series| series.points.iter())
        .filter_map(|point| point.value.double_value)
        .filter(|value| *value > threshold)
        .count() as u64
}

#[async_trait]
impl MetricsSource for CloudMonitoring {
    async fn over_threshold_samples(&self, project_id: &str, window: TimeWindow) -> TamResult<u64> {
        let url = api_url(MONITORING_API, &["projects", project_id, "timeSeries"])?;
        let end = window
            .end()
            .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
            .and_utc();
        let query = [
            ("filter", format!("metric.type = \"{}\"", CPU_UTILIZATION_METRIC)),
            (
                "interval.startTime",
                window.start_time().to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("interval.endTime", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("pageSize", PAGE_SIZE.to_string()),
        ];
        let api = &self.api;

        let series = collect_pages(SOURCE, |page_token| {
            let url = url.clone();
            let mut query = query.to_vec();
            if let Some(token) = page_token {
                query.push(("pageToken", token));
            }
            async move {
                let page: ListTimeSeriesResponse = api.get_json(SOURCE, url, &query).await?;
                Ok((page.time_series, page.next_page_token))
            }
        })
        .await?;
        let count = count_over_threshold(&series, CPU_UTILIZATION_THRESHOLD);
        tracing::debug!(project_id, samples = count, "Counted high CPU samples");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_points_above_threshold() {
        let response: ListTimeSeriesResponse = serde_json::from_value(serde_json::json!({
            "timeSeries": [
                { "points": [
                    { "value": { "doubleValue": 0.95 } },
                    { "value": { "doubleValue": 0.80 } },
                    { "value": { "doubleValue": 0.81 } }
                ]},
                { "points": [
                    { "value": { "doubleValue": 0.10 } },
                    { "value": { "int64Value": "3" } }
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(count_over_threshold(&response.time_series, CPU_UTILIZATION_THRESHOLD), 2);
    }

    #[test]
    fn test_empty_response_counts_zero() {
        let response: ListTimeSeriesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.next_page_token.is_none());
        assert_eq!(count_over_threshold(&response.time_series, CPU_UTILIZATION_THRESHOLD), 0);
    }

    fn hot_page(points: usize, next: Option<&str>) -> ListTimeSeriesResponse {
        let points: Vec<_> = (0..points)
            .map(|_| serde_json::json!({ "value": { "doubleValue": 0.93 } }))
            .collect();
        serde_json::from_value(serde_json::json!({
            "timeSeries": [{ "points": points }],
            "nextPageToken": next
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_samples_are_counted_across_pages() {
        let mut pages = std::collections::VecDeque::from(vec![hot_page(8, Some("p2")), hot_page(5, None)]);

        let series = collect_pages(SOURCE, |_| {
            let page = pages.pop_front().unwrap();
            async move { Ok((page.time_series, page.next_page_token)) }
        })
        .await
        .unwrap();

        // 13 > 10: WARNING
        assert_eq!(count_over_threshold(&series, CPU_UTILIZATION_THRESHOLD), 13);
    }

    #[test]
    fn test_project_id_is_one_path_segment() {
        let url = api_url(MONITORING_API, &["projects", "a/../b", "timeSeries"]).unwrap();
        assert_eq!(url.path(), "/v3/projects/a%2F..%2Fb/timeSeries");
    }
}
