//! Cron-driven daily aggregation.

use domain_tam::DailyAggregator;
use eyre::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Runs the aggregation on `cron_expr` until the process is interrupted.
pub async fn run_scheduled(aggregator: Arc<DailyAggregator>, cron_expr: &str) -> Result<()> {
    info!(cron = cron_expr, "Starting scheduled daily aggregation");

    let mut sched = JobScheduler::new().await?;

    let job = Job::new_async(cron_expr, move |_uuid, _l| {
        let aggregator = aggregator.clone();

        Box::pin(async move {
            info!("Running scheduled daily aggregation");
            match aggregator.run().await {
                Ok(result) => {
                    info!(
                        usage_date = %result.usage_date,
                        rows = result.rows_aggregated,
                        snapshot_rows = result.support_snapshot_rows,
                        "Scheduled aggregation complete"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Scheduled aggregation failed");
                }
            }
        })
    })?;

    sched.add(job).await?;
    sched.start().await?;

    info!("Scheduler started, waiting for jobs...");
    tokio::signal::ctrl_c().await?;

    info!("Stopping scheduler");
    sched.shutdown().await?;
    Ok(())
}
