//! Optional periodic sweep of pending payments.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::payment::Reconciler;

/// Builds and starts a scheduler running the pending-order sweep on `cron`
/// (six-field expression, seconds first).
///
/// The returned [`JobScheduler`] must be kept alive; dropping it stops the job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the expression is invalid or the
/// scheduler cannot start.
pub async fn build_scheduler(
    cron: &str,
    reconciler: Reconciler,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let reconciler = reconciler.clone();
        Box::pin(async move {
            log::info!("scheduler: starting pending-order sweep");
            match reconciler.reconcile_pending().await {
                Ok(summary) => log::info!(
                    "scheduler: sweep complete (checked={} updated={} failed={})",
                    summary.checked,
                    summary.updated,
                    summary.failed
                ),
                Err(e) => log::error!("scheduler: pending-order sweep failed: {e}"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    log::info!("scheduler: pending-order sweep registered ({cron})");
    Ok(scheduler)
}
