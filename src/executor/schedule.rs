use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs `task` forever on a fixed period.
///
/// The body is awaited to completion, any `Err` is logged under `name`,
/// and the loop re-arms after `period` regardless of outcome. Nothing
/// cancels the loop; it lives as long as the process.
pub fn schedule_recurring<F, Fut>(name: &'static str, period: Duration, task: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    tokio::spawn(async move {
        loop {
            if let Err(e) = task().await {
                tracing::error!("{} cycle failed: {:#}", name, e);
            }
            tokio::time::sleep(period).await;
        }
    })
}

/// Hands a one-shot job to the runtime, off the caller's path.
pub fn submit<Fut>(name: &'static str, job: Fut) -> JoinHandle<()>
where
    Fut: Future<Output = ()> + Send + 'static,
{
    tracing::trace!("Submitting {} task", name);
    tokio::spawn(job)
}
