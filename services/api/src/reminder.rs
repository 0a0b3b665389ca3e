//! Periodic reminder sweep running beside the HTTP server.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::ApiError;
use crate::usecase::reminder::SweepReport;

/// Handle to the background sweep loop. Call [`ReminderTask::shutdown`] to
/// stop it; dropping the handle also ends the loop at its next wake-up.
pub struct ReminderTask {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReminderTask {
    /// Run `sweep` every `period`. The first sweep happens one full period
    /// after spawning. A failed sweep is logged and retried on the next tick.
    pub fn spawn<F, Fut>(period: Duration, mut sweep: F) -> Self
    where
        F: FnMut(DateTime<Utc>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<SweepReport, ApiError>> + Send + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval fires immediately once
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = stopped.changed() => break,
                    _ = ticker.tick() => {
                        match sweep(Utc::now()).await {
                            Ok(report) => tracing::info!(
                                sessions = report.sessions,
                                sent = report.sent,
                                skipped = report.skipped,
                                failed = report.failed,
                                "reminder sweep finished"
                            ),
                            Err(e) => tracing::error!(error = ?e, "reminder sweep failed"),
                        }
                    }
                }
            }
            tracing::info!("reminder task stopped");
        });
        Self { stop, handle }
    }

    /// Signal the loop to stop and wait for it. An in-flight sweep finishes first.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "reminder task ended abnormally");
        }
    }
}
