use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::services::SessionRegistry;

/// Every five minutes, on the minute.
pub const SWEEP_SCHEDULE: &str = "0 */5 * * * *";

/// Ends sessions that have been idle too long. Their profiles are gone afterwards.
pub struct SessionSweeper {
    sessions: Arc<SessionRegistry>,
    max_idle: chrono::Duration,
    scheduler: JobScheduler,
}

impl SessionSweeper {
    pub async fn new(sessions: Arc<SessionRegistry>, max_idle: chrono::Duration) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            sessions,
            max_idle,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        let sessions = self.sessions.clone();
        let max_idle = self.max_idle;

        let job = Job::new_async(SWEEP_SCHEDULE, move |_uuid, _l| {
            let sessions = sessions.clone();

            Box::pin(async move {
                let removed = sessions.evict_idle(max_idle).await;
                if removed > 0 {
                    log::info!(
                        "🧹 Evicted {} idle session(s), {} still active",
                        removed,
                        sessions.len().await
                    );
                } else {
                    log::debug!("🧹 Session sweep: nothing idle");
                }
            })
        })?;

        self.scheduler.add(job).await?;
        self.scheduler.start().await?;

        log::info!(
            "✅ Session sweeper started (idle limit: {} min)",
            self.max_idle.num_minutes()
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        log::info!("Session sweeper stopped");
        Ok(())
    }
}
