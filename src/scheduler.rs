use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::AppConfig;
use crate::db::Database;
use crate::scrape_and_store::run_scheduled_scrape;
use crate::scraping::HttpFetcher;

/// Guard against overlapping scheduled firings. The job interval is assumed
/// to be long relative to crawl duration, but when a crawl does overrun, the
/// next firing is skipped rather than queued: its page range would only
/// re-cover what the running crawl is already storing.
#[derive(Clone, Default)]
pub struct FiringGuard {
    slot: Arc<Mutex<()>>,
}

impl FiringGuard {
    /// Claims the job slot, or returns `None` while a previous firing still
    /// holds it.
    pub fn try_acquire(&self) -> Option<OwnedMutexGuard<()>> {
        self.slot.clone().try_lock_owned().ok()
    }
}

/// Builds a scheduler with one crawl-and-store job on the configured cron
/// cadence. The caller starts it and shuts it down; shutdown abandons any
/// in-flight fetches while every upsert that already completed stays valid.
pub async fn build_scheduler(db: Database, config: Arc<AppConfig>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await.context("Failed to create scheduler")?;

    let fetcher = Arc::new(HttpFetcher::new(&config.scraper)?);
    let guard = FiringGuard::default();
    let cron = config.schedule.cron.clone();

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let db = db.clone();
        let config = config.clone();
        let fetcher = fetcher.clone();
        let guard = guard.clone();

        Box::pin(async move {
            let Some(_slot) = guard.try_acquire() else {
                println!(
                    "{}",
                    "Previous crawl still running, skipping this firing".yellow()
                );
                return;
            };

            run_scheduled_scrape(&db, fetcher.as_ref(), &config).await;
        })
    })
    .with_context(|| format!("Failed to create crawl job for cron '{}'", cron))?;

    scheduler.add(job).await.context("Failed to add crawl job")?;

    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_firing_is_skipped_while_first_holds_the_slot() {
        let guard = FiringGuard::default();

        let slot = guard.try_acquire();
        assert!(slot.is_some());
        assert!(guard.try_acquire().is_none());

        drop(slot);
        assert!(guard.try_acquire().is_some());
    }
}
