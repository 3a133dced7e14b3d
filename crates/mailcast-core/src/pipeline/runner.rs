//! Pipeline runner
//!
//! Fans a run out across three levels: accounts in fixed-size groups
//! run concurrently with a join barrier between groups, folders within
//! an account run concurrently and unbounded, pages within a folder run
//! sequentially in small batches. A shared cancellation token stops new
//! work at every level once any sibling fails fatally.

use super::progress::ProgressTracker;
use crate::imap::MailSource;
use crate::notify::TelegramNotifier;
use crate::publisher::Publisher;
use crate::retry::{with_retry, RetryPolicy};
use anyhow::anyhow;
use mailcast_common::types::{Account, EVENT_MESSAGE_APPEND};
use mailcast_common::{Config, Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Folder names to harvest for one account, excluding the reserved
/// system folder.
fn harvestable_folders<'a>(folders: &'a [String], reserved: &str) -> Vec<&'a str> {
    folders
        .iter()
        .map(String::as_str)
        .filter(|f| *f != reserved)
        .collect()
}

/// Drives one full harvest run.
#[derive(Clone)]
pub struct PipelineRunner {
    config: Arc<Config>,
    source: Arc<dyn MailSource>,
    publisher: Arc<dyn Publisher>,
    notifier: Arc<TelegramNotifier>,
}

impl PipelineRunner {
    /// Create a new runner
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn MailSource>,
        publisher: Arc<dyn Publisher>,
        notifier: Arc<TelegramNotifier>,
    ) -> Self {
        Self {
            config,
            source,
            publisher,
            notifier,
        }
    }

    /// Harvest every account, group by group. The first unrecovered
    /// task failure cancels the run and surfaces after the current
    /// group drains.
    pub async fn run(&self, accounts: Vec<Account>) -> Result<()> {
        let total = accounts.len();
        let batch = self.config.harvest.account_batch.max(1);
        info!("Harvesting {} accounts in groups of {}", total, batch);

        let cancel = CancellationToken::new();

        for (group_index, group) in accounts.chunks(batch).enumerate() {
            let mut tasks = JoinSet::new();

            for (offset, account) in group.iter().enumerate() {
                let position = group_index * batch + offset + 1;
                let runner = self.clone();
                let account = account.clone();
                let cancel = cancel.clone();
                tasks.spawn(async move {
                    runner.process_account(account, position, total, cancel).await
                });
            }

            drain(tasks, &cancel).await?;
        }

        info!("Harvest run complete");
        Ok(())
    }

    async fn process_account(
        &self,
        account: Account,
        position: usize,
        total: usize,
        cancel: CancellationToken,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            return Ok(());
        }

        info!("USER: {} ({}/{})", account.email, position, total);
        self.notifier
            .notify(&format!(
                "email: {}, account {}/{}",
                account.email, position, total
            ))
            .await;

        let mut tasks = JoinSet::new();
        for folder in harvestable_folders(&account.folders, &self.config.harvest.reserved_folder) {
            info!("FOLDER: {}", folder);
            let runner = self.clone();
            let account = account.clone();
            let folder = folder.to_string();
            let cancel = cancel.clone();
            tasks.spawn(async move { runner.process_folder(&account, &folder, cancel).await });
        }

        drain(tasks, &cancel).await
    }

    async fn process_folder(
        &self,
        account: &Account,
        folder: &str,
        cancel: CancellationToken,
    ) -> Result<()> {
        let harvest = &self.config.harvest;
        info!("Processing folder: {}, user: {}", folder, account.email);

        let pages = self
            .source
            .page_count(&account.email, &account.password, folder, harvest.page_size)
            .await?;

        let policy = RetryPolicy::new(
            Duration::from_secs(harvest.fetch_delay_secs),
            harvest.fetch_retries,
        );
        let mut tracker = ProgressTracker::new(pages);
        let page_indices: Vec<u32> = (0..pages).collect();

        for chunk in page_indices.chunks(harvest.page_batch.max(1)) {
            if cancel.is_cancelled() {
                debug!(
                    "Run cancelled by a sibling failure, stopping scan of {} for {}",
                    folder, account.email
                );
                return Ok(());
            }

            let events = with_retry(&policy, "fetch events", || {
                self.source.fetch_events(
                    &account.email,
                    &account.password,
                    folder,
                    chunk,
                    harvest.page_size,
                )
            })
            .await?;

            for event in events {
                let payload = serde_json::to_value(&event)
                    .map_err(|e| Error::Other(anyhow!("serializing event: {}", e)))?;
                self.publisher
                    .publish(EVENT_MESSAGE_APPEND, &account.email, payload)
                    .await?;
            }

            for decile in tracker.advance(chunk.len() as u32) {
                self.notifier
                    .notify(&format!(
                        "email: {}, folder: {}, percent: {}",
                        account.email, folder, decile
                    ))
                    .await;
            }
        }

        Ok(())
    }
}

/// Join every task in the set. The first failure cancels the token so
/// siblings stop picking up new work; remaining tasks are still drained
/// and their late failures logged. Returns the first error.
async fn drain(mut tasks: JoinSet<Result<()>>, cancel: &CancellationToken) -> Result<()> {
    let mut first_error = None;

    while let Some(joined) = tasks.join_next().await {
        let failure = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e,
            Err(e) => Error::Other(anyhow!("harvest task panicked: {}", e)),
        };

        if first_error.is_none() {
            cancel.cancel();
            first_error = Some(failure);
        } else {
            warn!("Additional task failure after cancellation: {}", failure);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
