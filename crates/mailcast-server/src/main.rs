//! Mailcast - mail event ingestion run entry point

use anyhow::Result;
use mailcast_common::config::Config;
use mailcast_common::types::load_accounts;
use mailcast_core::{ImapSource, KafkaPublisher, PipelineRunner, TelegramNotifier};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("Starting Mailcast harvest run...");

    let config = Arc::new(Config::load()?);

    let accounts = load_accounts(&config.harvest.accounts_file)?;
    info!(
        "Loaded {} accounts from {}",
        accounts.len(),
        config.harvest.accounts_file.display()
    );

    let publisher = Arc::new(KafkaPublisher::connect(config.kafka.clone()).await?);
    info!("Broker connection established");

    let notifier = Arc::new(TelegramNotifier::new(config.telegram.clone()));
    let source = Arc::new(ImapSource::new(config.imap.clone()));

    let runner = PipelineRunner::new(config, source, publisher, notifier);
    if let Err(e) = runner.run(accounts).await {
        error!("Harvest run failed: {}", e);
        return Err(e.into());
    }

    info!("Harvest run finished");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mailcast_core=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .init();
}
