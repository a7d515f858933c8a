mod settings;

use anyhow::Context;
use dropcode_core::{ContentStore, Reclaimer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dropcode_server=info,dropcode_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = settings::config_from_env();
    let ttl = config.ttl;
    let interval = config.reclaim_interval;
    let code_length = config.code_length;

    let store = ContentStore::with_config(config).context("invalid store configuration")?;
    let reclaimer = Reclaimer::start(store.clone());

    tracing::info!("Dropcode store ready");
    tracing::info!("   TTL: {}s", ttl.as_secs());
    tracing::info!("   Reclaim interval: {}s", interval.as_secs());
    tracing::info!("   Code length: {}", code_length);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received");

    reclaimer.shutdown().await;

    let stats = store.stats();
    tracing::info!(
        entries = stats.entries,
        fingerprints = stats.fingerprints,
        "Store torn down, content discarded"
    );

    Ok(())
}
