use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classlive_backend::{
    config::Config,
    db::connection::{create_pool_with_config, PoolConfig},
    repositories::LiveSessionRepository,
};

/// Removes `pending` sessions that were never provisioned, which happens when
/// the process dies between inserting the row and provisioning the stream.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classlive_backend=info,pending_session_cleanup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let pool = create_pool_with_config(
        &config.database.connection_url()?,
        PoolConfig::from(&config.database),
    )
    .await?;

    let cutoff = Utc::now() - Duration::hours(config.maintenance.stale_pending_hours);
    let deleted = LiveSessionRepository::new(pool)
        .delete_stale_pending(cutoff)
        .await?;

    if deleted > 0 {
        tracing::info!(deleted, %cutoff, "Deleted stale unprovisioned live sessions");
    } else {
        tracing::debug!(%cutoff, "No stale unprovisioned live sessions");
    }

    Ok(())
}
