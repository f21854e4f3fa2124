use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classlive_backend::{
    config::Config,
    db::connection::{create_pool_with_config, ping, PoolConfig},
    routes::build_router,
    services::streaming_backend::LivegoClient,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classlive_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database.redacted_url(),
        streaming_api_url = %config.streaming.api_url,
        playback_host = %config.streaming.playback.host,
        listen_port = config.server.port,
        "Loaded configuration"
    );

    let database_url = config.database.connection_url()?;
    let pool = create_pool_with_config(&database_url, PoolConfig::from(&config.database)).await?;
    ping(&pool)
        .await
        .context("database did not answer the startup ping")?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let backend = LivegoClient::new(&config.streaming)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let app = build_router(AppState::from_pool(pool, config, Arc::new(backend)));

    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
