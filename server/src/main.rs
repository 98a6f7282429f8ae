mod server;
mod store;
mod web;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = server::Settings::from_env()?;
    tracing::info!(
        rows = settings.config.rows,
        cols = settings.config.cols,
        seed = settings.config.seed,
        generations = settings.generations,
        publish_interval = settings.publish_interval,
        "Starting digital organisms snapshot service"
    );

    server::run(settings).await
}
