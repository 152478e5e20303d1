use anyhow::Context;
use medibot_server::{AppState, Config, init_tracing, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the variables directly.
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or_default());
    let config = config.context("invalid configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let state = AppState::from_config(&config)
        .await
        .context("failed to initialize the answer pipeline")?;

    run_server(config.socket_addr(), state).await
}
