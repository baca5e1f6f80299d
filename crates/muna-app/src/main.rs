use anyhow::Context;
use muna_config::Config;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod handlers;
mod state;

use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    if config.gemini.api_key.is_none() {
        // Startup still succeeds; model calls fail lazily until a key is set.
        tracing::warn!("GOOGLE_API_KEY is not set, phrase translation will be degraded");
    }

    let state = AppState::from_config(&config);
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .context("bind server listener failed")?;
    tracing::info!("muna-app listening on http://{}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with error")
}

async fn shutdown_signal() {
    signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    tracing::info!("shutdown requested");
}
