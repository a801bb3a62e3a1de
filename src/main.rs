use fatoora::core::FatooraError;
use fatoora::server::{Application, Config, Poller};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), FatooraError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load()?;
    tracing::info!(environment = %config.environment, "starting fatoora");

    let app = Application::build(config).await?;
    let state = app.state();

    let shutdown = CancellationToken::new();
    let poller_handle = tokio::spawn(Poller::new(state.clone()).run(shutdown.clone()));

    tokio::select! {
        result = app.run_until_stopped() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "server exited with error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    shutdown.cancel();
    let _ = poller_handle.await;
    state.store.shutdown().await;

    Ok(())
}
