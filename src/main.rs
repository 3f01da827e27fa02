use porthole::app::AppState;
use porthole::config::Config;
use porthole::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let state = AppState::from_config(&cfg)?;
    tracing::info!(
        api_routes = state.api().routes().len(),
        redirects = state.redirects().len(),
        "Application state ready"
    );

    tokio::select! {
        res = server::listener::run(&cfg, &state) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
