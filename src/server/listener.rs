use tokio::net::TcpListener;
use tracing::info;

use crate::app::AppState;
use crate::config::Config;
use crate::http::connection::Connection;

/// Accepts connections forever, handling each one to completion before the
/// next accept.
pub async fn run(cfg: &Config, state: &AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", cfg.server.listen_addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let mut conn = Connection::new(socket, cfg.limits);
        if let Err(e) = conn.run(state).await {
            tracing::error!("Connection error from {}: {:#}", peer, e);
        }
    }
}
