use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use neusearch_backend::core::config::AppConfig;
use neusearch_backend::core::logging;
use neusearch_backend::core::paths::AppPaths;
use neusearch_backend::server::router::router;
use neusearch_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = Arc::new(AppPaths::new());
    let _log_guard = logging::init(&paths);

    let config = AppConfig::load(&paths);
    let state = AppState::initialize(paths, config).await?;

    let bind_addr = format!("0.0.0.0:{}", state.config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
