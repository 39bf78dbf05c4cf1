//! Karigari server binary.

use karigari_error::{BackendError, KarigariResult};
use karigari_server::{AppState, ServerConfig, observability, routes};

#[tokio::main]
async fn main() -> KarigariResult<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let json_logs = std::env::var("KARIGARI_JSON_LOGS").is_ok();
    observability::init_tracing(json_logs);

    let config = ServerConfig::load()?;
    let state = AppState::from_config(&config)?;
    let app = routes::router(state, &config.media_root);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| BackendError::new(format!("failed to bind {}: {}", config.bind_addr, e)))?;

    tracing::info!(addr = %config.bind_addr, "Karigari server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| BackendError::new(format!("server error: {}", e)))?;

    Ok(())
}
