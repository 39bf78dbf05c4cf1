//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// Respects `RUST_LOG`, defaulting to `info`. Pass `json_logs` for
/// line-delimited JSON output in production deployments.
pub fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    let result = if json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already initialized: {}", e);
    }
}
