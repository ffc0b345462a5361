//! Adapter runtime integration.
//!
//! Bridges the sync `main` with the async stdio host.

use tokio::runtime::Runtime;

use crate::server::{run_stdio, ServerConfig};

/// Check if the adapter is disabled via `MATCH3_ADAPTER_DISABLED`
pub fn is_disabled() -> bool {
    std::env::var("MATCH3_ADAPTER_DISABLED")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Serve the protocol on stdin/stdout until stdin closes.
pub fn run_blocking(config: ServerConfig) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    rt.block_on(run_stdio(config))
}

/// Start the host from environment variables.
///
/// Returns immediately if `MATCH3_ADAPTER_DISABLED` is set.
pub fn start_from_env() -> anyhow::Result<()> {
    if is_disabled() {
        tracing::info!("adapter disabled via MATCH3_ADAPTER_DISABLED");
        return Ok(());
    }
    run_blocking(ServerConfig::from_env())
}
