// Gemini Adapter Server
//
// Health check plus Google OAuth consent and callback endpoints
// Usage: gemini_adapter [host] [port]

use gemini_adapter::{start_server, AdapterConfig};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = AdapterConfig::from_env()
        .and_then(|config| config.with_args(&args))
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    tracing::info!("[OK] Google OAuth configured: {}", config.client.client_id.as_str());

    start_server(config).await?;

    Ok(())
}
