use anyhow::Context;
use tracing_subscriber::EnvFilter;

use jsondiff_server::{JsonDiffServer, ServerConfig};

/// Environment variable naming an optional TOML config file.
const CONFIG_ENV: &str = "JSONDIFF_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => ServerConfig::load(&path)
            .with_context(|| format!("loading {}", path.to_string_lossy()))?,
        None => ServerConfig::default(),
    };

    JsonDiffServer::new(config).serve().await?;
    Ok(())
}
