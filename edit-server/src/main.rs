//! quill-server binary entry point.
//!
//! Usage:
//! ```bash
//! quill-server --config server.toml
//! RUST_LOG=debug quill-server
//! ```

use anyhow::{Context, Result};
use edit_server::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = get_config_path();
    let config = if path.exists() {
        Config::from_file(&path).context("Failed to load server configuration")?
    } else {
        tracing::info!("No config file at {:?}, using defaults", path);
        Config::default()
    };

    tracing::info!("quill-server v{}", env!("CARGO_PKG_VERSION"));
    edit_server::serve(config).await.context("Server failed")?;
    Ok(())
}

fn get_config_path() -> PathBuf {
    std::env::args()
        .skip_while(|arg| arg != "--config")
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("server.toml"))
}
