//! Configuration loading for the quill CLI.

use anyhow::{Context, Result};
use edit_client::ClientConfig;
use std::path::Path;

/// Load the client configuration.
///
/// Reads `path` when given (the file must exist), otherwise starts from the
/// defaults. A `--server` flag overrides the file's `server_url`.
pub async fn load(path: Option<&Path>, server: Option<&str>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    if let Some(server) = server {
        config.server_url = server.to_string();
    }
    Ok(config)
}
