//! CLI command implementations.

pub mod edit;
pub mod new;
pub mod show;
pub mod watch;

use anyhow::{Context, Result};
use edit_client::{ClientConfig, CollabClient, HttpTransport};

/// Connect to the server and replay the whole log.
pub async fn open_session(config: ClientConfig) -> Result<CollabClient<HttpTransport>> {
    let transport =
        HttpTransport::new(&config.server_url).context("Failed to create HTTP transport")?;
    let client = CollabClient::new(config, transport);

    let client_id = client
        .connect()
        .await
        .context("Failed to connect to server")?;
    tracing::debug!("Connected as client {}", client_id);

    catch_up(&client).await?;
    Ok(client)
}

/// Poll until the server has nothing newer.
pub async fn catch_up(client: &CollabClient<HttpTransport>) -> Result<()> {
    while client.poll().await.context("Failed to fetch changes")? > 0 {}
    Ok(())
}
