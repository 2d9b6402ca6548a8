//! Follow a document live.

use anyhow::Result;
use edit_client::{ClientConfig, CollabClient, HttpTransport, SyncDriver};
use edit_types::DocId;
use std::sync::Arc;

use crate::commands::show::render;

/// Run the sync loops and print the document whenever its working copy changes.
///
/// Stops on Ctrl-C or when the poll loop hits a fatal error.
pub async fn run(config: ClientConfig, doc_id: DocId) -> Result<()> {
    let transport = HttpTransport::new(&config.server_url)?;
    let refresh = config.poll_interval();
    let client = Arc::new(CollabClient::new(config, transport));
    let driver = SyncDriver::start(Arc::clone(&client)).await;

    println!("Watching document {} (Ctrl-C to stop)", doc_id);
    let mut last = None;
    let mut ticker = tokio::time::interval(refresh);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let current = client
            .working_document(doc_id)
            .await
            .map(|document| render(doc_id, &document, true));
        if current != last {
            match &current {
                Some(line) => println!("{}", line),
                None => println!("[{}] (not created yet)", doc_id),
            }
            last = current;
        }

        if driver.poll_stopped() {
            break;
        }
    }

    driver.shutdown().await?;
    Ok(())
}
