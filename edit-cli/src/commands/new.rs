//! Create a document.

use anyhow::{bail, Result};
use edit_client::ClientConfig;
use edit_types::PostResult;

use super::{catch_up, open_session};

/// Run the new command.
pub async fn run(config: ClientConfig, title: &str) -> Result<()> {
    let client = open_session(config).await?;
    let before = client.verified_documents().await;

    if client.create_document(title).await? == PostResult::Failure {
        bail!("Server rejected the new document");
    }
    catch_up(&client).await?;

    let after = client.verified_documents().await;
    let created = after
        .iter()
        .filter(|(id, doc)| !before.contains(*id) && doc.title() == title)
        .map(|(id, _)| id)
        .last();

    match created {
        Some(doc_id) => println!("Created document {} \"{}\"", doc_id, title),
        None => println!("Document \"{}\" requested", title),
    }
    Ok(())
}
