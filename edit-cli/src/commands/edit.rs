//! Insert, delete and restyle text.

use anyhow::{bail, Result};
use edit_client::ClientConfig;
use edit_types::{Change, DocId, PostResult};

use super::{catch_up, open_session};
use crate::commands::show::render;

/// Run one edit against a document and print the result.
pub async fn run(config: ClientConfig, doc_id: DocId, change: Change) -> Result<()> {
    let client = open_session(config).await?;
    if client.verified_document(doc_id).await.is_none() {
        bail!("No document with id {}", doc_id);
    }

    let operation = change.operation_type();
    if client.submit(doc_id, &change).await? == PostResult::Failure {
        bail!("Server rejected the {} edit", operation);
    }
    catch_up(&client).await?;

    if let Some(document) = client.verified_document(doc_id).await {
        println!("{}", render(doc_id, &document, false));
    }
    Ok(())
}
