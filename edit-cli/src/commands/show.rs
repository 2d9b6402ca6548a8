//! Print documents.

use anyhow::{bail, Result};
use edit_client::ClientConfig;
use edit_core::Document;
use edit_types::{CharStyle, DocId};

use super::open_session;

/// Run the show command.
///
/// Prints one document, or every document when `doc_id` is `None`.
pub async fn run(config: ClientConfig, doc_id: Option<DocId>, styled: bool) -> Result<()> {
    let client = open_session(config).await?;
    let documents = client.verified_documents().await;

    match doc_id {
        Some(doc_id) => match documents.get(doc_id) {
            Some(document) => println!("{}", render(doc_id, document, styled)),
            None => bail!("No document with id {}", doc_id),
        },
        None if documents.is_empty() => println!("No documents"),
        None => {
            for (doc_id, document) in documents.iter() {
                println!("{}", render(doc_id, document, styled));
            }
        }
    }
    println!("(version {})", client.last_seen().await);
    Ok(())
}

/// One-line rendering: `[id] title: text`.
///
/// With `styled`, bold runs are wrapped in `**`, italic in `_` and
/// underline in `<u></u>`.
pub fn render(doc_id: DocId, document: &Document, styled: bool) -> String {
    let body = if styled {
        document
            .content()
            .spans()
            .into_iter()
            .map(|(text, style)| decorate(&text, style))
            .collect()
    } else {
        document.content().text()
    };
    format!("[{}] {}: {}", doc_id, document.title(), body)
}

fn decorate(text: &str, style: CharStyle) -> String {
    let mut out = text.to_string();
    if style.underline {
        out = format!("<u>{}</u>", out);
    }
    if style.italic {
        out = format!("_{}_", out);
    }
    if style.bold {
        out = format!("**{}**", out);
    }
    out
}
