//! # quill
//!
//! Command-line client for Quill collaborative editing.
//!
//! ## Commands
//!
//! - `new`: Create a document
//! - `insert`: Insert text into a document
//! - `delete`: Delete characters from a document
//! - `style`: Set or clear bold/italic/underline on a range
//! - `show`: Print one or all documents
//! - `watch`: Follow a document as others edit it
//!
//! ## Example
//!
//! ```bash
//! quill new "Untitled"
//! quill insert 1 0 "hello"
//! quill style 1 0 5 bold
//! quill show --styled
//! quill --server http://10.0.0.5:4444 watch 1
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use edit_types::{Change, CharStyle, DocId, StyleType};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{edit, new, show, watch};

/// Command-line client for Quill collaborative editing.
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Client configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Server URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a document
    New {
        /// Document title
        #[arg(default_value = "Untitled")]
        title: String,
    },

    /// Insert text into a document
    Insert {
        /// Document id
        doc: u64,
        /// Character position
        position: usize,
        /// Text to insert
        text: String,
        /// Insert bold text
        #[arg(long)]
        bold: bool,
        /// Insert italic text
        #[arg(long)]
        italic: bool,
        /// Insert underlined text
        #[arg(long)]
        underline: bool,
    },

    /// Delete characters from a document
    Delete {
        /// Document id
        doc: u64,
        /// First character to delete
        position: usize,
        /// Number of characters
        count: usize,
    },

    /// Set or clear a style flag on a range
    Style {
        /// Document id
        doc: u64,
        /// First character
        position: usize,
        /// Number of characters
        count: usize,
        /// Style to change
        #[arg(value_enum)]
        style: StyleArg,
        /// Clear the style instead of setting it
        #[arg(long)]
        off: bool,
    },

    /// Print documents
    Show {
        /// Document id (all documents when omitted)
        doc: Option<u64>,
        /// Mark bold, italic and underlined runs
        #[arg(long)]
        styled: bool,
    },

    /// Follow a document live
    Watch {
        /// Document id
        doc: u64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Bold,
    Italic,
    Underline,
}

impl From<StyleArg> for StyleType {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Bold => StyleType::Bold,
            StyleArg::Italic => StyleType::Italic,
            StyleArg::Underline => StyleType::Underline,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref(), cli.server.as_deref()).await?;

    match cli.command {
        Commands::New { title } => new::run(config, &title).await?,
        Commands::Insert {
            doc,
            position,
            text,
            bold,
            italic,
            underline,
        } => {
            let change = Change::Insert {
                position,
                text,
                style: CharStyle::new(bold, italic, underline),
            };
            edit::run(config, DocId::new(doc), change).await?;
        }
        Commands::Delete {
            doc,
            position,
            count,
        } => {
            let change = Change::Delete {
                position,
                num_chars: count,
            };
            edit::run(config, DocId::new(doc), change).await?;
        }
        Commands::Style {
            doc,
            position,
            count,
            style,
            off,
        } => {
            let change = Change::StyleChange {
                style_type: style.into(),
                is_enabling: !off,
                position,
                num_chars: count,
            };
            edit::run(config, DocId::new(doc), change).await?;
        }
        Commands::Show { doc, styled } => show::run(config, doc.map(DocId::new), styled).await?,
        Commands::Watch { doc } => watch::run(config, DocId::new(doc)).await?,
    }

    Ok(())
}
