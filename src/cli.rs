//! Command line shell
//!
//! The shell around the document service and the renderers: list the set,
//! show a document's current content, render it to HTML, and manage the
//! per-user overlay. Unknown ids surface as user-visible "not found"
//! errors; save failures surface as save-error messages.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::core::config::AppConfig;
use crate::core::service::DocumentService;
use crate::core::source::{DirSource, DocumentSource, HttpSource};
use crate::core::store::OverlayStore;
use crate::render::{Renderer, RendererKind};

#[derive(Parser)]
#[command(name = "docfolio", version, about = "Single-user markdown document viewer and editor")]
pub struct Cli {
    /// Directory containing the document set (overrides the configured source)
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Base URL serving the document set (overrides the configured source)
    #[arg(long, value_name = "URL", global = true, conflicts_with = "root")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the available documents
    List,
    /// Print a document's current markdown content
    Show { id: String },
    /// Render a document to HTML
    Render {
        id: String,
        /// Rendering pipeline to use
        #[arg(long, value_parser = ["custom", "library"])]
        renderer: Option<String>,
        /// Write the HTML to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Save edited content for a document from a file
    Save { id: String, file: PathBuf },
    /// Discard saved edits and restore the original content
    Reset { id: String },
    /// Persist the current --root/--base-url override as the default source
    SetSource,
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(root) = cli.root {
        config.source.root = Some(root);
        config.source.base_url = None;
    }
    if let Some(url) = cli.base_url {
        config.source.base_url = Some(url);
        config.source.root = None;
    }

    if let Command::SetSource = cli.command {
        config.save()?;
        println!("configuration saved");
        return Ok(());
    }

    if let Some(ref url) = config.source.base_url {
        if config.source.files.is_empty() {
            bail!("a base URL source needs an explicit file list in the configuration");
        }
        let source = HttpSource::new(url.clone(), config.source.files.clone());
        dispatch(source, &config, cli.command)
    } else if let Some(ref root) = config.source.root {
        let source = DirSource::new(root.clone()).with_files(config.source.files.clone());
        dispatch(source, &config, cli.command)
    } else {
        let source = DirSource::new(std::env::current_dir()?)
            .with_files(config.source.files.clone());
        dispatch(source, &config, cli.command)
    }
}

fn dispatch<S: DocumentSource>(source: S, config: &AppConfig, command: Command) -> Result<()> {
    let overlay_path = AppConfig::overlay_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let store = OverlayStore::open(overlay_path)?;
    let mut service = DocumentService::open(source, store)?;

    match command {
        Command::List => {
            for doc in service.documents() {
                let marker = if service.is_edited(&doc.id) { " (edited)" } else { "" };
                println!("{}  {}{}", doc.id, doc.title, marker);
            }
        }
        Command::Show { id } => {
            let doc = service.get(&id)?;
            println!("{}", doc.content);
        }
        Command::Render { id, renderer, out } => {
            let name = renderer.unwrap_or_else(|| config.renderer.variant.clone());
            let kind = RendererKind::from_name(&name)
                .with_context(|| format!("unknown renderer variant: {name}"))?;
            let renderer = Renderer::new(kind);

            let doc = service.get(&id)?;
            let html = renderer.render(&doc.content);
            match out {
                Some(path) => {
                    fs::write(&path, html.into_string())
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!("wrote {}", path.display());
                }
                None => println!("{html}"),
            }
        }
        Command::Save { id, file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            service
                .save(&id, &content)
                .with_context(|| format!("failed to save document {id}"))?;
            println!("saved {id}");
        }
        Command::Reset { id } => {
            service.reset(&id)?;
            println!("reset {id}");
        }
        Command::SetSource => unreachable!("handled before source construction"),
    }

    Ok(())
}
