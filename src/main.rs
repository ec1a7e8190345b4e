//! Docfolio - single-user markdown document viewer and editor
//!
//! Loads a fixed set of markdown documents from a directory or a base URL,
//! keeps per-user edits in a local overlay store, and renders documents to
//! HTML through either a hand-rolled converter or a library-backed pipeline.

mod cli;
mod core;
mod render;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging; diagnostics go to stderr so rendered HTML on
    // stdout stays clean.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    cli::run(cli::Cli::parse())
}
