//! Main entry point for the citemd CLI application.
//!
//! Reads one backup archive from disk, converts it, and prints the notes
//! (or the single diagnostic line) to stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::warn;

use citemd::decoder::{format_listing, list_entries};
use citemd::{ArchiveBuffer, Cli, InputFile, Pipeline, render_output};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    // clap guarantees at least one file
    let (path, ignored) = cli
        .files
        .split_first()
        .context("no input file given")?;
    if !ignored.is_empty() {
        warn!(ignored = ignored.len(), "only the first file is converted");
    }

    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if cli.list {
        let entries = list_entries(ArchiveBuffer::from(contents))
            .await
            .context("Failed to read archive")?;
        for line in format_listing(&entries) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut pipeline = Pipeline::new();
    pipeline
        .run(InputFile::new(display_name(path), contents))
        .await;

    let output = render_output(&pipeline.output_lines());
    if !output.is_empty() {
        println!("{}", output);
    }

    if pipeline.state().is_failed() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// The name the suffix check sees: the final path component.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
