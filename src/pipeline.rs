//! Conversion of one uploaded file into Markdown notes.
//!
//! A [`Pipeline`] holds the result of the most recent run and moves through
//! `Idle -> Decoding -> Parsing -> Rendered`, or into `Failed` from any step.
//! Each run replaces whatever the previous one produced.

use tracing::{debug, info, warn};

use crate::decoder;
use crate::error::{ConvertError, Result};
use crate::io::ArchiveBuffer;
use crate::library::LibraryFile;
use crate::render;

/// Name suffixes accepted for upload. The check is case-sensitive.
pub const ACCEPTED_SUFFIXES: &[&str] = &[".zip", ".bak"];

/// One file handed over by the host, with the name it arrived under.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub contents: ArchiveBuffer,
}

impl InputFile {
    pub fn new(name: impl Into<String>, contents: impl Into<ArchiveBuffer>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Decoding,
    Parsing,
    Rendered(Vec<String>),
    Failed(ConvertError),
}

impl PipelineState {
    /// Whether the last run ended in a failure; the CLI exits non-zero then.
    pub fn is_failed(&self) -> bool {
        matches!(self, PipelineState::Failed(_))
    }

    fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Decoding => "decoding",
            PipelineState::Parsing => "parsing",
            PipelineState::Rendered(_) => "rendered",
            PipelineState::Failed(_) => "failed",
        }
    }
}

/// Whether the file name carries one of the accepted suffixes.
///
/// Only a gate: accepted files are still parsed as ZIP by content.
pub fn has_accepted_suffix(file_name: &str) -> bool {
    ACCEPTED_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
}

#[derive(Debug, Default)]
pub struct Pipeline {
    state: PipelineState,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Convert the first of `files`. Any further files are ignored, and an
    /// empty selection leaves the pipeline as it was.
    pub async fn submit(&mut self, files: Vec<InputFile>) -> &PipelineState {
        let mut files = files.into_iter();
        let Some(file) = files.next() else {
            return &self.state;
        };

        let ignored = files.count();
        if ignored > 0 {
            warn!(ignored, "only the first file is converted");
        }

        self.run(file).await
    }

    /// Convert a single file, replacing the previous result.
    pub async fn run(&mut self, file: InputFile) -> &PipelineState {
        info!(file = %file.name, size = file.contents.as_bytes().len(), "converting");

        let outcome = self.convert(file).await;
        let state = match outcome {
            Ok(blocks) => {
                info!(blocks = blocks.len(), "rendered");
                PipelineState::Rendered(blocks)
            }
            Err(err) => {
                warn!(error = %err, "conversion failed");
                PipelineState::Failed(err)
            }
        };
        self.transition(state);
        &self.state
    }

    async fn convert(&mut self, file: InputFile) -> Result<Vec<String>> {
        if !has_accepted_suffix(&file.name) {
            return Err(ConvertError::UnsupportedType {
                file_name: file.name,
            });
        }

        self.transition(PipelineState::Decoding);
        let text = decoder::decode(file.contents).await?;

        self.transition(PipelineState::Parsing);
        let docs = LibraryFile::from_json(&text)?.into_docs()?;
        debug!(docs = docs.len(), "parsed library");

        Ok(render::transform(&docs))
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = self.state.name(), to = next.name(), "state change");
        self.state = next;
    }

    /// Lines to display: the rendered blocks, a single diagnostic after a
    /// failure, or nothing before the first run.
    pub fn output_lines(&self) -> Vec<String> {
        match &self.state {
            PipelineState::Rendered(blocks) => blocks.clone(),
            PipelineState::Failed(err) => vec![err.user_message().to_string()],
            _ => Vec::new(),
        }
    }
}

/// Join output lines for display, one blank line between blocks.
pub fn render_output(lines: &[String]) -> String {
    lines.join("\n\n")
}
