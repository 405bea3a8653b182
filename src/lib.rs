//! # citemd
//!
//! Turns the citations stored in a reading app's library backup into
//! Markdown notes, one section per document.
//!
//! A backup is a ZIP archive, often renamed to `.bak`, holding a single
//! `library.json`. Conversion runs in three steps:
//!
//! 1. [`decoder`] opens the bytes as a ZIP regardless of the file name and
//!    extracts the text of `library.json`
//! 2. [`library`] parses it into documents and citations, filling in
//!    defaults for every missing field
//! 3. [`render`] turns each document with citations into a Markdown block
//!
//! [`pipeline`] strings the steps together behind a file-name check and
//! reports any failure as a single line of text.
//!
//! ## Example
//!
//! ```no_run
//! use citemd::{InputFile, Pipeline, render_output};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bytes = std::fs::read("reader-2024-05-01.bak")?;
//!
//!     let mut pipeline = Pipeline::new();
//!     pipeline.run(InputFile::new("reader-2024-05-01.bak", bytes)).await;
//!     println!("{}", render_output(&pipeline.output_lines()));
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod decoder;
pub mod error;
pub mod io;
pub mod library;
pub mod pipeline;
pub mod render;
pub mod zip;

pub use cli::Cli;
pub use decoder::{LIBRARY_ENTRY, decode};
pub use error::{ConvertError, ErrorKind};
pub use io::{ArchiveBuffer, ReadAt};
pub use library::{Citation, DocEntry, LibraryFile};
pub use pipeline::{InputFile, Pipeline, PipelineState, render_output};
pub use render::{render_block, transform};
pub use zip::{ZipExtractor, ZipFileEntry};
