//! Conversion failures.
//!
//! Every failure ends the conversion of the current file. Callers show
//! [`ConvertError::user_message`]; the `Display` text carries the technical
//! detail and is what gets logged.

use thiserror::Error;

/// Shown for every archive or decode failure except a missing entry.
pub const READ_FAILED_MESSAGE: &str = "Failed to unzip or read library.json";

/// Shown when the archive opens but has no `library.json`.
pub const NOT_FOUND_MESSAGE: &str = "library.json not found in archive.";

/// Shown when the file name has neither accepted suffix.
pub const UNSUPPORTED_TYPE_MESSAGE: &str =
    "Unsupported file type. Only .zip or disguised .bak accepted.";

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// File name does not end in `.zip` or `.bak`
    #[error("unsupported file type: {file_name}")]
    UnsupportedType { file_name: String },

    /// Archive is readable but has no `library.json` entry
    #[error("library.json not found in archive")]
    NotFound,

    /// Not a zip archive, or the entry could not be extracted
    #[error("corrupt archive: {reason}")]
    Corrupt { reason: String },

    /// Entry text is not valid JSON or does not match the library shape
    #[error("library.json could not be parsed: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed document has no `docs` list
    #[error("library.json has no docs list")]
    MissingDocs,
}

/// Coarse failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedType,
    Archive,
    Decode,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            // A library without docs is treated as a damaged archive
            ConvertError::NotFound | ConvertError::Corrupt { .. } | ConvertError::MissingDocs => {
                ErrorKind::Archive
            }
            ConvertError::Json(_) => ErrorKind::Decode,
        }
    }

    /// The single line displayed in place of the converted notes.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConvertError::UnsupportedType { .. } => UNSUPPORTED_TYPE_MESSAGE,
            ConvertError::NotFound => NOT_FOUND_MESSAGE,
            _ => READ_FAILED_MESSAGE,
        }
    }

    pub(crate) fn corrupt(err: anyhow::Error) -> Self {
        ConvertError::Corrupt {
            reason: format!("{:#}", err),
        }
    }
}
