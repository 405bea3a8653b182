//! The `library.json` document.
//!
//! Every field the notes are built from is optional in the backup format.
//! The structs keep them as `Option`s and the accessor methods apply the
//! display defaults, so nothing downstream ever sees a missing value.

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

use crate::error::{ConvertError, Result};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_BODY: &str = "(empty)";
pub const DEFAULT_PAGE: &str = "?";

/// Top-level `library.json` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryFile {
    #[serde(default)]
    docs: Option<Vec<Option<DocEntry>>>,
}

impl LibraryFile {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The document list. A `null` element stands for an entry with no fields.
    pub fn into_docs(self) -> Result<Vec<DocEntry>> {
        let docs = self.docs.ok_or(ConvertError::MissingDocs)?;
        Ok(docs.into_iter().map(Option::unwrap_or_default).collect())
    }
}

/// One document. `data` and the text fields stay untyped: older exports
/// store numbers or strings where newer ones have objects, and a bad field
/// only ever costs that field its value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocEntry {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub citations: Option<Vec<Citation>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub note_body: Option<Value>,
    #[serde(default)]
    pub note_page: Option<Value>,
    #[serde(default)]
    pub note_extra: Option<String>,
}

impl DocEntry {
    /// `data.doc_title`, or `Untitled` when `data` is not an object or the
    /// title is blank-ish (`null`, `""`, `0`, `false`).
    pub fn title(&self) -> Cow<'_, str> {
        self.data
            .as_ref()
            .and_then(|data| data.as_object())
            .and_then(|data| data.get("doc_title"))
            .and_then(present_text)
            .unwrap_or(Cow::Borrowed(DEFAULT_TITLE))
    }

    pub fn citations(&self) -> &[Citation] {
        self.citations.as_deref().unwrap_or_default()
    }
}

impl Citation {
    pub fn body(&self) -> Cow<'_, str> {
        self.note_body
            .as_ref()
            .and_then(present_text)
            .unwrap_or(Cow::Borrowed(DEFAULT_BODY))
    }

    /// Page label. Only a missing or `null` page falls back to `?`; an empty
    /// string or `0` is kept as is.
    pub fn page(&self) -> Cow<'_, str> {
        match &self.note_page {
            None | Some(Value::Null) => Cow::Borrowed(DEFAULT_PAGE),
            Some(value) => value_text(value),
        }
    }

    /// The secondary note, if it has any non-whitespace content.
    pub fn extra(&self) -> Option<&str> {
        self.note_extra
            .as_deref()
            .filter(|extra| !extra.trim().is_empty())
    }
}

/// Text of a value that counts as filled in. `null`, `false`, `0` and the
/// empty string do not; everything else does.
fn present_text(value: &Value) -> Option<Cow<'_, str>> {
    let filled = match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    };
    filled.then(|| value_text(value))
}

/// Display text of a value: strings verbatim, numbers in plain decimal,
/// anything else as compact JSON.
fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Number(n) => Cow::Owned(format_number(n)),
        other => Cow::Owned(other.to_string()),
    }
}

/// Whole-valued floats print without a fraction or exponent, so `3.0` reads
/// as page `3` and `1e20` as `100000000000000000000`.
fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}
