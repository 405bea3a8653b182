//! Markdown rendering of library documents.

use crate::library::{Citation, DocEntry};

/// Render one document as a Markdown block.
///
/// Returns `None` for a document without citations; such documents are left
/// out of the notes entirely rather than shown as a bare heading.
pub fn render_block(doc: &DocEntry) -> Option<String> {
    let citations = doc.citations();
    if citations.is_empty() {
        return None;
    }

    let lines: Vec<String> = citations.iter().map(render_citation).collect();
    Some(format!("## {}\n\n{}", doc.title(), lines.join("\n")))
}

/// Render every document that has citations, in input order.
pub fn transform(docs: &[DocEntry]) -> Vec<String> {
    docs.iter().filter_map(render_block).collect()
}

fn render_citation(citation: &Citation) -> String {
    let mut line = format!("- Page {}: {}", citation.page(), citation.body());
    if let Some(extra) = citation.extra() {
        line.push_str("\n  Note: ");
        line.push_str(extra);
    }
    line
}
