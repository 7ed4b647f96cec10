//! File loading with markup stripping for HTML-like extensions.

use anyhow::Result;
use scraper::Html;
use std::fs;
use std::path::Path;

/// Load a file's textual content as a single string.
///
/// `.html`/`.htm` files are parsed and reduced to their visible text with
/// block boundaries as newlines; every other extension is returned as raw
/// decoded content. Invalid byte sequences are replaced rather than failing;
/// a missing or unreadable file propagates its I/O error to the caller.
pub fn read_file(path: &Path) -> Result<String> {
    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => String::from_utf8_lossy(&fs::read(path)?).to_string(),
    };

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => Ok(visible_text(&raw)),
        _ => Ok(raw),
    }
}

/// Extract the visible text of an HTML document, one text fragment per line.
pub fn visible_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut lines = Vec::new();
    for fragment in document.root_element().text() {
        let fragment = fragment.trim();
        if !fragment.is_empty() {
            lines.push(fragment);
        }
    }
    lines.join("\n")
}
