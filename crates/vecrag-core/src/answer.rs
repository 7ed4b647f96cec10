//! Deterministic rendering of retrieved chunks, no generation involved.

use crate::types::Hit;

pub const NO_CONTEXT_MESSAGE: &str = "No relevant context found in your documents.";

const SNIPPET_CHARS: usize = 280;

/// Render retrieved hits into a human-readable summary.
///
/// Pure and deterministic: the output depends only on `hits`. An empty hit
/// list returns the fixed no-context message; otherwise each hit becomes one
/// numbered line showing `source#chunk<idx>` and the first 280 characters of
/// its text with internal newlines collapsed to spaces.
pub fn naive_answer(_query: &str, hits: &[Hit]) -> String {
    if hits.is_empty() {
        return NO_CONTEXT_MESSAGE.to_string();
    }

    let mut lines = vec!["Top retrieved context (read these as supporting evidence):".to_string()];
    for (i, hit) in hits.iter().enumerate() {
        let snippet: String = hit
            .text
            .chars()
            .take(SNIPPET_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        lines.push(format!("{}. [{}#chunk{}] {}...", i + 1, hit.source, hit.chunk_index, snippet));
    }
    lines.join("\n")
}
