//! Character-windowed chunking with controlled overlap.

use crate::error::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 900;
pub const DEFAULT_OVERLAP: usize = 150;

/// Window parameters for [`chunk_text`], in characters.
#[derive(Debug, Clone, Copy)]
pub struct ChunkParams {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self { size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_OVERLAP }
    }
}

impl ChunkParams {
    /// Build parameters from user input, rejecting combinations that would
    /// stall the window advance. `chunk_text` itself does not re-check this;
    /// `overlap < size` is its precondition.
    pub fn validated(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("chunk size must be positive".to_string()));
        }
        if overlap >= size {
            return Err(Error::InvalidConfig(format!(
                "overlap {overlap} must be smaller than chunk size {size}"
            )));
        }
        Ok(Self { size, overlap })
    }
}

/// Collapse the input to single-newline separated, trimmed, non-empty lines.
pub fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split normalized text into fixed-size windows of `params.size` characters,
/// each overlapping the previous by `params.overlap`. The final window may be
/// shorter. Empty input yields no chunks; input at most one window long
/// yields exactly one.
pub fn chunk_text(text: &str, params: &ChunkParams) -> Vec<String> {
    let normalized = normalize(text);
    let chars: Vec<char> = normalized.chars().collect();
    let n = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < n {
        let end = (start + params.size).min(n);
        chunks.push(chars[start..end].iter().collect());
        if end == n {
            break;
        }
        start = end.saturating_sub(params.overlap);
    }
    chunks
}
