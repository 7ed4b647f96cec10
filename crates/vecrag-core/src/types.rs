//! Domain types shared by the indexing and retrieval pipelines.

use serde::{Deserialize, Serialize};

/// A bounded substring of a source document, the unit of indexing.
///
/// - `text`: the chunk payload after normalization
/// - `source`: path of the source file relative to the indexed folder
/// - `idx`: position of the chunk within its source file
///
/// A chunk is uniquely identified by `(source, idx)`; the derived
/// [`record_id`](Chunk::record_id) is stable across rebuilds of the same
/// folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source: String,
    pub idx: usize,
}

impl Chunk {
    /// Deterministic store id: `<source>::chunk<idx>`.
    pub fn record_id(&self) -> String {
        format!("{}::chunk{}", self.source, self.idx)
    }
}

/// A single retrieval result pairing a chunk with its distance to the query.
///
/// `distance` is the vector store's native metric, smaller is more similar.
/// Hits are ephemeral; they are produced per retrieval call and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    pub text: String,
    pub source: String,
    pub chunk_index: usize,
    pub distance: f32,
}
