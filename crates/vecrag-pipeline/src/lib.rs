//! The indexing + retrieval pipeline behind the presentation layer.
//!
//! `VectorRag` holds the embedding model and the store connection as lazily
//! initialized, memoized instance state: neither is touched until the first
//! call that needs it, and both live as long as the instance. Each entry
//! point runs to completion; there is no background work, cancellation, or
//! timeout handling here.

use anyhow::Result;
use lancedb::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

use vecrag_core::chunker::{chunk_text, ChunkParams};
use vecrag_core::reader::read_file;
use vecrag_core::traits::Embedder;
use vecrag_core::types::{Chunk, Hit};
use vecrag_core::walk::{list_files, DEFAULT_EXTENSIONS};
use vecrag_embed::get_default_embedder;
use vecrag_vector::{clear_table, nearest_chunks, open_db_with_reset, upsert_chunks};

pub use vecrag_core::answer::naive_answer;

pub const DEFAULT_DB_DIR: &str = "./rag_db";
pub const DEFAULT_TABLE: &str = "documents";

pub struct VectorRag {
    persist_dir: PathBuf,
    table_name: String,
    chunking: ChunkParams,
    embedder: Option<Box<dyn Embedder>>,
    conn: Option<Connection>,
}

impl VectorRag {
    pub fn new(persist_dir: impl Into<PathBuf>, table_name: impl Into<String>) -> Self {
        Self {
            persist_dir: persist_dir.into(),
            table_name: table_name.into(),
            chunking: ChunkParams::default(),
            embedder: None,
            conn: None,
        }
    }

    pub fn with_chunking(mut self, chunking: ChunkParams) -> Self {
        self.chunking = chunking;
        self
    }

    fn embedder(&mut self) -> Result<&dyn Embedder> {
        if let Some(ref embedder) = self.embedder {
            return Ok(embedder.as_ref());
        }
        let embedder = self.embedder.insert(get_default_embedder()?);
        Ok(&**embedder)
    }

    async fn connection(&mut self) -> Result<&Connection> {
        if let Some(ref conn) = self.conn {
            return Ok(conn);
        }
        let conn = self.conn.insert(open_db_with_reset(&self.persist_dir).await?);
        Ok(conn)
    }

    /// Full reindex of `data_dir` using the default recognized extensions.
    pub async fn index_folder(&mut self, data_dir: &Path) -> Result<usize> {
        self.index_folder_with_exts(data_dir, DEFAULT_EXTENSIONS).await
    }

    /// Walk `data_dir`, chunk every matching file, then clear the collection
    /// and submit all chunks with their embeddings in one pass. Returns the
    /// number of chunks indexed; zero means no file matched and the store was
    /// left untouched. Not transactional: a mid-batch failure leaves the
    /// collection in whatever state the store kept.
    pub async fn index_folder_with_exts(&mut self, data_dir: &Path, exts: &[&str]) -> Result<usize> {
        let files = list_files(data_dir, exts);

        let mut chunks: Vec<Chunk> = Vec::new();
        for path in &files {
            let content = read_file(path)?;
            let source = path.strip_prefix(data_dir).unwrap_or(path).to_string_lossy().to_string();
            for (idx, text) in chunk_text(&content, &self.chunking).into_iter().enumerate() {
                chunks.push(Chunk { text, source: source.clone(), idx });
            }
        }
        if chunks.is_empty() {
            return Ok(0);
        }
        info!("indexing {} chunks from {} files under {}", chunks.len(), files.len(), data_dir.display());

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder()?.embed_batch(&texts)?;

        let table_name = self.table_name.clone();
        let conn = self.connection().await?;
        clear_table(conn, &table_name).await?;
        upsert_chunks(conn, &table_name, &chunks, &embeddings).await?;
        Ok(chunks.len())
    }

    /// Embed the query and return up to `k` hits, nearest first. An empty or
    /// never-built collection yields an empty list rather than an error.
    pub async fn retrieve(&mut self, query: &str, k: usize) -> Result<Vec<Hit>> {
        let query_vec = self.embedder()?.embed_batch(&[query.to_string()])?.remove(0);
        let table_name = self.table_name.clone();
        let conn = self.connection().await?;
        nearest_chunks(conn, &table_name, &query_vec, k).await
    }
}
