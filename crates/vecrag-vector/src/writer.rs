use anyhow::Result;
use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray};
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::Connection;
use std::sync::Arc;

use crate::schema::{build_arrow_schema, EMBEDDING_DIM};
use vecrag_core::types::Chunk;

const WRITE_BATCH: usize = 1000;

/// Submit chunks and their embeddings to the collection in batches. The
/// caller is expected to have cleared the collection first; ids are the
/// deterministic `<source>::chunk<idx>` form, so a clear-then-upsert rebuild
/// always lands on the same id set.
pub async fn upsert_chunks(
    conn: &Connection,
    table_name: &str,
    chunks: &[Chunk],
    embeddings: &[Vec<f32>],
) -> Result<()> {
    if chunks.is_empty() {
        return Ok(());
    }
    assert_eq!(chunks.len(), embeddings.len(), "chunks and embeddings length must match");

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    for (batch_chunks, batch_embeddings) in
        chunks.chunks(WRITE_BATCH).zip(embeddings.chunks(WRITE_BATCH))
    {
        let record_batch = chunks_to_record_batch(batch_chunks, batch_embeddings)?;
        insert_batch(conn, table_name, record_batch).await?;
        pb.inc(batch_chunks.len() as u64);
    }
    pb.finish_with_message("indexing complete");
    tracing::info!("stored {} chunks in collection {table_name}", chunks.len());
    Ok(())
}

async fn insert_batch(conn: &Connection, table_name: &str, record_batch: RecordBatch) -> Result<()> {
    let schema = record_batch.schema();
    let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
    if conn.table_names().execute().await?.contains(&table_name.to_string()) {
        conn.open_table(table_name).execute().await?.add(reader).execute().await?;
    } else {
        conn.create_table(table_name, reader).execute().await?;
    }
    Ok(())
}

fn chunks_to_record_batch(chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<RecordBatch> {
    let schema = build_arrow_schema();
    let mut ids = Vec::new();
    let mut sources = Vec::new();
    let mut chunk_indices = Vec::new();
    let mut contents = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
        ids.push(chunk.record_id());
        sources.push(chunk.source.clone());
        chunk_indices.push(chunk.idx as i32);
        contents.push(chunk.text.clone());
        vectors.push(Some(embedding.iter().map(|&x| Some(x)).collect()));
    }
    let record_batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(sources)),
            Arc::new(Int32Array::from(chunk_indices)),
            Arc::new(StringArray::from(contents)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                vectors.into_iter(),
                EMBEDDING_DIM,
            )),
        ],
    )?;
    Ok(record_batch)
}
