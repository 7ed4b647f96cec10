use anyhow::Result;
use arrow_array::{Array, Float32Array, Int32Array, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::Connection;

use vecrag_core::types::Hit;

/// Return up to `k` chunks nearest to `query_vec`, ordered by ascending
/// distance as reported by the store. A collection that does not exist yet
/// is an empty result, not an error. No relevance threshold is applied.
pub async fn nearest_chunks(
    conn: &Connection,
    table_name: &str,
    query_vec: &[f32],
    k: usize,
) -> Result<Vec<Hit>> {
    let table = match conn.open_table(table_name).execute().await {
        Ok(table) => table,
        Err(lancedb::Error::TableNotFound { .. }) => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut stream = table.vector_search(query_vec.to_vec())?.limit(k).execute().await?;
    let mut hits = Vec::new();
    while let Some(batch) = stream.try_next().await? {
        for i in 0..batch.num_rows() {
            let source = string_value(&batch, "source", i)?;
            let text = string_value(&batch, "content", i)?;
            let chunk_index = batch
                .column_by_name("chunk_index")
                .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
                .map(|a| a.value(i))
                .ok_or_else(|| anyhow::anyhow!("chunk_index column missing"))?;
            let distance = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .map(|a| a.value(i))
                .unwrap_or(f32::INFINITY);
            hits.push(Hit { text, source, chunk_index: chunk_index as usize, distance });
        }
    }

    hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(k);
    Ok(hits)
}

fn string_value(batch: &arrow_array::RecordBatch, column: &str, row: usize) -> Result<String> {
    batch
        .column_by_name(column)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .map(|a| a.value(row).to_string())
        .ok_or_else(|| anyhow::anyhow!("{column} column missing"))
}
