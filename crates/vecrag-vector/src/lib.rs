//! LanceDB-backed vector index: one table of chunk records with their
//! embeddings, nearest-neighbor search by the store's native distance.

pub mod schema;
pub mod search;
pub mod table;
pub mod writer;

pub use search::nearest_chunks;
pub use table::{clear_table, count_rows, open_db, open_db_with_reset};
pub use writer::upsert_chunks;
