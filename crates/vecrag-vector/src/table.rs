//! Store connection and housekeeping helpers.
//!
//! Opening goes through [`open_db_with_reset`]: a store directory that fails
//! to open is deleted and recreated empty, then opened once more. Recovery is
//! destructive: the whole index is lost, not repaired.

use anyhow::Result;
use lancedb::{connect, Connection};
use std::path::Path;
use tracing::{debug, warn};

pub async fn open_db(uri: &str) -> Result<Connection> {
    Ok(connect(uri).execute().await?)
}

/// Open the persisted store, recovering from an unopenable directory by
/// wiping it. A second open failure propagates.
pub async fn open_db_with_reset(persist_dir: &Path) -> Result<Connection> {
    let uri = persist_dir.to_string_lossy().to_string();
    match connect(&uri).execute().await {
        Ok(conn) => Ok(conn),
        Err(err) => {
            warn!(
                "failed to open vector store at {}, wiping and recreating: {err}",
                persist_dir.display()
            );
            if persist_dir.is_file() {
                let _ = std::fs::remove_file(persist_dir);
            } else {
                let _ = std::fs::remove_dir_all(persist_dir);
            }
            std::fs::create_dir_all(persist_dir)?;
            Ok(connect(&uri).execute().await?)
        }
    }
}

/// Drop all records in the named collection. A collection that does not
/// exist yet is the expected pre-first-index state and is not an error;
/// any other failure propagates.
pub async fn clear_table(conn: &Connection, name: &str) -> Result<()> {
    match conn.drop_table(name, &[]).await {
        Ok(()) => Ok(()),
        Err(lancedb::Error::TableNotFound { .. }) => {
            debug!("clear skipped, collection {name} does not exist yet");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Number of records in the collection; zero if it was never created.
pub async fn count_rows(conn: &Connection, name: &str) -> Result<usize> {
    match conn.open_table(name).execute().await {
        Ok(table) => Ok(table.count_rows(None).await?),
        Err(lancedb::Error::TableNotFound { .. }) => Ok(0),
        Err(err) => Err(err.into()),
    }
}
