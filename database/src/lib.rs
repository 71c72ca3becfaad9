pub mod config;
pub mod error;
pub mod models;
pub mod readers;
pub mod stores;
pub mod writers;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use config::DatabaseConfig;
pub use error::DatabaseError;
pub use readers::{HistoryPage, HistoryReader, QueryError};
pub use stores::{MemoryRecordStore, RecordStore, SqliteRecordStore};
pub use writers::{PersistenceError, RecordWriter, SaveReceipt, WriteError};

/// Opens the store named by `config`, applying migrations when it is SQLite.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn RecordStore>, DatabaseError> {
    if config.is_memory_store() {
        tracing::info!("using in-process memory record store");
        return Ok(Arc::new(MemoryRecordStore::new()));
    }

    let pool = config.create_pool().await?;
    let store = SqliteRecordStore::new(pool);
    store.run_migrations().await?;
    tracing::info!(url = %config.url, "connected to sqlite record store");
    Ok(Arc::new(store))
}
