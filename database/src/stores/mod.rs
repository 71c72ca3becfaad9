pub mod memory_store;
pub mod sqlite_store;
pub mod traits;

pub use memory_store::MemoryRecordStore;
pub use sqlite_store::SqliteRecordStore;
pub use traits::RecordStore;
