pub mod record_writer;

pub use record_writer::{PersistenceError, RecordWriter, SaveReceipt, WriteError};
