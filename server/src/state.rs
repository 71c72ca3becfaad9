use std::sync::Arc;

use database::{HistoryReader, RecordStore, RecordWriter};

/// Shared by every handler. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub writer: RecordWriter<dyn RecordStore>,
    pub reader: HistoryReader<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            writer: RecordWriter::new(Arc::clone(&store)),
            reader: HistoryReader::new(store),
        }
    }
}
