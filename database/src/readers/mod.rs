pub mod history_reader;

pub use history_reader::{HistoryPage, HistoryReader, QueryError};
