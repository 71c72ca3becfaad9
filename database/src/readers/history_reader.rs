use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use types::{HistoryEntry, HistoryQuery, PlayerRef};

use crate::{DatabaseError, RecordStore};

/// The store failed to run a history query.
#[derive(Error, Debug)]
#[error("Error fetching game history")]
pub struct QueryError {
    #[source]
    source: DatabaseError,
}

impl QueryError {
    pub fn new(source: DatabaseError) -> Self {
        Self { source }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn detail(&self) -> &DatabaseError {
        &self.source
    }
}

/// One page of history. `count` is the size of this page, not the number of
/// matching records in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryPage {
    pub count: usize,
    #[serde(rename = "data")]
    pub records: Vec<HistoryEntry>,
}

impl HistoryPage {
    pub fn empty() -> Self {
        Self {
            count: 0,
            records: Vec::new(),
        }
    }
}

pub struct HistoryReader<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for HistoryReader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore + ?Sized> HistoryReader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Runs the query and attaches each record's player. Players are fetched
    /// with a single lookup for the whole page.
    #[tracing::instrument(skip(self))]
    pub async fn query(&self, query: HistoryQuery) -> Result<HistoryPage, QueryError> {
        let records = self.store.find_records(&query).await.map_err(|error| {
            tracing::error!(%error, "error fetching game history");
            QueryError::new(error)
        })?;

        if records.is_empty() {
            return Ok(HistoryPage::empty());
        }

        let player_refs: Vec<PlayerRef> = records
            .iter()
            .map(|record| record.player_ref.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let players: HashMap<PlayerRef, _> = self
            .store
            .find_players(&player_refs)
            .await
            .map_err(|error| {
                tracing::error!(%error, "error resolving players for game history");
                QueryError::new(error)
            })?
            .into_iter()
            .map(|player| (player.id.clone(), player))
            .collect();

        let records: Vec<HistoryEntry> = records
            .into_iter()
            .map(|record| {
                let player = players.get(&record.player_ref).cloned();
                HistoryEntry { record, player }
            })
            .collect();

        tracing::debug!(count = records.len(), "fetched game history");
        Ok(HistoryPage {
            count: records.len(),
            records,
        })
    }
}
