use std::collections::HashMap;

use super::RecordStore;
use crate::DatabaseError;
use chrono::Utc;
use tokio::sync::RwLock;
use types::{GameOutcome, GameRecord, HistoryQuery, PlayerRef, PlayerSummary};

/// Process-local [`RecordStore`] with the same query semantics as the SQLite
/// store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<GameRecord>>,
    players: RwLock<HashMap<PlayerRef, PlayerSummary>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_record(&self, outcome: &GameOutcome) -> Result<GameRecord, DatabaseError> {
        let mut records = self.records.write().await;
        let id = records.last().map_or(1, |record| record.id + 1);
        let record = outcome.clone().into_record(id, Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn find_records(&self, query: &HistoryQuery) -> Result<Vec<GameRecord>, DatabaseError> {
        let mut matching: Vec<GameRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|record| query.filter.matches(record))
            .cloned()
            .collect();

        matching.sort_by(|a, b| query.sort.compare(a, b));
        if let Some(cap) = query.limit.cap() {
            matching.truncate(usize::try_from(cap).unwrap_or(usize::MAX));
        }

        Ok(matching)
    }

    async fn find_players(&self, ids: &[PlayerRef]) -> Result<Vec<PlayerSummary>, DatabaseError> {
        let players = self.players.read().await;
        Ok(ids.iter().filter_map(|id| players.get(id).cloned()).collect())
    }

    async fn record_player(&self, player: &PlayerSummary) -> Result<(), DatabaseError> {
        self.players
            .write()
            .await
            .entry(player.id.clone())
            .or_insert_with(|| player.clone());
        Ok(())
    }
}
