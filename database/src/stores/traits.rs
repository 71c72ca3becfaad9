use async_trait::async_trait;
use types::{GameOutcome, GameRecord, HistoryQuery, PlayerRef, PlayerSummary};

use crate::DatabaseError;

/// Durable storage for game records and the player projection used to enrich
/// them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends one record. Either the whole record is stored or nothing is.
    async fn insert_record(&self, outcome: &GameOutcome) -> Result<GameRecord, DatabaseError>;

    /// Returns the records matching every filter in `query`, sorted and capped.
    async fn find_records(&self, query: &HistoryQuery) -> Result<Vec<GameRecord>, DatabaseError>;

    /// Looks up many players at once. Unknown ids are left out of the result.
    async fn find_players(&self, ids: &[PlayerRef]) -> Result<Vec<PlayerSummary>, DatabaseError>;

    async fn record_player(&self, player: &PlayerSummary) -> Result<(), DatabaseError>;
}
