use chrono::{DateTime, Utc};
use types::{Difficulty, GameRecord, PlayerRef, PlayerSummary};

/// Row shape of the `game_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameRecordRow {
    pub id: i64,
    pub user_id: String,
    pub game_date: DateTime<Utc>,
    pub difficulty: String,
    pub completed: bool,
    pub failed: Option<i64>,
    pub time_taken: i64,
    pub created_at: DateTime<Utc>,
}

impl From<GameRecordRow> for GameRecord {
    fn from(row: GameRecordRow) -> Self {
        GameRecord {
            id: row.id,
            player_ref: PlayerRef::from(row.user_id),
            game_date: row.game_date,
            difficulty: Difficulty::from(row.difficulty),
            completed: row.completed,
            failed: row.failed,
            time_taken: row.time_taken,
            created_at: row.created_at,
        }
    }
}

/// The `players` columns needed for enrichment.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlayerRow {
    pub id: String,
    pub username: String,
}

impl From<PlayerRow> for PlayerSummary {
    fn from(row: PlayerRow) -> Self {
        PlayerSummary::new(row.id, row.username)
    }
}
