use super::RecordStore;
use crate::models::{GameRecordRow, PlayerRow};
use crate::DatabaseError;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use types::{
    GameOutcome, GameRecord, HistoryQuery, PlayerRef, PlayerSummary, SortDirection, SortField,
};

const SELECT_RECORDS: &str = "SELECT id, user_id, game_date, difficulty, completed, failed, time_taken, created_at FROM game_records";

// Stays well below SQLite's bound parameter limit.
const PLAYER_LOOKUP_CHUNK: usize = 500;

pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::GameDate => "game_date",
        SortField::TimeTaken => "time_taken",
        SortField::Difficulty => "difficulty",
        SortField::Completed => "completed",
        SortField::Failed => "failed",
        SortField::CreatedAt => "created_at",
        SortField::PlayerRef => "user_id",
    }
}

fn build_find_records(query: &HistoryQuery) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(SELECT_RECORDS);
    builder.push(" WHERE 1 = 1");

    if let Some(player_ref) = &query.filter.player_ref {
        builder
            .push(" AND user_id = ")
            .push_bind(player_ref.as_str().to_owned());
    }

    if let Some(difficulty) = &query.filter.difficulty {
        builder
            .push(" AND difficulty = ")
            .push_bind(difficulty.as_str().to_owned());
    }

    builder.push(" ORDER BY ");
    for key in query.sort.keys() {
        builder.push(sort_column(key.field));
        builder.push(match key.direction {
            SortDirection::Ascending => " ASC, ",
            SortDirection::Descending => " DESC, ",
        });
    }
    builder.push("id ASC");

    if let Some(cap) = query.limit.cap() {
        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(cap).unwrap_or(i64::MAX));
    }

    builder
}

#[async_trait::async_trait]
impl RecordStore for SqliteRecordStore {
    #[tracing::instrument(skip_all, fields(player = %outcome.player_ref))]
    async fn insert_record(&self, outcome: &GameOutcome) -> Result<GameRecord, DatabaseError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO game_records (user_id, game_date, difficulty, completed, failed, time_taken, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(outcome.player_ref.as_str())
        .bind(outcome.game_date)
        .bind(outcome.difficulty.as_str())
        .bind(outcome.completed)
        .bind(outcome.failed)
        .bind(outcome.time_taken)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(outcome
            .clone()
            .into_record(result.last_insert_rowid(), created_at))
    }

    #[tracing::instrument(skip(self))]
    async fn find_records(&self, query: &HistoryQuery) -> Result<Vec<GameRecord>, DatabaseError> {
        let mut builder = build_find_records(query);
        let rows = builder
            .build_query_as::<GameRecordRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(GameRecord::from).collect())
    }

    #[tracing::instrument(skip_all, fields(ids = ids.len()))]
    async fn find_players(&self, ids: &[PlayerRef]) -> Result<Vec<PlayerSummary>, DatabaseError> {
        let mut players = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(PLAYER_LOOKUP_CHUNK) {
            let mut builder: QueryBuilder<'_, Sqlite> =
                QueryBuilder::new("SELECT id, username FROM players WHERE id IN (");
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(id.as_str());
            }
            separated.push_unseparated(")");

            let rows = builder
                .build_query_as::<PlayerRow>()
                .fetch_all(&self.pool)
                .await?;
            players.extend(rows.into_iter().map(PlayerSummary::from));
        }

        Ok(players)
    }

    async fn record_player(&self, player: &PlayerSummary) -> Result<(), DatabaseError> {
        sqlx::query("INSERT OR IGNORE INTO players (id, username) VALUES (?, ?)")
            .bind(player.id.as_str())
            .bind(&player.username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
