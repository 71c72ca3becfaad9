pub mod difficulty;
pub mod game_record;
pub mod player;
pub mod query;

pub use difficulty::Difficulty;
pub use game_record::{GameOutcome, GameRecord, HistoryEntry, NewGameRecord, ValidationError};
pub use player::{PlayerRef, PlayerSummary};
pub use query::{
    HistoryFilter, HistoryParams, HistoryQuery, Limit, SortDirection, SortField, SortKey, SortSpec,
};
