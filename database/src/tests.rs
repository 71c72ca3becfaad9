use crate::*;
use chrono::{TimeZone, Utc};
use types::{
    Difficulty, GameOutcome, HistoryFilter, HistoryQuery, Limit, PlayerRef, PlayerSummary,
    SortSpec,
};

pub async fn setup_test_store() -> SqliteRecordStore {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");

    let store = SqliteRecordStore::new(pool);
    store
        .run_migrations()
        .await
        .expect("Failed to run test migrations");
    store
}

fn outcome(player: &str, difficulty: &str, day: u32, time_taken: i64) -> GameOutcome {
    GameOutcome {
        player_ref: PlayerRef::from(player),
        game_date: Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap(),
        difficulty: Difficulty::from(difficulty),
        completed: true,
        failed: None,
        time_taken,
    }
}

async fn count_rows(store: &SqliteRecordStore) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM game_records")
        .fetch_one(store.pool())
        .await
        .expect("Failed to count records")
}

#[tokio::test]
async fn test_insert_and_find_record() {
    let store = setup_test_store().await;

    let mut game = outcome("u1", "Easy", 1, 45);
    game.failed = Some(0);
    game.completed = false;

    let inserted = store
        .insert_record(&game)
        .await
        .expect("Failed to insert record");
    assert!(inserted.id > 0);

    let found = store
        .find_records(&HistoryQuery::default())
        .await
        .expect("Failed to find records");

    assert_eq!(found, vec![inserted]);
    assert_eq!(found[0].failed, Some(0));
    assert!(!found[0].completed);
    assert_eq!(found[0].game_date, game.game_date);
}

#[tokio::test]
async fn test_identical_payloads_are_stored_twice() {
    let store = setup_test_store().await;
    let game = outcome("u1", "Easy", 1, 45);

    let first = store.insert_record(&game).await.unwrap();
    let second = store.insert_record(&game).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(count_rows(&store).await, 2);
}

#[tokio::test]
async fn test_filters_are_conjunctive() {
    let store = setup_test_store().await;
    store.insert_record(&outcome("u1", "Easy", 1, 10)).await.unwrap();
    store.insert_record(&outcome("u1", "Hard", 2, 10)).await.unwrap();
    store.insert_record(&outcome("u2", "Easy", 3, 10)).await.unwrap();
    store.insert_record(&outcome("u2", "Hard", 4, 10)).await.unwrap();

    let by_player = store
        .find_records(&HistoryQuery::new(HistoryFilter::player("u1")))
        .await
        .unwrap();
    assert_eq!(by_player.len(), 2);
    assert!(by_player.iter().all(|r| r.player_ref.as_str() == "u1"));

    let by_difficulty = store
        .find_records(&HistoryQuery::new(HistoryFilter::difficulty("Hard")))
        .await
        .unwrap();
    assert_eq!(by_difficulty.len(), 2);
    assert!(by_difficulty.iter().all(|r| r.difficulty.as_str() == "Hard"));

    let both = store
        .find_records(&HistoryQuery::new(HistoryFilter {
            player_ref: Some(PlayerRef::from("u2")),
            difficulty: Some(Difficulty::from("Easy")),
        }))
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].player_ref.as_str(), "u2");
    assert_eq!(both[0].difficulty.as_str(), "Easy");

    let nothing = store
        .find_records(&HistoryQuery::new(HistoryFilter::player("nobody")))
        .await
        .unwrap();
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn test_default_sort_is_newest_first() {
    let store = setup_test_store().await;
    for day in [3, 1, 5, 2, 4] {
        store.insert_record(&outcome("u1", "Easy", day, 10)).await.unwrap();
    }

    let found = store.find_records(&HistoryQuery::default()).await.unwrap();
    let dates: Vec<_> = found.iter().map(|r| r.game_date).collect();
    let mut expected = dates.clone();
    expected.sort_by(|a, b| b.cmp(a));

    assert_eq!(dates, expected);
}

#[tokio::test]
async fn test_limit_keeps_most_recent() {
    let store = setup_test_store().await;
    for day in 1..=25 {
        store.insert_record(&outcome("u1", "Easy", day, 10)).await.unwrap();
    }

    let default_page = store.find_records(&HistoryQuery::default()).await.unwrap();
    assert_eq!(default_page.len(), 20);

    let three = store
        .find_records(&HistoryQuery::default().with_limit(Limit::new(3)))
        .await
        .unwrap();
    let days: Vec<u32> = three
        .iter()
        .map(|r| chrono::Datelike::day(&r.game_date))
        .collect();
    assert_eq!(days, vec![25, 24, 23]);
}

#[tokio::test]
async fn test_non_positive_limits() {
    let store = setup_test_store().await;
    for day in 1..=25 {
        store.insert_record(&outcome("u1", "Easy", day, 10)).await.unwrap();
    }

    let unrestricted = store
        .find_records(&HistoryQuery::default().with_limit(Limit::new(0)))
        .await
        .unwrap();
    assert_eq!(unrestricted.len(), 25);

    let negative = store
        .find_records(&HistoryQuery::default().with_limit(Limit::new(-2)))
        .await
        .unwrap();
    assert_eq!(negative.len(), 2);
}

#[tokio::test]
async fn test_explicit_sort_with_ties_in_insertion_order() {
    let store = setup_test_store().await;
    let a = store.insert_record(&outcome("u1", "Easy", 1, 30)).await.unwrap();
    let b = store.insert_record(&outcome("u1", "Easy", 2, 10)).await.unwrap();
    let c = store.insert_record(&outcome("u1", "Easy", 3, 30)).await.unwrap();

    let found = store
        .find_records(&HistoryQuery::default().with_sort(SortSpec::parse("timeTaken")))
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|r| r.id).collect();

    assert_eq!(ids, vec![b.id, a.id, c.id]);
}

#[tokio::test]
async fn test_find_players_in_one_batch() {
    let store = setup_test_store().await;
    store
        .record_player(&PlayerSummary::new("u1", "alice"))
        .await
        .unwrap();
    store
        .record_player(&PlayerSummary::new("u2", "bob"))
        .await
        .unwrap();

    let mut players = store
        .find_players(&[
            PlayerRef::from("u1"),
            PlayerRef::from("u2"),
            PlayerRef::from("ghost"),
        ])
        .await
        .unwrap();
    players.sort_by(|a, b| a.id.cmp(&b.id));

    assert_eq!(
        players,
        vec![PlayerSummary::new("u1", "alice"), PlayerSummary::new("u2", "bob")]
    );
    assert!(store.find_players(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_record_without_player_is_accepted() {
    let store = setup_test_store().await;

    store
        .insert_record(&outcome("deleted-player", "Easy", 1, 10))
        .await
        .expect("records do not require an existing player");

    assert_eq!(count_rows(&store).await, 1);
}

#[tokio::test]
async fn test_closed_pool_reports_unavailable() {
    let store = setup_test_store().await;
    store.pool().close().await;

    let result = store.insert_record(&outcome("u1", "Easy", 1, 10)).await;
    assert!(matches!(result, Err(DatabaseError::Unavailable(_))));

    let result = store.find_records(&HistoryQuery::default()).await;
    assert!(matches!(result, Err(DatabaseError::Unavailable(_))));
}

#[tokio::test]
async fn test_connect_memory_and_sqlite() {
    let memory = DatabaseConfig::resolve(Some("memory".to_string()), None, None);
    let store = connect(&memory).await.expect("Failed to open memory store");
    store.insert_record(&outcome("u1", "Easy", 1, 10)).await.unwrap();
    assert_eq!(store.find_records(&HistoryQuery::default()).await.unwrap().len(), 1);

    let sqlite = DatabaseConfig::default().with_pool_size(2);
    let store = connect(&sqlite).await.expect("Failed to open sqlite store");
    store.insert_record(&outcome("u1", "Easy", 1, 10)).await.unwrap();
    store.insert_record(&outcome("u1", "Easy", 2, 10)).await.unwrap();
    assert_eq!(store.find_records(&HistoryQuery::default()).await.unwrap().len(), 2);
}
