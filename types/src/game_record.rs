use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Difficulty, PlayerRef, PlayerSummary};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,
}

/// A finished game as submitted by the client, before validation.
///
/// Every field is optional here so that a missing field can be told apart from
/// a falsy one: `completed: false` and `timeTaken: 0` are valid submissions.
/// A JSON `null` counts as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGameRecord {
    #[serde(rename = "userID", skip_serializing_if = "Option::is_none")]
    pub player_ref: Option<String>,
    #[serde(rename = "gameDate", skip_serializing_if = "Option::is_none")]
    pub game_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<i64>,
    #[serde(rename = "timeTaken", skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<i64>,
}

impl NewGameRecord {
    pub fn validate(self) -> Result<GameOutcome, ValidationError> {
        let player_ref = self.player_ref.filter(|id| !id.trim().is_empty());
        let difficulty = self.difficulty.filter(|label| !label.is_empty());

        match (
            player_ref,
            self.game_date,
            difficulty,
            self.completed,
            self.time_taken,
        ) {
            (Some(player_ref), Some(game_date), Some(difficulty), Some(completed), Some(time_taken)) => {
                Ok(GameOutcome {
                    player_ref: PlayerRef::from(player_ref),
                    game_date,
                    difficulty: Difficulty::from(difficulty),
                    completed,
                    failed: self.failed,
                    time_taken,
                })
            }
            _ => Err(ValidationError::MissingFields),
        }
    }
}

/// A validated game outcome, ready to be appended to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub player_ref: PlayerRef,
    pub game_date: DateTime<Utc>,
    pub difficulty: Difficulty,
    pub completed: bool,
    pub failed: Option<i64>,
    pub time_taken: i64,
}

impl GameOutcome {
    pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> GameRecord {
        GameRecord {
            id,
            player_ref: self.player_ref,
            game_date: self.game_date,
            difficulty: self.difficulty,
            completed: self.completed,
            failed: self.failed,
            time_taken: self.time_taken,
            created_at,
        }
    }
}

/// A persisted game outcome. Records are append-only and never change after
/// they are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: i64,
    #[serde(rename = "userID")]
    pub player_ref: PlayerRef,
    pub game_date: DateTime<Utc>,
    pub difficulty: Difficulty,
    pub completed: bool,
    pub failed: Option<i64>,
    /// Seconds.
    pub time_taken: i64,
    pub created_at: DateTime<Utc>,
}

/// A record as returned by a history query. `player` is `None` when the
/// referenced player no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: GameRecord,
    pub player: Option<PlayerSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn complete_candidate() -> NewGameRecord {
        NewGameRecord {
            player_ref: Some("u1".to_string()),
            game_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()),
            difficulty: Some("Easy".to_string()),
            completed: Some(true),
            failed: Some(0),
            time_taken: Some(45),
        }
    }

    #[test]
    fn test_complete_candidate_validates() {
        let outcome = complete_candidate().validate().expect("should validate");

        assert_eq!(outcome.player_ref, PlayerRef::from("u1"));
        assert_eq!(outcome.difficulty, Difficulty::from("Easy"));
        assert!(outcome.completed);
        assert_eq!(outcome.failed, Some(0));
        assert_eq!(outcome.time_taken, 45);
    }

    #[test]
    fn test_falsy_values_are_present() {
        let candidate = NewGameRecord {
            completed: Some(false),
            time_taken: Some(0),
            failed: None,
            ..complete_candidate()
        };

        let outcome = candidate.validate().expect("false and 0 are provided values");
        assert!(!outcome.completed);
        assert_eq!(outcome.time_taken, 0);
        assert_eq!(outcome.failed, None);
    }

    #[test]
    fn test_each_missing_required_field_fails() {
        let candidates = [
            NewGameRecord { player_ref: None, ..complete_candidate() },
            NewGameRecord { game_date: None, ..complete_candidate() },
            NewGameRecord { difficulty: None, ..complete_candidate() },
            NewGameRecord { completed: None, ..complete_candidate() },
            NewGameRecord { time_taken: None, ..complete_candidate() },
        ];

        for candidate in candidates {
            assert_eq!(candidate.validate(), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn test_empty_player_ref_and_difficulty_fail() {
        let blank_player = NewGameRecord {
            player_ref: Some("  ".to_string()),
            ..complete_candidate()
        };
        assert_eq!(blank_player.validate(), Err(ValidationError::MissingFields));

        let blank_difficulty = NewGameRecord {
            difficulty: Some(String::new()),
            ..complete_candidate()
        };
        assert_eq!(blank_difficulty.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_unknown_difficulty_is_accepted() {
        let candidate = NewGameRecord {
            difficulty: Some("Nightmare".to_string()),
            ..complete_candidate()
        };

        let outcome = candidate.validate().expect("difficulty is an open label");
        assert!(!outcome.difficulty.is_known());
    }

    #[test]
    fn test_deserialize_treats_null_as_missing() {
        let candidate: NewGameRecord = serde_json::from_value(serde_json::json!({
            "userID": "u1",
            "gameDate": "2024-01-01T10:00:00Z",
            "difficulty": "Easy",
            "completed": null,
            "timeTaken": 10
        }))
        .unwrap();

        assert_eq!(candidate.completed, None);
        assert_eq!(candidate.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_history_entry_serializes_flat() {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 1, 0).unwrap();
        let record = complete_candidate()
            .validate()
            .unwrap()
            .into_record(7, created_at);
        let entry = HistoryEntry {
            record,
            player: Some(PlayerSummary::new("u1", "alice")),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["userID"], "u1");
        assert_eq!(json["player"]["username"], "alice");
        assert_eq!(json["timeTaken"], 45);
        assert_eq!(json["failed"], 0);
        assert!(json.get("gameDate").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
