use std::cmp::Ordering;

use serde::Deserialize;

use crate::{Difficulty, GameRecord, PlayerRef};

/// Raw history query parameters, exactly as they arrive on the query string.
///
/// Nothing is parsed here so that a malformed `limit` or `sort` never rejects
/// the request; [`HistoryQuery::from_params`] applies the fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryParams {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub difficulty: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// Exact-match filters. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub player_ref: Option<PlayerRef>,
    pub difficulty: Option<Difficulty>,
}

impl HistoryFilter {
    pub fn player(player_ref: impl Into<PlayerRef>) -> Self {
        Self {
            player_ref: Some(player_ref.into()),
            difficulty: None,
        }
    }

    pub fn difficulty(difficulty: impl Into<Difficulty>) -> Self {
        Self {
            player_ref: None,
            difficulty: Some(difficulty.into()),
        }
    }

    pub fn matches(&self, record: &GameRecord) -> bool {
        self.player_ref
            .as_ref()
            .map_or(true, |player_ref| &record.player_ref == player_ref)
            && self
                .difficulty
                .as_ref()
                .map_or(true, |difficulty| &record.difficulty == difficulty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    GameDate,
    TimeTaken,
    Difficulty,
    Completed,
    Failed,
    CreatedAt,
    PlayerRef,
}

impl SortField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gameDate" => Some(Self::GameDate),
            "timeTaken" => Some(Self::TimeTaken),
            "difficulty" => Some(Self::Difficulty),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "createdAt" => Some(Self::CreatedAt),
            "userID" => Some(Self::PlayerRef),
            _ => None,
        }
    }

    fn compare(self, a: &GameRecord, b: &GameRecord) -> Ordering {
        match self {
            Self::GameDate => a.game_date.cmp(&b.game_date),
            Self::TimeTaken => a.time_taken.cmp(&b.time_taken),
            Self::Difficulty => a.difficulty.cmp(&b.difficulty),
            Self::Completed => a.completed.cmp(&b.completed),
            // absent counts sort first, as NULLs do in SQLite
            Self::Failed => a.failed.cmp(&b.failed),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::PlayerRef => a.player_ref.cmp(&b.player_ref),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Parses `field`, `+field` or `-field`.
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(name) = token.strip_prefix('-') {
            SortField::from_name(name).map(Self::descending)
        } else {
            let name = token.strip_prefix('+').unwrap_or(token);
            SortField::from_name(name).map(Self::ascending)
        }
    }
}

/// Ordering applied to a history query.
///
/// Records that compare equal on every key keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec(Vec<SortKey>);

impl SortSpec {
    /// Parses the `-gameDate timeTaken` style used on the query string. Keys
    /// may be separated by spaces or commas. Unknown fields are dropped, and
    /// if no usable key is left the default ordering applies.
    pub fn parse(raw: &str) -> Self {
        let keys: Vec<SortKey> = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .filter_map(SortKey::parse)
            .collect();

        if keys.is_empty() {
            Self::default()
        } else {
            Self(keys)
        }
    }

    pub fn new(keys: Vec<SortKey>) -> Self {
        if keys.is_empty() {
            Self::default()
        } else {
            Self(keys)
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn compare(&self, a: &GameRecord, b: &GameRecord) -> Ordering {
        self.0
            .iter()
            .map(|key| match key.direction {
                SortDirection::Ascending => key.field.compare(a, b),
                SortDirection::Descending => key.field.compare(b, a),
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

impl Default for SortSpec {
    /// Most recent game first.
    fn default() -> Self {
        Self(vec![SortKey::descending(SortField::GameDate)])
    }
}

/// Maximum number of records a history query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(i64);

impl Limit {
    pub const DEFAULT: Limit = Limit(20);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parses a caller-supplied limit from its leading integer, so `"5.7"`
    /// reads as 5 and `"12abc"` as 12. Values too large for `i64` saturate.
    /// A missing value, or one without leading digits, falls back to
    /// [`Limit::DEFAULT`].
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(leading_integer)
            .map(Self)
            .unwrap_or(Self::DEFAULT)
    }

    /// `0` means no cap. A negative limit caps at its absolute value.
    pub fn cap(self) -> Option<u64> {
        match self.0 {
            0 => None,
            n => Some(n.unsigned_abs()),
        }
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: Option<i64> = None;
    for digit in rest.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        let shifted = value.unwrap_or(0).saturating_mul(10);
        value = Some(if negative {
            shifted.saturating_sub(digit)
        } else {
            shifted.saturating_add(digit)
        });
    }
    value
}

impl Default for Limit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub filter: HistoryFilter,
    pub sort: SortSpec,
    pub limit: Limit,
}

impl HistoryQuery {
    pub fn new(filter: HistoryFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = limit;
        self
    }

    /// Empty filter values are treated as not provided.
    pub fn from_params(params: HistoryParams) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        Self {
            filter: HistoryFilter {
                player_ref: non_empty(params.user_id).map(PlayerRef::from),
                difficulty: non_empty(params.difficulty).map(Difficulty::from),
            },
            sort: params
                .sort
                .as_deref()
                .map(SortSpec::parse)
                .unwrap_or_default(),
            limit: Limit::parse(params.limit.as_deref()),
        }
    }
}
