use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Identifier of the player that produced a game record.
///
/// Players are owned by the authentication service, so this is an opaque
/// string and is never checked against the player store on write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRef(String);

impl PlayerRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The slice of a player that history entries are enriched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerRef,
    pub username: String,
}

impl PlayerSummary {
    pub fn new(id: impl Into<PlayerRef>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}
