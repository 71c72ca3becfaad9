use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Difficulty label of a game.
///
/// The label set is open: any non-empty label is stored as given. [`KNOWN`]
/// only lists the labels the game client currently produces.
///
/// [`KNOWN`]: Difficulty::KNOWN
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(String);

impl Difficulty {
    pub const KNOWN: [&'static str; 3] = ["Easy", "Normal", "Hard"];

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Difficulty {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Difficulty {
    fn from(label: String) -> Self {
        Self(label)
    }
}
