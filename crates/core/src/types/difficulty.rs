//! Question difficulty tag.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known [`Difficulty`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("difficulty must be one of Easy, Medium, Hard (got {0:?})")]
pub struct DifficultyError(pub String);

/// How hard the asker considers a question to be.
///
/// Serialized with the capitalized labels the client shows (`"Easy"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulty levels, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// The wire label for this difficulty.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DifficultyError(s.to_owned()))
    }
}
