//! Question feed ordering.

use serde::{Deserialize, Serialize};

/// Ordering applied to the question feed (`?sortBy=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Most liked first.
    Helpful,
    /// Only questions nobody has commented on yet, in store order.
    Unanswered,
}

impl QuestionSort {
    /// Interpret a `sortBy` query value.
    ///
    /// Missing or unrecognized values fall back to [`QuestionSort::Newest`].
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("helpful") => Self::Helpful,
            Some("unanswered") => Self::Unanswered,
            _ => Self::Newest,
        }
    }

    /// The query-string value for this ordering.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Helpful => "helpful",
            Self::Unanswered => "unanswered",
        }
    }
}

impl std::fmt::Display for QuestionSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        assert_eq!(QuestionSort::from_query(None), QuestionSort::Newest);
        assert_eq!(QuestionSort::from_query(Some("newest")), QuestionSort::Newest);
        assert_eq!(QuestionSort::from_query(Some("helpful")), QuestionSort::Helpful);
        assert_eq!(
            QuestionSort::from_query(Some("unanswered")),
            QuestionSort::Unanswered
        );
    }

    #[test]
    fn test_unknown_falls_back_to_newest() {
        assert_eq!(QuestionSort::from_query(Some("popular")), QuestionSort::Newest);
        assert_eq!(QuestionSort::from_query(Some("")), QuestionSort::Newest);
    }
}
