//! Vocabulary word with its learner-facing metadata. Only the difficulty
//! label feeds back into scheduling, through the quality mapping.
use serde::{Deserialize, Serialize};

/// Coarse recall judgment the learner picks after flipping a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Hard,
    Medium,
    Easy,
}

impl Difficulty {
    /// Maps the three-level judgment onto the 0-5 quality scale used by
    /// the scheduler. Medium must stay at or above 3: the scheduler's
    /// failure branch triggers strictly below 3, and a "correct with
    /// difficulty" answer must not reset the repetition streak.
    pub fn quality(self) -> u8 {
        match self {
            Difficulty::Hard => 1,
            Difficulty::Medium => 3,
            Difficulty::Easy => 5,
        }
    }

    /// Label as stored on the word row.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Hard => "hard",
            Difficulty::Medium => "medium",
            Difficulty::Easy => "easy",
        }
    }

    /// Parses a stored label. Unknown labels fall back to Medium.
    pub fn from_label(label: &str) -> Self {
        match label {
            "hard" => Difficulty::Hard,
            "easy" => Difficulty::Easy,
            _ => Difficulty::Medium,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub term: String,
    pub translation: String,
    pub example_sentence: Option<String>,
    pub pronunciation: Option<String>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub difficulty: Difficulty,
}

/// Word data before it has a row id, as assembled by the intake layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewWord {
    pub term: String,
    pub translation: String,
    pub example_sentence: Option<String>,
    pub pronunciation: Option<String>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

impl NewWord {
    pub fn new(term: &str, translation: &str) -> Self {
        Self {
            term: term.to_string(),
            translation: translation.to_string(),
            example_sentence: None,
            pronunciation: None,
            synonyms: Vec::new(),
            antonyms: Vec::new(),
        }
    }
}
