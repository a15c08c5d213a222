//! Persistence port for the scheduling core.
//!
//! The scheduler never talks to a database directly; it goes through the
//! [`ReviewStore`] trait, so the algorithm and the session state machine
//! can be unit-tested against any store implementation. [`SqliteStore`]
//! is the bundled adapter.

pub mod sqlite;

pub use sqlite::SqliteStore;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{DailyProgress, Difficulty, ReviewState, Word};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("word '{0}' already exists")]
    DuplicateWord(String),

    #[error("invalid word data: {0}")]
    InvalidWordData(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Narrow interface between the scheduling core and whatever holds the
/// learner's words.
///
/// `save_review_state` and `save_daily_progress` overwrite whole rows,
/// so retrying a failed write is always safe.
pub trait ReviewStore {
    /// Words whose next review date has arrived or passed, oldest due
    /// date first.
    fn load_due_words(&self, as_of: NaiveDate) -> Result<Vec<(Word, ReviewState)>>;

    fn save_review_state(&self, state: &ReviewState) -> Result<()>;

    fn update_word_difficulty(&self, word_id: i64, difficulty: Difficulty) -> Result<()>;

    fn load_daily_progress(&self, date: NaiveDate) -> Result<Option<DailyProgress>>;

    /// Upsert by date.
    fn save_daily_progress(&self, progress: &DailyProgress) -> Result<()>;
}
