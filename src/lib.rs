pub mod models;
pub mod storage;

pub use models::{
    DailyProgress, Difficulty, LearningSession, NewWord, ReviewState, SessionState, SessionStats,
    Word,
};
pub use storage::{ReviewStore, SqliteStore, StorageError};
