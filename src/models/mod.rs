pub mod daily_progress;
pub mod learning_session;
pub mod review_state;
pub mod session_stats;
pub mod sm2;
pub mod word;

pub use daily_progress::DailyProgress;
pub use learning_session::{LearningSession, SessionState};
pub use review_state::ReviewState;
pub use session_stats::SessionStats;
pub use word::{Difficulty, NewWord, Word};
