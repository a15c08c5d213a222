//! Learning session management for spaced repetition practice.
//! Walks the learner through the due-word queue once, front to back,
//! feeding each rating through the SM-2 calculator.

use super::daily_progress::roll_up_daily_progress;
use super::{Difficulty, ReviewState, SessionStats, Word, sm2};
use crate::storage::{self, ReviewStore};
use chrono::{Duration, NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Where a session is in its lifecycle. The loading step happens inside
/// [`LearningSession::start`]; a constructed session is already past it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Cards remain in the queue.
    InProgress,
    /// The whole queue has been rated; daily progress has been written.
    Completed,
    /// No words were due when the session started. Terminal.
    Empty,
}

/// One pass through the words due on `today`. Ratings are persisted as
/// they happen; a failed write never blocks the session (the schedule
/// write is an idempotent overwrite, so the next session repairs it),
/// it only bumps `dropped_writes` so the caller can notify the learner.
pub struct LearningSession<S: ReviewStore> {
    pub queue: Vec<(Word, ReviewState)>,
    pub current_index: usize,
    pub show_answer: bool,
    pub stats: SessionStats,
    pub today: NaiveDate,
    pub dropped_writes: u32,
    state: SessionState,
    store: Arc<Mutex<S>>,
}

impl<S: ReviewStore> LearningSession<S> {
    /// Fetches the due queue and starts the session. With nothing due the
    /// session begins (and ends) in [`SessionState::Empty`]. A failed
    /// fetch is propagated: there is no session without its queue.
    pub fn start(store: Arc<Mutex<S>>, today: NaiveDate) -> storage::Result<Self> {
        let queue = store.lock().unwrap().load_due_words(today)?;
        let state = if queue.is_empty() {
            SessionState::Empty
        } else {
            SessionState::InProgress
        };
        info!(due = queue.len(), %today, "learning session started");

        Ok(Self {
            queue,
            current_index: 0,
            show_answer: false,
            stats: SessionStats::default(),
            today,
            dropped_writes: 0,
            state,
            store,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_word(&self) -> Option<&Word> {
        if self.state != SessionState::InProgress {
            return None;
        }
        self.queue.get(self.current_index).map(|(word, _)| word)
    }

    /// Turns the card over (or back). No other state changes.
    pub fn flip(&mut self) {
        if self.state == SessionState::InProgress {
            self.show_answer = !self.show_answer;
        }
    }

    /// Rates the current card: maps the difficulty to a quality grade,
    /// reschedules the word, persists the result, and advances. Rating
    /// the last card completes the session.
    ///
    /// The schedule write and the difficulty-label write are independent;
    /// neither failing rolls the other back.
    pub fn rate(&mut self, difficulty: Difficulty) {
        if self.state != SessionState::InProgress {
            return;
        }
        let Some((word, review)) = self.queue.get_mut(self.current_index) else {
            return;
        };

        let mut new_state = sm2::calculate_next_review(review, difficulty.quality(), self.today);
        new_state.last_reviewed_at = Some(Utc::now());

        {
            let store = self.store.lock().unwrap();
            if let Err(e) = store.save_review_state(&new_state) {
                warn!(word_id = word.id, error = %e, "review state write failed, session continues");
                self.dropped_writes += 1;
            }
            if let Err(e) = store.update_word_difficulty(word.id, difficulty) {
                warn!(word_id = word.id, error = %e, "difficulty label write failed, session continues");
                self.dropped_writes += 1;
            }
        }

        word.difficulty = difficulty;
        *review = new_state;
        self.stats.record(difficulty);

        self.current_index += 1;
        self.show_answer = false;
        if self.current_index == self.queue.len() {
            self.complete();
        }
    }

    /// Folds the session tally into today's progress record.
    fn complete(&mut self) {
        self.state = SessionState::Completed;

        let store = self.store.lock().unwrap();
        let existing = store.load_daily_progress(self.today).unwrap_or_else(|e| {
            warn!(error = %e, "could not read today's progress");
            None
        });
        let prior_day = store
            .load_daily_progress(self.today - Duration::days(1))
            .unwrap_or_else(|e| {
                warn!(error = %e, "could not read yesterday's progress");
                None
            });

        let progress = roll_up_daily_progress(
            self.today,
            self.stats.total(),
            existing.as_ref(),
            prior_day.as_ref(),
        );
        if let Err(e) = store.save_daily_progress(&progress) {
            warn!(error = %e, "daily progress write failed");
            self.dropped_writes += 1;
        }

        info!(
            reviewed = self.stats.total(),
            streak = progress.streak_count,
            "learning session completed"
        );
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Total words the session finished with, reported on completion.
    pub fn words_reviewed(&self) -> u32 {
        self.stats.total()
    }

    pub fn total_count(&self) -> usize {
        self.queue.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.len() - self.current_index
    }

    pub fn progress_label(&self) -> String {
        match self.state {
            SessionState::InProgress => {
                format!("Word {} of {}", self.current_index + 1, self.queue.len())
            }
            SessionState::Completed => format!("Done: {} words reviewed", self.words_reviewed()),
            SessionState::Empty => "Nothing due today".to_string(),
        }
    }
}
