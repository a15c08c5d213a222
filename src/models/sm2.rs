//! SM-2 (SuperMemo 2) spaced repetition scheduling.
//!
//! Variant used for vocabulary review:
//! - Quality 0-2: repetition streak resets and the word comes back tomorrow
//! - Quality 3-5: interval grows 1 day → 3 days → previous interval times
//!   the ease factor (3 instead of the classical 6, so new words are seen
//!   more often early on)
//! - The ease factor is recomputed on every review, failed ones included,
//!   and never drops below 1.3
//!
//! All functions are pure; the calling date is injected rather than read
//! from the system clock.

use super::ReviewState;
use chrono::{Duration, NaiveDate};

/// Ease factor assigned to a word that has never been reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Lower bound on the ease factor. There is no upper bound; unbounded
/// growth under repeated easy ratings is a property of classical SM-2.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Quality ratings below this reset the repetition streak.
pub const SUCCESS_THRESHOLD: u8 = 3;

/// Calculates new review state according to the SM-2 variant.
/// quality: 0-5 (0 = complete blackout, 5 = perfect response). Callers
/// produce it through [`Difficulty::quality`](super::Difficulty::quality).
///
/// The new interval counts from `today`, not from the stale
/// `next_review_date`, so reviewing late does not compound scheduling
/// drift from the missed days.
pub fn calculate_next_review(state: &ReviewState, quality: u8, today: NaiveDate) -> ReviewState {
    let (new_interval, new_repetitions) = if quality < SUCCESS_THRESHOLD {
        // Failed recall: streak starts over, review again tomorrow
        (1, 0)
    } else {
        let new_reps = state.repetitions + 1;
        let new_int = match new_reps {
            1 => 1,
            2 => 3,
            // Grown from the ease factor as it was before this review
            _ => (state.interval_days as f64 * state.ease_factor).round() as i32,
        };
        (new_int, new_reps)
    };

    // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
    // Applied on success and failure alike: poor quality pushes the ease
    // factor down, high quality pushes it up.
    let q = quality as f64;
    let mut new_ef = state.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    if new_ef < MIN_EASE_FACTOR {
        new_ef = MIN_EASE_FACTOR;
    }

    ReviewState {
        word_id: state.word_id,
        ease_factor: new_ef,
        interval_days: new_interval,
        repetitions: new_repetitions,
        next_review_date: today + Duration::days(new_interval as i64),
        last_reviewed_at: state.last_reviewed_at,
    }
}

/// Review state for a word that was just added: nothing learned yet,
/// first review due tomorrow.
pub fn initial_review_state(word_id: i64, today: NaiveDate) -> ReviewState {
    ReviewState {
        word_id,
        ease_factor: INITIAL_EASE_FACTOR,
        interval_days: 0,
        repetitions: 0,
        next_review_date: today + Duration::days(1),
        last_reviewed_at: None,
    }
}

/// A word is due when its scheduled date has arrived or passed.
/// Comparison is at day granularity; `NaiveDate` carries no time of day.
pub fn is_due(next_review_date: NaiveDate, as_of: NaiveDate) -> bool {
    next_review_date <= as_of
}
