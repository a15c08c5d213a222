//! Daily aggregate of review activity, upserted by date.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub words_reviewed: u32,
    pub words_learned: u32,
    pub streak_count: u32,
}

/// Folds a finished session into the day's progress record.
///
/// The streak continues from yesterday's record if one exists, otherwise
/// restarts at 1. When a record for today already exists (a second session
/// in the same day), reviewed counts accumulate and the stored streak is
/// the max of both values, so the streak is never incremented twice in
/// one day. `words_learned` belongs to the word-intake flow and is
/// carried over untouched.
pub fn roll_up_daily_progress(
    today: NaiveDate,
    words_reviewed: u32,
    existing: Option<&DailyProgress>,
    prior_day: Option<&DailyProgress>,
) -> DailyProgress {
    let new_streak = match prior_day {
        Some(prior) => prior.streak_count + 1,
        None => 1,
    };

    match existing {
        Some(progress) => DailyProgress {
            date: today,
            words_reviewed: progress.words_reviewed + words_reviewed,
            words_learned: progress.words_learned,
            streak_count: progress.streak_count.max(new_streak),
        },
        None => DailyProgress {
            date: today,
            words_reviewed,
            words_learned: 0,
            streak_count: new_streak,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_session_ever_starts_streak_at_one() {
        let progress = roll_up_daily_progress(date(2026, 3, 10), 5, None, None);
        assert_eq!(
            progress,
            DailyProgress {
                date: date(2026, 3, 10),
                words_reviewed: 5,
                words_learned: 0,
                streak_count: 1,
            }
        );
    }

    #[test]
    fn test_streak_continues_from_yesterday() {
        let yesterday = DailyProgress {
            date: date(2026, 3, 9),
            words_reviewed: 8,
            words_learned: 2,
            streak_count: 4,
        };
        let progress = roll_up_daily_progress(date(2026, 3, 10), 3, None, Some(&yesterday));
        assert_eq!(progress.streak_count, 5);
        assert_eq!(progress.words_reviewed, 3);
    }

    #[test]
    fn test_second_session_same_day_does_not_double_increment() {
        let yesterday = DailyProgress {
            date: date(2026, 3, 9),
            words_reviewed: 8,
            words_learned: 0,
            streak_count: 4,
        };
        // First session of the day already stored streak 5
        let today_so_far = DailyProgress {
            date: date(2026, 3, 10),
            words_reviewed: 3,
            words_learned: 1,
            streak_count: 5,
        };
        let progress = roll_up_daily_progress(
            date(2026, 3, 10),
            4,
            Some(&today_so_far),
            Some(&yesterday),
        );
        assert_eq!(progress.streak_count, 5);
        assert_eq!(progress.words_reviewed, 7);
        assert_eq!(progress.words_learned, 1);
    }

    #[test]
    fn test_gap_day_restarts_streak() {
        // No record for yesterday: streak restarts even if today already
        // has a stale record with a higher count
        let today_so_far = DailyProgress {
            date: date(2026, 3, 10),
            words_reviewed: 2,
            words_learned: 0,
            streak_count: 6,
        };
        let progress = roll_up_daily_progress(date(2026, 3, 10), 1, Some(&today_so_far), None);
        // Max rule keeps the already-stored value
        assert_eq!(progress.streak_count, 6);
        assert_eq!(progress.words_reviewed, 3);
    }
}
