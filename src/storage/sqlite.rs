//! SQLite adapter for the persistence port.
//!
//! Handles schema creation, word intake with initial review state, and
//! the queries behind [`ReviewStore`]. Dates are stored as ISO-8601 text
//! (`YYYY-MM-DD`), matching the day-granularity semantics of the
//! scheduler; synonym and antonym lists are stored as JSON text.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{Result, ReviewStore, StorageError};
use crate::models::{DailyProgress, Difficulty, NewWord, ReviewState, Word, sm2};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema
    /// exists.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, used by the test suites.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.pragma_update(None, "foreign_keys", "ON")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                term TEXT NOT NULL UNIQUE,
                translation TEXT NOT NULL,
                example_sentence TEXT,
                pronunciation TEXT,
                synonyms TEXT NOT NULL DEFAULT '[]',
                antonyms TEXT NOT NULL DEFAULT '[]',
                difficulty TEXT NOT NULL DEFAULT 'medium'
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS review_schedule (
                word_id INTEGER PRIMARY KEY,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                interval_days INTEGER NOT NULL DEFAULT 0,
                repetitions INTEGER NOT NULL DEFAULT 0,
                next_review_date TEXT NOT NULL,
                last_reviewed_at TEXT,
                FOREIGN KEY (word_id) REFERENCES words(id) ON DELETE CASCADE
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS daily_progress (
                date TEXT PRIMARY KEY,
                words_reviewed INTEGER NOT NULL DEFAULT 0,
                words_learned INTEGER NOT NULL DEFAULT 0,
                streak_count INTEGER NOT NULL DEFAULT 0
            )",
            (),
        )?;

        Ok(())
    }

    /// Adds a word and seeds its review state: first review due tomorrow.
    /// A word with the same term already in the store is an error.
    pub fn add_word(&self, word: &NewWord, today: NaiveDate) -> Result<Word> {
        let synonyms = serde_json::to_string(&word.synonyms)?;
        let antonyms = serde_json::to_string(&word.antonyms)?;

        let inserted = self.conn.execute(
            "INSERT INTO words (term, translation, example_sentence, pronunciation, synonyms, antonyms, difficulty)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                word.term,
                word.translation,
                word.example_sentence,
                word.pronunciation,
                synonyms,
                antonyms,
                Difficulty::Medium.label(),
            ],
        );

        match inserted {
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(StorageError::DuplicateWord(word.term.clone()));
            }
            other => other?,
        };

        let word_id = self.conn.last_insert_rowid();
        self.save_review_state(&sm2::initial_review_state(word_id, today))?;

        Ok(Word {
            id: word_id,
            term: word.term.clone(),
            translation: word.translation.clone(),
            example_sentence: word.example_sentence.clone(),
            pronunciation: word.pronunciation.clone(),
            synonyms: word.synonyms.clone(),
            antonyms: word.antonyms.clone(),
            difficulty: Difficulty::Medium,
        })
    }

    /// Review state for one word, regardless of due date.
    pub fn load_review_state(&self, word_id: i64) -> Result<Option<ReviewState>> {
        let state = self
            .conn
            .query_row(
                "SELECT word_id, ease_factor, interval_days, repetitions, next_review_date, last_reviewed_at
                 FROM review_schedule WHERE word_id = ?1",
                params![word_id],
                review_state_from_row,
            )
            .optional()?;
        Ok(state)
    }
}

/// Builds a `Word` from a row shaped by the `w.*` column list below.
fn word_from_row(row: &Row) -> rusqlite::Result<Word> {
    let synonyms: String = row.get(5)?;
    let antonyms: String = row.get(6)?;
    let difficulty: String = row.get(7)?;
    Ok(Word {
        id: row.get(0)?,
        term: row.get(1)?,
        translation: row.get(2)?,
        example_sentence: row.get(3)?,
        pronunciation: row.get(4)?,
        synonyms: serde_json::from_str(&synonyms).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?,
        antonyms: serde_json::from_str(&antonyms).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?,
        difficulty: Difficulty::from_label(&difficulty),
    })
}

fn review_state_from_row(row: &Row) -> rusqlite::Result<ReviewState> {
    Ok(ReviewState {
        word_id: row.get(0)?,
        ease_factor: row.get(1)?,
        interval_days: row.get(2)?,
        repetitions: row.get(3)?,
        next_review_date: row.get(4)?,
        last_reviewed_at: row.get(5)?,
    })
}

impl ReviewStore for SqliteStore {
    fn load_due_words(&self, as_of: NaiveDate) -> Result<Vec<(Word, ReviewState)>> {
        let mut stmt = self.conn.prepare(
            "SELECT w.id, w.term, w.translation, w.example_sentence, w.pronunciation,
                    w.synonyms, w.antonyms, w.difficulty,
                    r.word_id, r.ease_factor, r.interval_days, r.repetitions,
                    r.next_review_date, r.last_reviewed_at
             FROM words w
             JOIN review_schedule r ON w.id = r.word_id
             WHERE r.next_review_date <= ?1
             ORDER BY r.next_review_date ASC",
        )?;

        let words = stmt
            .query_map(params![as_of], |row| {
                let word = word_from_row(row)?;
                let state = ReviewState {
                    word_id: row.get(8)?,
                    ease_factor: row.get(9)?,
                    interval_days: row.get(10)?,
                    repetitions: row.get(11)?,
                    next_review_date: row.get(12)?,
                    last_reviewed_at: row.get(13)?,
                };
                Ok((word, state))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(words)
    }

    fn save_review_state(&self, state: &ReviewState) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO review_schedule
             (word_id, ease_factor, interval_days, repetitions, next_review_date, last_reviewed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                state.word_id,
                state.ease_factor,
                state.interval_days,
                state.repetitions,
                state.next_review_date,
                state.last_reviewed_at,
            ],
        )?;
        Ok(())
    }

    fn update_word_difficulty(&self, word_id: i64, difficulty: Difficulty) -> Result<()> {
        self.conn.execute(
            "UPDATE words SET difficulty = ?1 WHERE id = ?2",
            params![difficulty.label(), word_id],
        )?;
        Ok(())
    }

    fn load_daily_progress(&self, date: NaiveDate) -> Result<Option<DailyProgress>> {
        let progress = self
            .conn
            .query_row(
                "SELECT date, words_reviewed, words_learned, streak_count
                 FROM daily_progress WHERE date = ?1",
                params![date],
                |row| {
                    Ok(DailyProgress {
                        date: row.get(0)?,
                        words_reviewed: row.get(1)?,
                        words_learned: row.get(2)?,
                        streak_count: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(progress)
    }

    fn save_daily_progress(&self, progress: &DailyProgress) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO daily_progress (date, words_reviewed, words_learned, streak_count)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                progress.date,
                progress.words_reviewed,
                progress.words_learned,
                progress.streak_count,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_word(term: &str) -> NewWord {
        NewWord::new(term, "meaning")
    }

    #[test]
    fn test_add_word_seeds_review_state() {
        let store = SqliteStore::open_in_memory().unwrap();
        let today = date(2026, 3, 10);

        let word = store.add_word(&sample_word("boi"), today).unwrap();
        assert_eq!(word.difficulty, Difficulty::Medium);

        let state = store.load_review_state(word.id).unwrap().unwrap();
        assert_eq!(state.ease_factor, sm2::INITIAL_EASE_FACTOR);
        assert_eq!(state.interval_days, 0);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.next_review_date, date(2026, 3, 11));
        assert!(state.last_reviewed_at.is_none());
    }

    #[test]
    fn test_duplicate_term_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let today = date(2026, 3, 10);

        store.add_word(&sample_word("pani"), today).unwrap();
        let err = store.add_word(&sample_word("pani"), today).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateWord(term) if term == "pani"));
    }

    #[test]
    fn test_word_metadata_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let today = date(2026, 3, 10);

        let mut new_word = NewWord::new("ghor", "house");
        new_word.example_sentence = Some("Amar ghor chhoto.".to_string());
        new_word.pronunciation = Some("ghor".to_string());
        new_word.synonyms = vec!["bari".to_string(), "basha".to_string()];
        new_word.antonyms = vec!["bahir".to_string()];
        store.add_word(&new_word, today).unwrap();

        let due = store.load_due_words(date(2026, 3, 11)).unwrap();
        assert_eq!(due.len(), 1);
        let (word, _) = &due[0];
        assert_eq!(word.term, "ghor");
        assert_eq!(word.example_sentence.as_deref(), Some("Amar ghor chhoto."));
        assert_eq!(word.synonyms, vec!["bari", "basha"]);
        assert_eq!(word.antonyms, vec!["bahir"]);
    }

    #[test]
    fn test_due_words_excludes_future_and_orders_oldest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let today = date(2026, 3, 10);

        // Added on different days, so their first reviews land on
        // different dates
        let old = store
            .add_word(&sample_word("purono"), today - Duration::days(5))
            .unwrap();
        let recent = store
            .add_word(&sample_word("notun"), today - Duration::days(1))
            .unwrap();
        store.add_word(&sample_word("agami"), today).unwrap();

        let due = store.load_due_words(today).unwrap();
        let ids: Vec<i64> = due.iter().map(|(w, _)| w.id).collect();
        // The word added today is due tomorrow, not yet
        assert_eq!(ids, vec![old.id, recent.id]);
    }

    #[test]
    fn test_save_review_state_overwrites_row() {
        let store = SqliteStore::open_in_memory().unwrap();
        let today = date(2026, 3, 10);
        let word = store.add_word(&sample_word("phul"), today).unwrap();

        let updated = ReviewState {
            word_id: word.id,
            ease_factor: 2.6,
            interval_days: 3,
            repetitions: 2,
            next_review_date: date(2026, 3, 13),
            last_reviewed_at: Some(Utc::now()),
        };
        store.save_review_state(&updated).unwrap();
        // Idempotent overwrite: saving again changes nothing
        store.save_review_state(&updated).unwrap();

        let loaded = store.load_review_state(word.id).unwrap().unwrap();
        assert_eq!(loaded.ease_factor, 2.6);
        assert_eq!(loaded.interval_days, 3);
        assert_eq!(loaded.repetitions, 2);
        assert_eq!(loaded.next_review_date, date(2026, 3, 13));
        assert!(loaded.last_reviewed_at.is_some());
    }

    #[test]
    fn test_update_word_difficulty() {
        let store = SqliteStore::open_in_memory().unwrap();
        let today = date(2026, 3, 10);
        let word = store.add_word(&sample_word("kothin"), today).unwrap();

        store.update_word_difficulty(word.id, Difficulty::Hard).unwrap();

        let due = store.load_due_words(date(2026, 3, 11)).unwrap();
        assert_eq!(due[0].0.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_daily_progress_upsert() {
        let store = SqliteStore::open_in_memory().unwrap();
        let today = date(2026, 3, 10);

        assert!(store.load_daily_progress(today).unwrap().is_none());

        let progress = DailyProgress {
            date: today,
            words_reviewed: 5,
            words_learned: 2,
            streak_count: 3,
        };
        store.save_daily_progress(&progress).unwrap();
        assert_eq!(store.load_daily_progress(today).unwrap().unwrap(), progress);

        let replaced = DailyProgress {
            words_reviewed: 9,
            ..progress
        };
        store.save_daily_progress(&replaced).unwrap();
        assert_eq!(store.load_daily_progress(today).unwrap().unwrap(), replaced);
    }
}
