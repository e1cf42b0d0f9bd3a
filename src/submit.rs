//! Score submission
//!
//! When a single-player round finishes, its result can be handed to a
//! [`ScoreSink`] for record keeping. The trait is the seam between the
//! engine and whatever stores scores (a local file, a database, a remote
//! service): submissions report explicit success or failure, and a failure
//! never disturbs the finished round itself.

use std::collections::{hash_map::Entry, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::SystemTime;

use super::round::RoundResult;

/// Errors raised by score submission
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be reached or refused the submission
    #[error("score store unavailable: {0}")]
    Unavailable(String),
}

/// The acknowledged outcome of a score submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// Whether the store recorded the round (always true on the `Ok` path;
    /// a sink that could not record returns an error instead)
    pub accepted: bool,
    /// Whether the submitted score beat the player's previous best
    pub new_best: bool,
    /// The player's best score after this submission
    pub best_score: u32,
}

/// A destination for finished-round results
///
/// Implementations decide where records live; the engine only requires
/// that every submission is answered with an outcome or an error.
pub trait ScoreSink {
    /// Records a finished round for the named player.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the result could not be recorded; callers
    /// may retry, the round result itself is unaffected.
    fn submit(&mut self, player: &str, result: &RoundResult) -> Result<Submission, Error>;
}

/// A player's stored record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// The player's best final score so far
    pub best_score: u32,
    /// Correct answers in the most recent round
    pub correct_count: usize,
    /// Questions in the most recent round
    pub total_questions: usize,
    /// The longest streak in the most recent round
    pub max_streak: u32,
    /// When the player last finished a round
    pub last_played: SystemTime,
}

impl PlayerRecord {
    fn from_result(result: &RoundResult) -> Self {
        Self {
            best_score: result.final_score,
            correct_count: result.correct_count,
            total_questions: result.total_questions,
            max_streak: result.max_streak,
            last_played: SystemTime::now(),
        }
    }
}

/// An in-memory [`ScoreSink`] keeping each player's best score
///
/// Latest-round stats are always updated; `best_score` only moves when the
/// new score is strictly greater, so a submission is acknowledged as a new
/// best exactly when it sets a new record. A player's first submission is
/// always a new best.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BestScoreStore {
    /// Records keyed by player name
    records: HashMap<String, PlayerRecord>,
}

impl BestScoreStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored record for a player, if any
    pub fn record(&self, player: &str) -> Option<&PlayerRecord> {
        self.records.get(player)
    }

    /// Returns how many players have records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks whether no player has a record yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreSink for BestScoreStore {
    /// Records the round and reports whether it set a new best
    fn submit(&mut self, player: &str, result: &RoundResult) -> Result<Submission, Error> {
        match self.records.entry(player.to_owned()) {
            Entry::Occupied(occupied) => {
                let record = occupied.into_mut();
                record.correct_count = result.correct_count;
                record.total_questions = result.total_questions;
                record.max_streak = result.max_streak;
                record.last_played = SystemTime::now();

                let new_best = result.final_score > record.best_score;
                if new_best {
                    record.best_score = result.final_score;
                }
                Ok(Submission {
                    accepted: true,
                    new_best,
                    best_score: record.best_score,
                })
            }
            Entry::Vacant(vacant) => {
                let record = vacant.insert(PlayerRecord::from_result(result));
                Ok(Submission {
                    accepted: true,
                    new_best: true,
                    best_score: record.best_score,
                })
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use web_time::Duration;

    fn result(final_score: u32, correct_count: usize, max_streak: u32) -> RoundResult {
        RoundResult {
            final_score,
            correct_count,
            total_questions: 5,
            max_streak,
            elapsed: Duration::from_secs(42),
            time_remaining_at_end: 3,
        }
    }

    #[test]
    fn test_first_submission_is_new_best() {
        let mut store = BestScoreStore::new();
        let outcome = store.submit("ana", &result(66, 3, 3)).unwrap();

        assert_eq!(
            outcome,
            Submission {
                accepted: true,
                new_best: true,
                best_score: 66,
            }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.record("ana").unwrap().best_score, 66);
    }

    #[test]
    fn test_lower_score_keeps_best_but_updates_stats() {
        let mut store = BestScoreStore::new();
        store.submit("ana", &result(66, 3, 3)).unwrap();

        let outcome = store.submit("ana", &result(20, 1, 1)).unwrap();
        assert_eq!(
            outcome,
            Submission {
                accepted: true,
                new_best: false,
                best_score: 66,
            }
        );

        let record = store.record("ana").unwrap();
        assert_eq!(record.best_score, 66);
        assert_eq!(record.correct_count, 1);
        assert_eq!(record.max_streak, 1);
    }

    #[test]
    fn test_equal_score_is_not_a_new_best() {
        let mut store = BestScoreStore::new();
        store.submit("ana", &result(66, 3, 3)).unwrap();

        let outcome = store.submit("ana", &result(66, 3, 3)).unwrap();
        assert!(!outcome.new_best);
        assert_eq!(outcome.best_score, 66);
    }

    #[test]
    fn test_higher_score_sets_new_best() {
        let mut store = BestScoreStore::new();
        store.submit("ana", &result(20, 1, 1)).unwrap();

        let outcome = store.submit("ana", &result(66, 3, 3)).unwrap();
        assert_eq!(
            outcome,
            Submission {
                accepted: true,
                new_best: true,
                best_score: 66,
            }
        );
    }

    #[test]
    fn test_players_tracked_independently() {
        let mut store = BestScoreStore::new();
        store.submit("ana", &result(66, 3, 3)).unwrap();
        store.submit("bruno", &result(20, 1, 1)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.record("ana").unwrap().best_score, 66);
        assert_eq!(store.record("bruno").unwrap().best_score, 20);
        assert!(store.record("clara").is_none());
    }

    /// A sink whose backing store is gone; submissions fail but the result
    /// the caller holds is untouched.
    struct BrokenSink;

    impl ScoreSink for BrokenSink {
        fn submit(&mut self, _player: &str, _result: &RoundResult) -> Result<Submission, Error> {
            Err(Error::Unavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn test_sink_failure_is_explicit_and_non_destructive() {
        let mut sink = BrokenSink;
        let finished = result(66, 3, 3);

        let outcome = sink.submit("ana", &finished);
        assert!(matches!(outcome, Err(Error::Unavailable(_))));

        assert_eq!(finished.final_score, 66);
        assert_eq!(finished.correct_count, 3);
    }

    #[test]
    fn test_store_serde_round_trip() {
        let mut store = BestScoreStore::new();
        store.submit("ana", &result(66, 3, 3)).unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let back: BestScoreStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.record("ana").unwrap().best_score, 66);
    }
}
