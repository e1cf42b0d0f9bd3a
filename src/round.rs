//! The single-player round state machine
//!
//! A round owns its entire state as one value: the selected questions, the
//! per-question slot mapping, the score/streak counters, and the remaining
//! time. It is driven from outside by two serialized triggers — a recurring
//! one-second [`Round::tick`] and the operator's answer/advance actions —
//! and emits an observable event after every operation for a presentation
//! layer to render. Nothing here touches a clock except to stamp the start
//! time; injecting ticks makes the machine testable without real time
//! passing.
//!
//! The external timer is expected to be stopped before an answer is
//! processed and restarted when the next question begins.

use std::collections::HashSet;
use std::time::Duration;

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::SystemTime;

use super::{
    constants::round as limits,
    question::Question,
    scoring::{self, Points},
    shuffle::{self, OptionMapping, Slot},
    subjects_not_empty,
};

/// Configuration supplied once when a round starts; immutable afterwards
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoundConfig {
    /// The subjects to draw questions from
    #[garde(custom(|v, _| subjects_not_empty(v)))]
    pub subjects: HashSet<super::question::Subject>,
    /// How many questions to play
    #[garde(range(min = limits::MIN_QUESTION_COUNT, max = limits::MAX_QUESTION_COUNT))]
    pub question_count: usize,
    /// The time budget per question, in seconds
    #[garde(range(min = limits::MIN_TIME_PER_QUESTION, max = limits::MAX_TIME_PER_QUESTION))]
    pub time_per_question: u32,
}

/// The phase a round is currently in
///
/// A round in progress alternates between `AwaitingAnswer` and
/// `AnswerRevealed` (the gap between an answer being scored and the
/// operator advancing). `Finished` is terminal. There is no `Idle` value:
/// a failed [`Round::start`] never constructs a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The clock is running and an answer is expected
    AwaitingAnswer,
    /// The answer has been scored; waiting for the operator to advance
    AnswerRevealed,
    /// The round is over and produced its result
    Finished,
}

/// Errors raised by round operations
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration failed validation
    #[error("invalid round configuration: {0}")]
    InvalidConfig(#[from] garde::Report),
    /// No questions matched the configured subjects
    #[error("no questions available for the selected subjects")]
    NoQuestionsAvailable,
    /// The operation is not valid in the current phase
    #[error("operation requires the {expected:?} phase but the round is in {found:?}")]
    InvalidPhase {
        /// The phase the operation requires
        expected: Phase,
        /// The phase the round is actually in
        found: Phase,
    },
    /// The round already finished and produced its result
    #[error("the round is already over")]
    RoundOver,
    /// The slot does not exist for the current question
    #[error("slot {0} does not exist for the current question")]
    UnknownSlot(Slot),
}

/// Observable events emitted after every round operation
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    /// A question is on screen and the clock is armed
    Question {
        /// Zero-based index of the question within the round
        index: usize,
        /// Total number of questions in the round
        count: usize,
        /// The question text
        prompt: String,
        /// The option texts in slot order (correct position randomized)
        options: Vec<String>,
        /// The per-question time budget in seconds
        time_limit: u32,
    },
    /// The clock advanced by one second
    Tick {
        /// Seconds left for the current question
        time_remaining: u32,
    },
    /// An answer was scored
    Answered {
        /// Whether the chosen slot held the correct option
        correct: bool,
        /// The slot holding the correct option, for reveal display
        correct_slot: Slot,
        /// The points breakdown, present only for correct answers
        points: Option<Points>,
        /// The running total after this answer
        score: u32,
        /// The streak after this answer
        streak: u32,
    },
    /// The round terminated and produced its result
    Finished(RoundResult),
}

/// The outcome of submitting an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Whether the answer was correct
    pub correct: bool,
    /// The slot holding the correct option
    pub correct_slot: Slot,
    /// The points awarded, `None` for incorrect answers
    pub points: Option<Points>,
}

/// The outcome of advancing past a revealed answer
#[derive(Debug, Clone, PartialEq)]
pub enum Advanced {
    /// The round moved on to the question at this index
    Next {
        /// Zero-based index of the new current question
        index: usize,
    },
    /// That was the last question; the round is over
    Finished(RoundResult),
}

/// The result of a completed (or abandoned) round
///
/// Produced exactly once, at termination, and handed to whatever score
/// submission collaborator the caller wires up.
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// The final score
    pub final_score: u32,
    /// How many questions were answered correctly
    pub correct_count: usize,
    /// How many questions the round held
    pub total_questions: usize,
    /// The longest streak reached during the round
    pub max_streak: u32,
    /// Wall-clock time from start to termination
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub elapsed: Duration,
    /// Seconds left on the clock when the round ended
    pub time_remaining_at_end: u32,
}

/// A view of the round's observable state, for presentation sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Zero-based index of the current question
    pub current_index: usize,
    /// Total number of questions in the round
    pub question_count: usize,
    /// The running score
    pub score: u32,
    /// The current streak
    pub streak: u32,
    /// The longest streak so far
    pub max_streak: u32,
    /// How many questions were answered correctly so far
    pub correct_count: usize,
    /// Seconds left for the current question
    pub time_remaining: u32,
    /// The phase the round is in
    pub phase: Phase,
}

/// The current question as the player sees it
///
/// Options appear in slot order; the correct option's position is not
/// revealed.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView<'a> {
    /// Zero-based index of the question within the round
    pub index: usize,
    /// Total number of questions in the round
    pub count: usize,
    /// The question text
    pub prompt: &'a str,
    /// The option texts paired with the slot that displays them
    pub options: Vec<(Slot, &'a str)>,
}

/// One quiz session from start to result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// The configuration the round was started with
    config: RoundConfig,
    /// The selected questions, in play order
    questions: Vec<Question>,
    /// The slot mapping for the current question
    mapping: OptionMapping,
    /// Zero-based index of the current question
    current_index: usize,
    /// The running score
    score: u32,
    /// The current streak of consecutive correct answers
    streak: u32,
    /// The longest streak reached so far
    max_streak: u32,
    /// How many questions were answered correctly
    correct_count: usize,
    /// Seconds left for the current question
    time_remaining: u32,
    /// When the round started
    started_at: SystemTime,
    /// The phase the round is in
    phase: Phase,
}

impl Round {
    /// Starts a round: selects and orders questions, arms the clock, and
    /// emits the first question.
    ///
    /// The pool is constrained to the configured subjects, then up to
    /// `question_count` questions are selected without replacement using a
    /// uniform shuffle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an invalid configuration, or
    /// [`Error::NoQuestionsAvailable`] if the filtered pool is empty — an
    /// empty pool is surfaced to the caller, never played as a
    /// zero-question round.
    pub fn start(
        config: RoundConfig,
        pool: &[Question],
        mut emit: impl FnMut(super::Event),
    ) -> Result<Self, Error> {
        config.validate()?;

        let mut questions = pool
            .iter()
            .filter(|question| config.subjects.contains(&question.subject))
            .cloned()
            .collect_vec();

        if questions.is_empty() {
            return Err(Error::NoQuestionsAvailable);
        }

        shuffle::shuffle(&mut questions);
        questions.truncate(config.question_count);

        let round = Self {
            mapping: OptionMapping::generate(questions[0].options.len()),
            time_remaining: config.time_per_question,
            config,
            questions,
            current_index: 0,
            score: 0,
            streak: 0,
            max_streak: 0,
            correct_count: 0,
            started_at: SystemTime::now(),
            phase: Phase::AwaitingAnswer,
        };

        emit(round.question_event().into());

        Ok(round)
    }

    /// Advances the clock by one second.
    ///
    /// Reaching zero while an answer is pending counts as an implicit wrong
    /// answer (streak reset, no points) and ends the entire round, not just
    /// the current question. Outside `AwaitingAnswer` the clock is stopped
    /// and ticks are ignored.
    ///
    /// Returns the round result when the tick timed the round out.
    pub fn tick(&mut self, mut emit: impl FnMut(super::Event)) -> Option<RoundResult> {
        if self.phase != Phase::AwaitingAnswer {
            return None;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);

        if self.time_remaining == 0 {
            self.streak = 0;
            let result = self.finish();
            emit(Event::Finished(result.clone()).into());
            Some(result)
        } else {
            emit(
                Event::Tick {
                    time_remaining: self.time_remaining,
                }
                .into(),
            );
            None
        }
    }

    /// Scores the answer behind the chosen slot.
    ///
    /// On a correct answer the score grows by base points plus time and
    /// streak bonuses (the streak bonus uses the streak *before* this
    /// answer); an incorrect answer resets the streak. Either way the round
    /// moves to `AnswerRevealed` until [`Round::advance`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] outside `AwaitingAnswer`
    /// ([`Error::RoundOver`] once finished) with the state unchanged, or
    /// [`Error::UnknownSlot`] for a slot the current question does not have.
    pub fn submit_answer(
        &mut self,
        slot: Slot,
        mut emit: impl FnMut(super::Event),
    ) -> Result<AnswerOutcome, Error> {
        self.require_phase(Phase::AwaitingAnswer)?;

        let question = &self.questions[self.current_index];
        let chosen = self.mapping.resolve(slot).ok_or(Error::UnknownSlot(slot))?;
        let correct_slot = self
            .mapping
            .slot_of(question.answer)
            .expect("the mapping covers every option of the current question");

        let correct = chosen == question.answer;
        let points = correct.then(|| {
            scoring::question_points(
                self.time_remaining,
                self.config.time_per_question,
                self.streak,
            )
        });

        if let Some(points) = points {
            self.score += points.total();
            self.correct_count += 1;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
        } else {
            self.streak = 0;
        }

        self.phase = Phase::AnswerRevealed;

        emit(
            Event::Answered {
                correct,
                correct_slot,
                points,
                score: self.score,
                streak: self.streak,
            }
            .into(),
        );

        Ok(AnswerOutcome {
            correct,
            correct_slot,
            points,
        })
    }

    /// Moves past a revealed answer.
    ///
    /// If questions remain, the next one gets a fresh slot mapping and a
    /// re-armed clock; otherwise the round finishes and produces its one
    /// [`RoundResult`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] outside `AnswerRevealed`, or
    /// [`Error::RoundOver`] once finished.
    pub fn advance(&mut self, mut emit: impl FnMut(super::Event)) -> Result<Advanced, Error> {
        self.require_phase(Phase::AnswerRevealed)?;

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.mapping =
                OptionMapping::generate(self.questions[self.current_index].options.len());
            self.time_remaining = self.config.time_per_question;
            self.phase = Phase::AwaitingAnswer;

            emit(self.question_event().into());

            Ok(Advanced::Next {
                index: self.current_index,
            })
        } else {
            let result = self.finish();
            emit(Event::Finished(result.clone()).into());
            Ok(Advanced::Finished(result))
        }
    }

    /// Ends the round early with whatever accumulated so far.
    ///
    /// Valid from either in-progress phase; the result's `total_questions`
    /// still reflects the full round length, not the answered count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoundOver`] if the round already finished.
    pub fn abandon(&mut self, mut emit: impl FnMut(super::Event)) -> Result<RoundResult, Error> {
        if self.phase == Phase::Finished {
            return Err(Error::RoundOver);
        }

        let result = self.finish();
        emit(Event::Finished(result.clone()).into());
        Ok(result)
    }

    /// Returns the round's observable state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_index: self.current_index,
            question_count: self.questions.len(),
            score: self.score,
            streak: self.streak,
            max_streak: self.max_streak,
            correct_count: self.correct_count,
            time_remaining: self.time_remaining,
            phase: self.phase,
        }
    }

    /// Returns the current question as the player sees it
    pub fn current_view(&self) -> QuestionView<'_> {
        let question = &self.questions[self.current_index];
        QuestionView {
            index: self.current_index,
            count: self.questions.len(),
            prompt: &question.prompt,
            options: self
                .mapping
                .entries()
                .map(|(slot, option)| (slot, question.options[option.index()].as_str()))
                .collect_vec(),
        }
    }

    /// Returns the phase the round is in
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the configuration the round was started with
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    fn require_phase(&self, expected: Phase) -> Result<(), Error> {
        match self.phase {
            Phase::Finished => Err(Error::RoundOver),
            found if found == expected => Ok(()),
            found => Err(Error::InvalidPhase { expected, found }),
        }
    }

    fn question_event(&self) -> Event {
        let question = &self.questions[self.current_index];
        Event::Question {
            index: self.current_index,
            count: self.questions.len(),
            prompt: question.prompt.clone(),
            options: self
                .mapping
                .entries()
                .map(|(_, option)| question.options[option.index()].clone())
                .collect_vec(),
            time_limit: self.config.time_per_question,
        }
    }

    fn finish(&mut self) -> RoundResult {
        self.phase = Phase::Finished;
        RoundResult {
            final_score: self.score,
            correct_count: self.correct_count,
            total_questions: self.questions.len(),
            max_streak: self.max_streak,
            elapsed: self.started_at.elapsed().unwrap_or_default(),
            time_remaining_at_end: self.time_remaining,
        }
    }
}
