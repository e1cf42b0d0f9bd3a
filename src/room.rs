//! Room-based group play
//!
//! A room is a named, shareable session for playing on one screen: a fixed
//! roster of named participants, a subject selection, and a question stream
//! drawn with the same shuffle and slot-mapping primitives as the
//! single-player round. The lifecycle is `Selecting` (choosing who plays)
//! to `Playing` to `Results`, and a finished room can go back to
//! `Selecting` for another play-through.
//!
//! Scoring is deliberately simpler than the single-player round: a fixed
//! point value per correct answer, no time or streak bonuses, credited to
//! the designated scorer (the first selected participant).

use std::collections::HashSet;

use garde::Validate;
use itertools::Itertools;
use once_cell_serde::sync::OnceCell;
use rustrict::CensorStr;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use uuid::Uuid;
use web_time::SystemTime;

use super::{
    constants::{room as limits, round as round_limits},
    question::{Question, Subject},
    room_id::RoomId,
    round::QuestionView,
    shuffle::{self, OptionMapping, Slot},
    subjects_not_empty,
};

/// A unique identifier for a room participant
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Creates a new random participant ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    /// Creates a new random participant ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ParticipantId {
    /// Formats the ID as a UUID string
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ParticipantId {
    type Err = uuid::Error;

    /// Parses an ID from a UUID string
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Reasons a participant name is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum NameError {
    /// The name is empty (after trimming)
    #[error("name is empty")]
    Empty,
    /// The name exceeds the length limit
    #[error("name is too long")]
    TooLong,
    /// Another participant in the room already has this name
    #[error("name is already taken")]
    Taken,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Inappropriate,
}

/// Errors raised while creating a room
#[derive(Debug, Error)]
pub enum CreateError {
    /// The configuration failed validation
    #[error("invalid room configuration: {0}")]
    InvalidConfig(#[from] garde::Report),
    /// A participant name was rejected
    #[error("participant name {name:?} rejected: {source}")]
    Name {
        /// The offending name as supplied
        name: String,
        /// Why it was rejected
        source: NameError,
    },
}

/// Errors raised by room operations
#[derive(Debug, Error)]
pub enum Error {
    /// No questions matched the room's subjects
    #[error("no questions available for the selected subjects")]
    NoQuestionsAvailable,
    /// A play-through needs at least one selected participant
    #[error("no participants selected to play")]
    NoPlayersSelected,
    /// The participant is not on this room's roster
    #[error("participant {0} is not in this room")]
    UnknownParticipant(ParticipantId),
    /// The slot does not exist for the current question
    #[error("slot {0} does not exist for the current question")]
    UnknownSlot(Slot),
    /// The operation is not valid in the current status
    #[error("operation requires the {expected:?} status but the room is in {found:?}")]
    InvalidStatus {
        /// The status the operation requires
        expected: StatusKind,
        /// The status the room is actually in
        found: StatusKind,
    },
}

/// The phase of the current question while a room is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionPhase {
    /// An answer is expected
    AwaitingAnswer,
    /// The answer has been scored; waiting for the operator to advance
    AnswerRevealed,
}

/// The lifecycle status of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Choosing which participants will play
    Selecting,
    /// A play-through is in progress
    Playing(QuestionPhase),
    /// The play-through finished; standings are available
    Results,
}

/// The kind of status without the per-question phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Choosing which participants will play
    Selecting,
    /// A play-through is in progress
    Playing,
    /// The play-through finished
    Results,
}

impl Status {
    /// Returns the kind of this status without the per-question phase
    pub fn kind(self) -> StatusKind {
        match self {
            Status::Selecting => StatusKind::Selecting,
            Status::Playing(_) => StatusKind::Playing,
            Status::Results => StatusKind::Results,
        }
    }
}

/// Configuration supplied once when a room is created
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoomConfig {
    /// The room's display name
    #[garde(length(chars, min = limits::MIN_NAME_LENGTH, max = limits::MAX_NAME_LENGTH))]
    pub name: String,
    /// The participant names, one per roster entry
    #[garde(length(min = 1, max = limits::MAX_PARTICIPANT_COUNT))]
    pub participants: Vec<String>,
    /// The subjects to draw questions from
    #[garde(custom(|v, _| subjects_not_empty(v)))]
    pub subjects: HashSet<Subject>,
    /// How many questions each play-through holds
    #[garde(range(min = round_limits::MIN_QUESTION_COUNT, max = round_limits::MAX_QUESTION_COUNT))]
    pub question_count: usize,
}

/// A named member of a room's roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// The participant's unique identifier
    pub id: ParticipantId,
    /// The participant's display name (trimmed, unique within the room)
    pub name: String,
    /// Points accumulated in the current play-through
    pub score: u32,
    /// Whether this participant answered the current question
    pub answered: bool,
}

/// One row of a finished play-through's standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// 1-indexed rank, best score first
    pub position: usize,
    /// The participant's name
    pub name: String,
    /// The participant's final score
    pub score: u32,
}

/// Observable events emitted by room operations
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub enum Event {
    /// A question is on screen
    Question {
        /// Zero-based index of the question within the play-through
        index: usize,
        /// Total number of questions in the play-through
        count: usize,
        /// The question text
        prompt: String,
        /// The option texts in slot order (correct position randomized)
        options: Vec<String>,
    },
    /// An answer was scored
    Answered {
        /// Whether the chosen slot held the correct option
        correct: bool,
        /// The slot holding the correct option, for reveal display
        correct_slot: Slot,
        /// Who was credited, present only for correct answers
        scorer: Option<ParticipantId>,
        /// Points awarded (the fixed room value, or zero)
        awarded: u32,
    },
    /// The play-through finished with these standings
    Finished {
        /// Participants sorted by score, best first
        standings: Vec<StandingEntry>,
    },
}

/// The outcome of submitting an answer in a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomAnswer {
    /// Whether the answer was correct
    pub correct: bool,
    /// The slot holding the correct option
    pub correct_slot: Slot,
    /// Who was credited, `None` for incorrect answers
    pub scorer: Option<ParticipantId>,
}

/// The outcome of advancing past a revealed answer in a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    /// The play-through moved on to the question at this index
    Next {
        /// Zero-based index of the new current question
        index: usize,
    },
    /// That was the last question; standings are available
    Finished,
}

/// A named, shareable group-play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// The room's shareable identifier
    id: RoomId,
    /// The room's display name
    name: String,
    /// The subjects to draw questions from
    subjects: HashSet<Subject>,
    /// How many questions each play-through holds
    question_count: usize,
    /// The full roster
    participants: Vec<Participant>,
    /// The participants selected for the current play-through
    active: Vec<ParticipantId>,
    /// The questions of the current play-through, in play order
    questions: Vec<Question>,
    /// Zero-based index of the current question
    current_index: usize,
    /// The slot mapping for the current question
    mapping: OptionMapping,
    /// The room's lifecycle status
    status: Status,
    /// When the room was created
    created: SystemTime,
    /// Final standings, computed once per finished play-through
    #[serde(skip)]
    standings: OnceCell<Vec<StandingEntry>>,
}

impl Room {
    /// Creates a room with a validated roster.
    ///
    /// Participant names are trimmed and must be non-empty, within the
    /// length limit, unique within the room, and free of inappropriate
    /// content.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::InvalidConfig`] for an invalid configuration
    /// or [`CreateError::Name`] naming the first rejected participant.
    pub fn create(config: RoomConfig) -> Result<Self, CreateError> {
        config.validate()?;

        let mut taken: HashSet<String> = HashSet::new();
        let mut participants = Vec::with_capacity(config.participants.len());

        for raw in &config.participants {
            let name = validate_name(raw, &taken).map_err(|source| CreateError::Name {
                name: raw.clone(),
                source,
            })?;
            taken.insert(name.clone());
            participants.push(Participant {
                id: ParticipantId::new(),
                name,
                score: 0,
                answered: false,
            });
        }

        Ok(Self {
            id: RoomId::new(),
            name: config.name,
            subjects: config.subjects,
            question_count: config.question_count,
            participants,
            active: Vec::new(),
            questions: Vec::new(),
            current_index: 0,
            mapping: OptionMapping::generate(0),
            status: Status::Selecting,
            created: SystemTime::now(),
            standings: OnceCell::new(),
        })
    }

    /// Chooses which participants play the next play-through.
    ///
    /// Valid while selecting or after results (the restart flow); selected
    /// participants have their scores reset. The first selected participant
    /// becomes the designated scorer. Duplicate IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStatus`] while a play-through is in
    /// progress, [`Error::NoPlayersSelected`] for an empty selection, or
    /// [`Error::UnknownParticipant`] for an ID not on the roster.
    pub fn select_players(&mut self, ids: &[ParticipantId]) -> Result<(), Error> {
        if let Status::Playing(_) = self.status {
            return Err(Error::InvalidStatus {
                expected: StatusKind::Selecting,
                found: StatusKind::Playing,
            });
        }

        let selected = ids.iter().copied().unique().collect_vec();
        if selected.is_empty() {
            return Err(Error::NoPlayersSelected);
        }
        for id in &selected {
            if !self.participants.iter().any(|p| p.id == *id) {
                return Err(Error::UnknownParticipant(*id));
            }
        }

        for participant in &mut self.participants {
            if selected.contains(&participant.id) {
                participant.score = 0;
                participant.answered = false;
            }
        }

        self.active = selected;
        self.status = Status::Selecting;
        self.standings = OnceCell::new();
        Ok(())
    }

    /// Starts a play-through with questions drawn from the pool.
    ///
    /// Same selection as the single-player round: constrain to the room's
    /// subjects, uniform shuffle, take up to `question_count`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStatus`] outside `Selecting`,
    /// [`Error::NoPlayersSelected`] if no participants were selected, or
    /// [`Error::NoQuestionsAvailable`] if the filtered pool is empty.
    pub fn start(
        &mut self,
        pool: &[Question],
        mut emit: impl FnMut(super::Event),
    ) -> Result<(), Error> {
        if self.status != Status::Selecting {
            return Err(Error::InvalidStatus {
                expected: StatusKind::Selecting,
                found: self.status.kind(),
            });
        }
        if self.active.is_empty() {
            return Err(Error::NoPlayersSelected);
        }

        let mut questions = pool
            .iter()
            .filter(|question| self.subjects.contains(&question.subject))
            .cloned()
            .collect_vec();

        if questions.is_empty() {
            return Err(Error::NoQuestionsAvailable);
        }

        shuffle::shuffle(&mut questions);
        questions.truncate(self.question_count);

        self.mapping = OptionMapping::generate(questions[0].options.len());
        self.questions = questions;
        self.current_index = 0;
        self.status = Status::Playing(QuestionPhase::AwaitingAnswer);

        emit(self.question_event().into());
        Ok(())
    }

    /// Scores the answer behind the chosen slot.
    ///
    /// A correct answer credits the designated scorer with the fixed room
    /// point value; there are no time or streak bonuses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStatus`] unless a question is awaiting an
    /// answer, or [`Error::UnknownSlot`] for a slot the current question
    /// does not have.
    pub fn submit_answer(
        &mut self,
        slot: Slot,
        mut emit: impl FnMut(super::Event),
    ) -> Result<RoomAnswer, Error> {
        if self.status != Status::Playing(QuestionPhase::AwaitingAnswer) {
            return Err(Error::InvalidStatus {
                expected: StatusKind::Playing,
                found: self.status.kind(),
            });
        }

        let question = &self.questions[self.current_index];
        let chosen = self.mapping.resolve(slot).ok_or(Error::UnknownSlot(slot))?;
        let correct_slot = self
            .mapping
            .slot_of(question.answer)
            .expect("the mapping covers every option of the current question");

        let correct = chosen == question.answer;
        let scorer = if correct {
            let id = self
                .designated_scorer()
                .expect("a play-through cannot start without selected participants");
            if let Some(participant) = self.participants.iter_mut().find(|p| p.id == id) {
                participant.score += limits::POINTS_PER_CORRECT;
                participant.answered = true;
            }
            Some(id)
        } else {
            None
        };

        self.status = Status::Playing(QuestionPhase::AnswerRevealed);

        emit(
            Event::Answered {
                correct,
                correct_slot,
                scorer,
                awarded: if correct { limits::POINTS_PER_CORRECT } else { 0 },
            }
            .into(),
        );

        Ok(RoomAnswer {
            correct,
            correct_slot,
            scorer,
        })
    }

    /// Moves past a revealed answer.
    ///
    /// If questions remain, the next one gets a fresh slot mapping and the
    /// per-question answered flags are reset; otherwise the room enters
    /// `Results` and the standings become available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStatus`] unless an answer is revealed.
    pub fn advance(&mut self, mut emit: impl FnMut(super::Event)) -> Result<Advanced, Error> {
        if self.status != Status::Playing(QuestionPhase::AnswerRevealed) {
            return Err(Error::InvalidStatus {
                expected: StatusKind::Playing,
                found: self.status.kind(),
            });
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.mapping =
                OptionMapping::generate(self.questions[self.current_index].options.len());
            for participant in &mut self.participants {
                participant.answered = false;
            }
            self.status = Status::Playing(QuestionPhase::AwaitingAnswer);

            emit(self.question_event().into());
            Ok(Advanced::Next {
                index: self.current_index,
            })
        } else {
            self.status = Status::Results;
            let standings = self
                .standings
                .get_or_init(|| self.compute_standings())
                .clone();
            emit(Event::Finished { standings }.into());
            Ok(Advanced::Finished)
        }
    }

    /// Returns the finished play-through's standings, best score first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStatus`] outside `Results`.
    pub fn standings(&self) -> Result<&[StandingEntry], Error> {
        if self.status != Status::Results {
            return Err(Error::InvalidStatus {
                expected: StatusKind::Results,
                found: self.status.kind(),
            });
        }
        Ok(self.standings.get_or_init(|| self.compute_standings()))
    }

    /// Returns the current question as the players see it, if one is up
    pub fn current_view(&self) -> Option<QuestionView<'_>> {
        if !matches!(self.status, Status::Playing(_)) {
            return None;
        }
        let question = &self.questions[self.current_index];
        Some(QuestionView {
            index: self.current_index,
            count: self.questions.len(),
            prompt: &question.prompt,
            options: self
                .mapping
                .entries()
                .map(|(slot, option)| (slot, question.options[option.index()].as_str()))
                .collect_vec(),
        })
    }

    /// Returns the room's shareable identifier
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Returns the room's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full roster
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Returns the room's lifecycle status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the participant credited for correct answers, once selected
    pub fn designated_scorer(&self) -> Option<ParticipantId> {
        self.active.first().copied()
    }

    /// Returns when the room was created
    pub fn created(&self) -> SystemTime {
        self.created
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
        }
    }

    fn compute_standings(&self) -> Vec<StandingEntry> {
        self.active
            .iter()
            .filter_map(|id| self.participants.iter().find(|p| p.id == *id))
            .sorted_by(|a, b| b.score.cmp(&a.score))
            .enumerate()
            .map(|(i, participant)| StandingEntry {
                position: i + 1,
                name: participant.name.clone(),
                score: participant.score,
            })
            .collect_vec()
    }
}

/// Validates a participant name against the room's roster rules
fn validate_name(raw: &str, taken: &HashSet<String>) -> Result<String, NameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() > limits::MAX_PARTICIPANT_NAME_LENGTH {
        return Err(NameError::TooLong);
    }
    if taken.contains(name) {
        return Err(NameError::Taken);
    }
    if name.is_inappropriate() {
        return Err(NameError::Inappropriate);
    }
    Ok(name.to_owned())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::question::OptionId;

    fn pool(subject: &str, count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| Question {
                prompt: format!("question {i}"),
                options: vec![
                    "right".to_string(),
                    "wrong 1".to_string(),
                    "wrong 2".to_string(),
                ],
                answer: OptionId::new(0),
                subject: Subject::new(subject),
            })
            .collect()
    }

    fn config(names: &[&str]) -> RoomConfig {
        RoomConfig {
            name: "Friday quiz".to_string(),
            participants: names.iter().map(ToString::to_string).collect(),
            subjects: [Subject::new("a")].into_iter().collect(),
            question_count: 3,
        }
    }

    fn sink() -> impl FnMut(crate::Event) {
        |_| {}
    }

    fn correct_slot(room: &Room) -> Slot {
        room.current_view()
            .expect("a question is up")
            .options
            .iter()
            .find(|(_, text)| *text == "right")
            .map(|(slot, _)| *slot)
            .expect("every test question has a \"right\" option")
    }

    fn wrong_slot(room: &Room) -> Slot {
        room.current_view()
            .expect("a question is up")
            .options
            .iter()
            .find(|(_, text)| *text != "right")
            .map(|(slot, _)| *slot)
            .expect("every test question has a wrong option")
    }

    /// Creates a room with all participants selected, ready to start.
    fn ready_room(names: &[&str]) -> Room {
        let mut room = Room::create(config(names)).unwrap();
        let ids = room.participants().iter().map(|p| p.id).collect_vec();
        room.select_players(&ids).unwrap();
        room
    }

    #[test]
    fn test_create_trims_and_keeps_roster_order() {
        let room = Room::create(config(&["  Ana ", "Bruno", "Clara"])).unwrap();

        let names = room.participants().iter().map(|p| &p.name).collect_vec();
        assert_eq!(names, ["Ana", "Bruno", "Clara"]);
        assert_eq!(room.status(), Status::Selecting);

        let ids: HashSet<_> = room.participants().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_create_rejects_bad_names() {
        assert!(matches!(
            Room::create(config(&["Ana", "   "])),
            Err(CreateError::Name {
                source: NameError::Empty,
                ..
            })
        ));

        assert!(matches!(
            Room::create(config(&["Ana", "Ana"])),
            Err(CreateError::Name {
                source: NameError::Taken,
                ..
            })
        ));

        let long = "x".repeat(limits::MAX_PARTICIPANT_NAME_LENGTH + 1);
        assert!(matches!(
            Room::create(config(&["Ana", &long])),
            Err(CreateError::Name {
                source: NameError::TooLong,
                ..
            })
        ));

        assert!(matches!(
            Room::create(config(&["Ana", "fuck"])),
            Err(CreateError::Name {
                source: NameError::Inappropriate,
                ..
            })
        ));
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let mut bad = config(&["Ana"]);
        bad.name = String::new();
        assert!(matches!(
            Room::create(bad),
            Err(CreateError::InvalidConfig(_))
        ));

        let mut bad = config(&["Ana"]);
        bad.participants.clear();
        assert!(matches!(
            Room::create(bad),
            Err(CreateError::InvalidConfig(_))
        ));

        let mut bad = config(&["Ana"]);
        bad.subjects.clear();
        assert!(matches!(
            Room::create(bad),
            Err(CreateError::InvalidConfig(_))
        ));

        let mut bad = config(&["Ana"]);
        bad.question_count = 0;
        assert!(matches!(
            Room::create(bad),
            Err(CreateError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_select_players_validates() {
        let mut room = Room::create(config(&["Ana", "Bruno"])).unwrap();

        assert!(matches!(
            room.select_players(&[]),
            Err(Error::NoPlayersSelected)
        ));

        let stranger = ParticipantId::new();
        assert!(matches!(
            room.select_players(&[stranger]),
            Err(Error::UnknownParticipant(id)) if id == stranger
        ));

        let ana = room.participants()[0].id;
        room.select_players(&[ana, ana]).unwrap();
        assert_eq!(room.designated_scorer(), Some(ana));
    }

    #[test]
    fn test_start_requires_selection_and_questions() {
        fastrand::seed(21);
        let mut room = Room::create(config(&["Ana"])).unwrap();
        assert!(matches!(
            room.start(&pool("a", 5), sink()),
            Err(Error::NoPlayersSelected)
        ));

        let mut room = ready_room(&["Ana"]);
        assert!(matches!(
            room.start(&pool("other", 5), sink()),
            Err(Error::NoQuestionsAvailable)
        ));

        room.start(&pool("a", 5), sink()).unwrap();
        assert_eq!(room.status(), Status::Playing(QuestionPhase::AwaitingAnswer));
        assert!(matches!(
            room.start(&pool("a", 5), sink()),
            Err(Error::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_start_truncates_to_question_count() {
        fastrand::seed(22);
        let mut room = ready_room(&["Ana"]);
        room.start(&pool("a", 10), sink()).unwrap();
        assert_eq!(room.current_view().unwrap().count, 3);
    }

    #[test]
    fn test_correct_answer_credits_designated_scorer_only() {
        fastrand::seed(23);
        let mut room = ready_room(&["Ana", "Bruno"]);
        room.start(&pool("a", 5), sink()).unwrap();

        let ana = room.participants()[0].id;
        let outcome = room.submit_answer(correct_slot(&room), sink()).unwrap();

        assert!(outcome.correct);
        assert_eq!(outcome.scorer, Some(ana));
        assert_eq!(room.participants()[0].score, limits::POINTS_PER_CORRECT);
        assert_eq!(room.participants()[1].score, 0);
        assert_eq!(
            room.status(),
            Status::Playing(QuestionPhase::AnswerRevealed)
        );
    }

    #[test]
    fn test_wrong_answer_awards_nothing() {
        fastrand::seed(24);
        let mut room = ready_room(&["Ana"]);
        room.start(&pool("a", 5), sink()).unwrap();

        let outcome = room.submit_answer(wrong_slot(&room), sink()).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.scorer, None);
        assert_eq!(room.participants()[0].score, 0);
    }

    #[test]
    fn test_answer_phase_enforced() {
        fastrand::seed(25);
        let mut room = ready_room(&["Ana"]);
        room.start(&pool("a", 5), sink()).unwrap();
        let slot = correct_slot(&room);

        assert!(matches!(
            room.advance(sink()),
            Err(Error::InvalidStatus { .. })
        ));

        room.submit_answer(slot, sink()).unwrap();
        assert!(matches!(
            room.submit_answer(slot, sink()),
            Err(Error::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_full_play_through_and_standings() {
        fastrand::seed(26);
        let mut room = ready_room(&["Ana", "Bruno"]);
        room.start(&pool("a", 5), sink()).unwrap();

        assert!(matches!(
            room.standings(),
            Err(Error::InvalidStatus { .. })
        ));

        // Three questions: two correct, one wrong.
        room.submit_answer(correct_slot(&room), sink()).unwrap();
        assert_eq!(room.advance(sink()).unwrap(), Advanced::Next { index: 1 });

        room.submit_answer(wrong_slot(&room), sink()).unwrap();
        assert_eq!(room.advance(sink()).unwrap(), Advanced::Next { index: 2 });

        room.submit_answer(correct_slot(&room), sink()).unwrap();

        let mut finished_standings = None;
        assert_eq!(
            room.advance(|event| {
                if let crate::Event::Room(Event::Finished { standings }) = event {
                    finished_standings = Some(standings);
                }
            })
            .unwrap(),
            Advanced::Finished
        );

        assert_eq!(room.status(), Status::Results);
        let standings = room.standings().unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].position, 1);
        assert_eq!(standings[0].name, "Ana");
        assert_eq!(standings[0].score, 20);
        assert_eq!(standings[1].score, 0);
        assert_eq!(finished_standings.as_deref(), Some(standings));
    }

    #[test]
    fn test_restart_resets_scores_and_standings() {
        fastrand::seed(27);
        let mut room = ready_room(&["Ana"]);
        room.start(&pool("a", 5), sink()).unwrap();

        for _ in 0..3 {
            room.submit_answer(correct_slot(&room), sink()).unwrap();
            room.advance(sink()).unwrap();
        }
        assert_eq!(room.status(), Status::Results);
        assert_eq!(room.standings().unwrap()[0].score, 30);

        // Results back to Selecting, fresh scores.
        let ana = room.participants()[0].id;
        room.select_players(&[ana]).unwrap();
        assert_eq!(room.status(), Status::Selecting);
        assert_eq!(room.participants()[0].score, 0);

        room.start(&pool("a", 5), sink()).unwrap();
        room.submit_answer(correct_slot(&room), sink()).unwrap();
        room.advance(sink()).unwrap();
        room.submit_answer(wrong_slot(&room), sink()).unwrap();
        room.advance(sink()).unwrap();
        room.submit_answer(wrong_slot(&room), sink()).unwrap();
        room.advance(sink()).unwrap();

        assert_eq!(room.standings().unwrap()[0].score, 10);
    }

    #[test]
    fn test_select_players_rejected_while_playing() {
        fastrand::seed(28);
        let mut room = ready_room(&["Ana"]);
        let ana = room.participants()[0].id;
        room.start(&pool("a", 5), sink()).unwrap();

        assert!(matches!(
            room.select_players(&[ana]),
            Err(Error::InvalidStatus {
                expected: StatusKind::Selecting,
                found: StatusKind::Playing,
            })
        ));
    }

    #[test]
    fn test_room_serde_round_trip() {
        fastrand::seed(29);
        let mut room = ready_room(&["Ana", "Bruno"]);
        room.start(&pool("a", 5), sink()).unwrap();
        room.submit_answer(correct_slot(&room), sink()).unwrap();

        let json = serde_json::to_string(&room).unwrap();
        let back: Room = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id(), room.id());
        assert_eq!(back.name(), room.name());
        assert_eq!(back.status(), room.status());
        assert_eq!(back.participants()[0].score, limits::POINTS_PER_CORRECT);
        assert_eq!(back.designated_scorer(), room.designated_scorer());
    }
}
