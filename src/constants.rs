//! Configuration constants for the trivia engine
//!
//! This module contains the limits and scoring parameters used throughout
//! the engine to ensure data integrity and provide consistent boundaries
//! for rounds, questions, and rooms.

/// Question content configuration constants
pub mod question {
    /// Minimum length of a question prompt in characters
    pub const MIN_PROMPT_LENGTH: usize = 1;
    /// Maximum length of a question prompt in characters
    pub const MAX_PROMPT_LENGTH: usize = 300;
    /// Maximum length of a single answer option in characters
    pub const MAX_OPTION_LENGTH: usize = 200;
    /// Minimum number of answer options for a question
    pub const MIN_OPTION_COUNT: usize = 2;
    /// Maximum number of answer options for a question
    pub const MAX_OPTION_COUNT: usize = 5;
}

/// Round configuration and scoring constants
pub mod round {
    /// Minimum number of questions in a round
    pub const MIN_QUESTION_COUNT: usize = 1;
    /// Maximum number of questions in a round
    pub const MAX_QUESTION_COUNT: usize = 50;
    /// Minimum time budget per question in seconds
    pub const MIN_TIME_PER_QUESTION: u32 = 5;
    /// Maximum time budget per question in seconds
    pub const MAX_TIME_PER_QUESTION: u32 = 240;
    /// Points awarded for any correct answer before bonuses
    pub const BASE_POINTS: u32 = 10;
    /// Maximum time bonus, earned by answering with the full budget left
    pub const MAX_TIME_BONUS: u32 = 10;
    /// Extra points per consecutive correct answer already on the streak
    pub const STREAK_BONUS_STEP: u32 = 2;
    /// Cap on the streak bonus regardless of streak length
    pub const MAX_STREAK_BONUS: u32 = 10;
}

/// Room (group play) configuration constants
pub mod room {
    /// Minimum length of a room name in characters
    pub const MIN_NAME_LENGTH: usize = 1;
    /// Maximum length of a room name in characters
    pub const MAX_NAME_LENGTH: usize = 100;
    /// Maximum length of a participant name in characters
    pub const MAX_PARTICIPANT_NAME_LENGTH: usize = 30;
    /// Maximum number of participants in a room
    pub const MAX_PARTICIPANT_COUNT: usize = 50;
    /// Fixed points per correct answer in room play (no bonuses)
    pub const POINTS_PER_CORRECT: u32 = 10;
}
