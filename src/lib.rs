//! # Trivia Round Engine
//!
//! This library implements the core of a trivia quiz game: a single-player
//! round state machine with per-question timing, scoring, and streak
//! tracking, a room variant for local group play, the question model and
//! shuffle primitives they share, and a score-submission seam with explicit
//! success/failure.
//!
//! The crate is a pure engine. Callers drive it with synchronous operations
//! (timer ticks, answers, advances) and observe it through emitted events
//! and snapshots; all rendering, persistence, and network glue stays
//! outside.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]

use std::collections::HashSet;

use serde::Serialize;

pub mod constants;
pub mod question;
pub mod room;
pub mod room_id;
pub mod round;
pub mod scoring;
pub mod shuffle;
pub mod submit;

/// Observable events emitted by the engine's state machines
///
/// Every mutating operation on a round or room reports what happened
/// through one of these, so a presentation layer can render the new state
/// without polling. How the events travel (callback, channel, message bus)
/// is the caller's concern.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum Event {
    /// Single-player round events
    Round(round::Event),
    /// Room (group play) events
    Room(room::Event),
}

impl Event {
    /// Converts the event to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Validates that a subject selection is not empty
///
/// Shared garde validator for round and room configurations.
pub(crate) fn subjects_not_empty(subjects: &HashSet<question::Subject>) -> garde::Result {
    if subjects.is_empty() {
        Err(garde::Error::new("at least one subject must be selected"))
    } else {
        Ok(())
    }
}
