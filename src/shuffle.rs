//! Random permutation and answer-slot mapping primitives
//!
//! This module provides the uniform shuffle used for question ordering and
//! the per-question mapping between presentation slots (the positions of the
//! on-screen answer buttons) and the underlying answer options. Regenerating
//! the mapping for every question keeps the correct answer's displayed
//! position unpredictable.

use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::question::OptionId;

/// Permutes a slice uniformly at random in place.
///
/// Standard unbiased Fisher-Yates: scanning from the end, element `i` is
/// swapped with a uniformly chosen element at index `<= i`, so every
/// permutation is produced with equal probability.
pub fn shuffle<T>(items: &mut [T]) {
    for i in (1..items.len()).rev() {
        items.swap(i, fastrand::usize(..=i));
    }
}

/// A presentation-facing position for an answer option
///
/// Slots identify the on-screen answer buttons and are stable across
/// questions; which option a slot shows is decided by the per-question
/// [`OptionMapping`]. Displayed as letters (`A`, `B`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(usize);

impl Slot {
    /// Creates a slot from its zero-based position
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the zero-based position of this slot
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for Slot {
    /// Formats the slot as the letter shown on its answer button
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match u8::try_from(self.0) {
            Ok(i) if i < 26 => write!(f, "{}", char::from(b'A' + i)),
            _ => write!(f, "#{}", self.0),
        }
    }
}

/// A per-question bijection between slots and answer options
///
/// Exactly one slot resolves to each option, so exactly one slot resolves
/// to the correct one. A fresh mapping is generated for every question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionMapping {
    /// The option shown in each slot, indexed by slot position
    slots: Vec<OptionId>,
}

impl OptionMapping {
    /// Generates a uniformly random mapping for a question with
    /// `option_count` options.
    pub fn generate(option_count: usize) -> Self {
        let mut slots = (0..option_count).map(OptionId::new).collect_vec();
        shuffle(&mut slots);
        Self { slots }
    }

    /// Resolves a slot to the option it displays
    ///
    /// Returns `None` for slots beyond the question's option count.
    pub fn resolve(&self, slot: Slot) -> Option<OptionId> {
        self.slots.get(slot.index()).copied()
    }

    /// Finds the slot displaying a specific option
    pub fn slot_of(&self, option: OptionId) -> Option<Slot> {
        self.slots.iter().position(|o| *o == option).map(Slot::new)
    }

    /// Returns the number of slots in this mapping
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Checks whether the mapping has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over `(slot, option)` pairs in slot order
    pub fn entries(&self) -> impl Iterator<Item = (Slot, OptionId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, o)| (Slot::new(i), *o))
    }
}
