//! Room identifier generation
//!
//! Rooms are shared by telling other people their identifier, so the
//! identifiers are short random numbers displayed in octal: four digits,
//! no digits above 7, easy to read out loud without ambiguity.

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use enum_map::{Enum, EnumArray};
use serde::{Deserialize, Deserializer, Serialize};

/// Minimum value for generated room IDs (in octal: 1000)
const MIN_VALUE: u16 = 0o1_000;
/// Maximum value for generated room IDs (in octal: 10000)
const MAX_VALUE: u16 = 0o10_000;

/// A shareable identifier for a room
///
/// Generated randomly within a range that always displays as a 4-digit
/// octal number. The `Enum` impl lets embedders keep dense registries of
/// rooms keyed directly by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(u16);

impl RoomId {
    /// Creates a new random room ID
    pub fn new() -> Self {
        Self(fastrand::u16(MIN_VALUE..MAX_VALUE))
    }
}

impl Default for RoomId {
    /// Creates a new random room ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoomId {
    /// Formats the room ID as a 4-digit octal number
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl Serialize for RoomId {
    /// Serializes the room ID as an octal string
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RoomId {
    /// Deserializes a room ID from an octal string
    fn deserialize<D>(deserializer: D) -> Result<RoomId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RoomId::from_str(&s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

impl FromStr for RoomId {
    type Err = ParseIntError;

    /// Parses a room ID from its octal string representation
    ///
    /// # Errors
    ///
    /// Returns a `ParseIntError` if the string is not a valid octal number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(u16::from_str_radix(s, 8)?))
    }
}

impl Enum for RoomId {
    /// Total number of possible room IDs
    const LENGTH: usize = (MAX_VALUE - MIN_VALUE) as usize;

    /// Creates a room ID from a usize index
    ///
    /// # Panics
    ///
    /// Panics if the value is out of range.
    fn from_usize(value: usize) -> Self {
        Self(u16::try_from(value).expect("index out of range for Enum::from_usize") + MIN_VALUE)
    }

    /// Converts the room ID to a usize index, clamped to the valid range
    fn into_usize(self) -> usize {
        usize::from(self.0.saturating_sub(MIN_VALUE)).min(RoomId::LENGTH - 1)
    }
}

impl<V> EnumArray<V> for RoomId {
    /// Array type for storing values indexed by `RoomId`
    type Array = [V; Self::LENGTH];
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_in_range() {
        for _ in 0..100 {
            let id = RoomId::new();
            assert!(id.0 >= MIN_VALUE);
            assert!(id.0 < MAX_VALUE);
        }
    }

    #[test]
    fn test_room_id_display_format() {
        assert_eq!(RoomId(MIN_VALUE).to_string(), "1000");
        assert_eq!(RoomId(0o4_321).to_string(), "4321");
        assert_eq!(RoomId(MAX_VALUE - 1).to_string(), "7777");
    }

    #[test]
    fn test_room_id_from_str() {
        assert_eq!(RoomId::from_str("1000").unwrap(), RoomId(MIN_VALUE));
        assert_eq!(RoomId::from_str("4321").unwrap(), RoomId(0o4_321));
        assert!(RoomId::from_str("89").is_err());
        assert!(RoomId::from_str("room").is_err());
        assert!(RoomId::from_str("").is_err());
    }

    #[test]
    fn test_room_id_serde_round_trip() {
        let id = RoomId(0o4_321);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"4321\"");

        let back: RoomId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_room_id_deserialization_rejects_numbers() {
        let result: Result<RoomId, _> = serde_json::from_str("4321");
        assert!(result.is_err());
    }

    #[test]
    fn test_room_id_enum_round_trip() {
        let id = RoomId(MIN_VALUE + 7);
        assert_eq!(RoomId::from_usize(id.into_usize()), id);

        let clamped = RoomId(MAX_VALUE + 5);
        assert_eq!(clamped.into_usize(), RoomId::LENGTH - 1);
    }
}
