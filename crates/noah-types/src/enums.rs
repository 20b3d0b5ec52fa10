//! Enumeration types for the Noah's Ark simulation.

use serde::{Deserialize, Serialize};

/// Gender of an animal, as reported in a view.
///
/// Ground-truth animals are always `Male` or `Female`. `Unknown` only ever
/// appears in views rendered for an observer standing outside the animal's
/// cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male animal.
    Male,
    /// Female animal.
    Female,
    /// Gender redacted for a distant observer.
    Unknown,
}

impl Gender {
    /// Whether the gender is a concrete, ground-truth value.
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Role of a helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Noah: never moves, never acts.
    Noah,
    /// A mobile helper that can move, obtain, and release animals.
    Helper,
}

impl Kind {
    /// One-letter tag used in short display names.
    pub const fn tag(self) -> char {
        match self {
            Self::Noah => 'N',
            Self::Helper => 'H',
        }
    }
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Noah => f.write_str("Noah"),
            Self::Helper => f.write_str("Helper"),
        }
    }
}
