//! Type-safe identifier wrappers around `u32` handles.
//!
//! Animals are stored in an arena and addressed by stable integer handles so
//! that two animals of the same species and gender stay distinguishable.
//! Helpers are numbered densely from 0, where 0 is always Noah.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around a `u32` handle with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Wrap a raw handle value.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Return the inner handle value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }

            /// Return the handle as a `usize` index.
            pub fn index(self) -> usize {
                usize::try_from(self.0).unwrap_or(usize::MAX)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Handle of an animal record in the world's animal arena.
    AnimalId
}

define_id! {
    /// Identifier of a helper. `HelperId(0)` is reserved for Noah.
    HelperId
}

define_id! {
    /// Identifier of an animal species.
    SpeciesId
}

impl HelperId {
    /// The immobile Noah, who stays on the ark for the whole run.
    pub const NOAH: Self = Self(0);

    /// Whether this id belongs to Noah.
    pub const fn is_noah(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for AnimalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl core::fmt::Display for HelperId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SpeciesId {
    /// Single-letter label for the species: `a` for 0, `b` for 1, and so on.
    ///
    /// Ids past `z` fall back to `?`.
    pub fn letter(self) -> char {
        u8::try_from(self.0)
            .ok()
            .and_then(|offset| b'a'.checked_add(offset))
            .filter(u8::is_ascii_lowercase)
            .map_or('?', char::from)
    }
}

impl core::fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.letter())
    }
}
