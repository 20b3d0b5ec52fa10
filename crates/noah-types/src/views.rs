//! Read-only renderings of world state handed to player strategies.
//!
//! Views are built fresh every turn from ground truth and never alias engine
//! state: a strategy may keep or mutate them freely without affecting the
//! simulation.

use serde::{Deserialize, Serialize};

use crate::enums::{Gender, Kind};
use crate::ids::{AnimalId, HelperId, SpeciesId};
use crate::structs::{Animal, CellCoord};

/// An animal as seen from some observer.
///
/// The real gender is only present when the observer stands in the animal's
/// cell; from any other cell it shows up as [`Gender::Unknown`]. The handle
/// is only present for free animals in the observer's own cell, since those
/// are the only ones it could obtain. Animals carried by a helper standing in
/// the cell are listed too, always without a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisibleAnimal {
    /// Species of the animal.
    pub species: SpeciesId,
    /// Gender, or `Unknown` when redacted.
    pub gender: Gender,
    /// Arena handle, only revealed to a co-located observer.
    pub id: Option<AnimalId>,
    /// Whether the animal sits in the flock of a helper in this cell.
    #[serde(default)]
    pub carried: bool,
}

impl VisibleAnimal {
    /// Render an animal, redacting it unless `revealed` is set.
    pub const fn render(animal: &Animal, revealed: bool) -> Self {
        if revealed {
            Self {
                species: animal.species,
                gender: animal.gender,
                id: Some(animal.id),
                carried: false,
            }
        } else {
            Self {
                species: animal.species,
                gender: Gender::Unknown,
                id: None,
                carried: false,
            }
        }
    }

    /// Render an animal carried by a helper. The handle is never shown.
    pub const fn render_carried(animal: &Animal, revealed: bool) -> Self {
        Self {
            species: animal.species,
            gender: if revealed {
                animal.gender
            } else {
                Gender::Unknown
            },
            id: None,
            carried: true,
        }
    }
}

/// Public identity of a helper: who it is, never what it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HelperView {
    /// Helper identifier.
    pub id: HelperId,
    /// Role of the helper.
    pub kind: Kind,
}

impl HelperView {
    /// Build the view for a helper id; id 0 is always Noah.
    pub const fn of(id: HelperId) -> Self {
        let kind = if id.is_noah() { Kind::Noah } else { Kind::Helper };
        Self { id, kind }
    }

    /// Compact name such as `N` or `H3`.
    pub fn short_name(&self) -> String {
        match self.kind {
            Kind::Noah => String::from("N"),
            Kind::Helper => format!("{}{}", self.kind.tag(), self.id),
        }
    }
}

impl core::fmt::Display for HelperView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            Kind::Noah => write!(f, "{}", self.kind),
            Kind::Helper => write!(f, "{} {}", self.kind, self.id),
        }
    }
}

/// A visible grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// Coordinate of the cell.
    pub coord: CellCoord,
    /// Free animals in the cell followed by the animals carried by the
    /// cell's helpers, each group ordered by `(species, gender, id)`.
    pub animals: Vec<VisibleAnimal>,
    /// Helpers standing in the cell, ordered by id.
    pub helpers: Vec<HelperView>,
}

impl CellView {
    /// Whether any animal is visible in the cell, carried or not.
    pub fn has_animals(&self) -> bool {
        !self.animals.is_empty()
    }

    /// Animals standing free in the cell.
    pub fn free_animals(&self) -> impl Iterator<Item = &VisibleAnimal> + '_ {
        self.animals.iter().filter(|a| !a.carried)
    }

    /// Whether any free animal is visible in the cell.
    pub fn has_free_animals(&self) -> bool {
        self.free_animals().next().is_some()
    }

    /// Handles of the animals in the cell that can be obtained, i.e. those
    /// revealed to a co-located observer.
    pub fn obtainable(&self) -> impl Iterator<Item = AnimalId> + '_ {
        self.animals.iter().filter_map(|a| a.id)
    }
}

/// Snapshot of the ark's delivered animals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArkView {
    /// Ark cell.
    pub position: CellCoord,
    /// Delivered animals with their real genders, ordered by handle.
    pub animals: Vec<Animal>,
}

impl ArkView {
    /// Whether an animal of the given species and gender has been delivered.
    pub fn contains(&self, species: SpeciesId, gender: Gender) -> bool {
        self.animals
            .iter()
            .any(|a| a.species == species && a.gender == gender)
    }
}

/// A one-byte broadcast received from a helper within communication range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Public identity of the sender.
    pub from: HelperView,
    /// Payload byte.
    pub contents: u8,
}
