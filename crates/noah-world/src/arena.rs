//! Arena owning every animal record.
//!
//! Animals are created once at setup and never destroyed. Every container in
//! the simulation (cells, flocks, the ark) stores [`AnimalId`] handles that
//! index into this arena, so identity is handle equality.

use noah_types::{Animal, AnimalId, Gender, SpeciesId};

use crate::error::WorldError;

/// Append-only store of ground-truth animal records.
#[derive(Debug, Clone, Default)]
pub struct AnimalArena {
    animals: Vec<Animal>,
}

impl AnimalArena {
    /// Create an empty arena.
    pub const fn new() -> Self {
        Self {
            animals: Vec::new(),
        }
    }

    /// Create a new animal and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArenaFull`] if the handle space is exhausted.
    pub fn spawn(&mut self, species: SpeciesId, gender: Gender) -> Result<AnimalId, WorldError> {
        let raw = u32::try_from(self.animals.len()).map_err(|_err| WorldError::ArenaFull)?;
        let id = AnimalId::new(raw);
        self.animals.push(Animal {
            id,
            species,
            gender,
        });
        Ok(id)
    }

    /// Look up an animal by handle.
    pub fn get(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.get(id.index())
    }

    /// Look up an animal by handle, failing on unknown handles.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAnimal`] if the handle was never issued.
    pub fn require(&self, id: AnimalId) -> Result<&Animal, WorldError> {
        self.get(id).ok_or(WorldError::UnknownAnimal(id))
    }

    /// Number of animals ever created.
    pub fn len(&self) -> usize {
        self.animals.len()
    }

    /// Whether the arena holds no animals.
    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// Iterate over all animals in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &Animal> {
        self.animals.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_dense_and_stable() {
        let mut arena = AnimalArena::new();
        let a = arena.spawn(SpeciesId::new(0), Gender::Male).unwrap();
        let b = arena.spawn(SpeciesId::new(0), Gender::Male).unwrap();
        assert_eq!(a, AnimalId::new(0));
        assert_eq!(b, AnimalId::new(1));
        // Same species and gender, still two distinct animals.
        assert_ne!(arena.get(a), arena.get(b));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn unknown_handle_is_an_error() {
        let arena = AnimalArena::new();
        assert_eq!(
            arena.require(AnimalId::new(3)).err(),
            Some(WorldError::UnknownAnimal(AnimalId::new(3)))
        );
    }
}
