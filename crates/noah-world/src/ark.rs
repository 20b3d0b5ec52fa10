//! The ark: delivery point and diversity scoring.
//!
//! Helpers standing on the ark unload their flocks into it. The delivered set
//! only ever grows. Scoring looks at which genders of each species have been
//! delivered, never at how many animals.

use std::collections::{BTreeMap, BTreeSet};

use noah_types::{AnimalId, ArkView, CellCoord, Gender, SpeciesId};
use serde::Serialize;
use tracing::debug;

use crate::arena::AnimalArena;
use crate::error::WorldError;
use crate::rules::Rules;

/// Initial population of one species, split by gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeciesCount {
    /// Number of males created at setup.
    pub male: u32,
    /// Number of females created at setup.
    pub female: u32,
}

/// Which genders of a species have been delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderPresence {
    /// At least one male is in the ark.
    pub male: bool,
    /// At least one female is in the ark.
    pub female: bool,
}

impl GenderPresence {
    /// Score contribution of this species.
    pub const fn score(self, rules: &Rules) -> u32 {
        match (self.male, self.female) {
            (true, true) => rules.score_both_genders,
            (true, false) | (false, true) => rules.score_single_gender,
            (false, false) => 0,
        }
    }
}

/// The fixed goal location and its delivered animals.
#[derive(Debug, Clone)]
pub struct Ark {
    position: CellCoord,
    animals: BTreeSet<AnimalId>,
    census: BTreeMap<SpeciesId, SpeciesCount>,
}

impl Ark {
    /// Create an empty ark at `position` for the given initial populations.
    pub const fn new(position: CellCoord, census: BTreeMap<SpeciesId, SpeciesCount>) -> Self {
        Self {
            position,
            animals: BTreeSet::new(),
            census,
        }
    }

    /// The ark's cell.
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Delivered animal handles.
    pub const fn animals(&self) -> &BTreeSet<AnimalId> {
        &self.animals
    }

    /// Initial per-species gender populations.
    pub const fn census(&self) -> &BTreeMap<SpeciesId, SpeciesCount> {
        &self.census
    }

    /// Whether the animal has been delivered.
    pub fn contains(&self, animal: AnimalId) -> bool {
        self.animals.contains(&animal)
    }

    /// Number of delivered animals.
    pub fn len(&self) -> usize {
        self.animals.len()
    }

    /// Whether nothing has been delivered yet.
    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    /// Absorb a flock into the ark. Returns how many animals were new.
    pub fn unload<I>(&mut self, flock: I) -> usize
    where
        I: IntoIterator<Item = AnimalId>,
    {
        let before = self.animals.len();
        self.animals.extend(flock);
        let added = self.animals.len().saturating_sub(before);
        if added > 0 {
            debug!(added, total = self.animals.len(), "Animals unloaded into ark");
        }
        added
    }

    /// Read-only rendering of the delivered animals with real genders.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAnimal`] for handles missing from the
    /// arena.
    pub fn view(&self, arena: &AnimalArena) -> Result<ArkView, WorldError> {
        let animals = self
            .animals
            .iter()
            .map(|&id| arena.require(id).copied())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ArkView {
            position: self.position,
            animals,
        })
    }

    /// Delivered genders per species, covering every species in the census.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAnimal`] for handles missing from the
    /// arena.
    pub fn presence(
        &self,
        arena: &AnimalArena,
    ) -> Result<BTreeMap<SpeciesId, GenderPresence>, WorldError> {
        let mut presence: BTreeMap<SpeciesId, GenderPresence> = self
            .census
            .keys()
            .map(|&species| (species, GenderPresence::default()))
            .collect();

        for &id in &self.animals {
            let animal = arena.require(id)?;
            let entry = presence.entry(animal.species).or_default();
            match animal.gender {
                Gender::Male => entry.male = true,
                Gender::Female => entry.female = true,
                Gender::Unknown => {}
            }
        }
        Ok(presence)
    }

    /// Diversity score of the current contents.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownAnimal`] for handles missing from the
    /// arena.
    pub fn score(&self, arena: &AnimalArena, rules: &Rules) -> Result<u32, WorldError> {
        Ok(self
            .presence(arena)?
            .values()
            .fold(0_u32, |acc, p| acc.saturating_add(p.score(rules))))
    }

    /// Highest score reachable with this census.
    pub fn max_score(&self, rules: &Rules) -> u32 {
        u32::try_from(self.census.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(rules.score_both_genders)
    }
}
