//! Snapshot assembly for the observation phase of a turn.
//!
//! Each turn the engine builds one [`Snapshot`] per helper. It contains
//! everything the helper is allowed to know: the turn number, the rain flag,
//! its own position and flock, what it can see, and (only while docked) the
//! ark as it was at the start of the turn.
//!
//! Everything in a snapshot is an owned copy. Strategies may keep or modify
//! it without touching engine state.

use noah_agents::HelperState;
use noah_types::{Animal, ArkView, CellCoord, Position};
use noah_world::{AnimalArena, FlockIndex, Grid, Rules, Sight, WorldError};

/// Per-helper observation for one turn.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Turns completed before this one.
    pub time_elapsed: u32,
    /// Whether the flood has started.
    pub is_raining: bool,
    /// The helper's own position.
    pub position: Position,
    /// Cells in sight.
    pub sight: Sight,
    /// Carried animals, with real genders.
    pub flock: Vec<Animal>,
    /// The ark at turn start, present only when the helper is docked.
    pub ark_view: Option<ArkView>,
}

/// World state shared by every snapshot assembled in one turn.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotContext<'a> {
    /// Turns completed before this one.
    pub time_elapsed: u32,
    /// Whether the flood has started.
    pub is_raining: bool,
    /// The grid.
    pub grid: &'a Grid,
    /// Animal records.
    pub animals: &'a AnimalArena,
    /// What every helper carries at turn start.
    pub flocks: &'a FlockIndex,
    /// World constants.
    pub rules: &'a Rules,
    /// Ark cell.
    pub ark: CellCoord,
    /// Ark contents captured before any unloading this turn.
    pub ark_view: &'a ArkView,
}

/// Assemble the snapshot for one helper.
///
/// # Errors
///
/// Returns [`WorldError::UnknownAnimal`] if the helper's flock or a visible
/// cell refers to an animal missing from the arena.
pub fn assemble_snapshot(
    helper: &HelperState,
    ctx: &SnapshotContext<'_>,
) -> Result<Snapshot, WorldError> {
    let sight = Sight::with_flocks(
        helper.position,
        ctx.rules.sight_radius,
        ctx.grid,
        ctx.animals,
        ctx.flocks,
    )?;

    let flock = helper
        .flock
        .iter()
        .map(|&id| ctx.animals.require(id).copied())
        .collect::<Result<Vec<_>, _>>()?;

    let ark_view = helper
        .is_in_ark(ctx.ark, ctx.rules)
        .then(|| ctx.ark_view.clone());

    Ok(Snapshot {
        time_elapsed: ctx.time_elapsed,
        is_raining: ctx.is_raining,
        position: helper.position,
        sight,
        flock,
        ark_view,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use noah_types::{Gender, HelperId, SpeciesId};

    use super::*;

    #[test]
    fn ark_view_only_when_docked() {
        let grid = Grid::new(10, 10).unwrap();
        let mut animals = AnimalArena::new();
        let carried = animals.spawn(SpeciesId::new(1), Gender::Male).unwrap();
        let rules = Rules {
            width: 10,
            height: 10,
            ..Rules::default()
        };
        let ark_view = ArkView {
            position: CellCoord::new(0, 0),
            animals: Vec::new(),
        };
        let ctx = SnapshotContext {
            time_elapsed: 3,
            is_raining: false,
            grid: &grid,
            animals: &animals,
            flocks: &FlockIndex::new(),
            rules: &rules,
            ark: CellCoord::new(0, 0),
            ark_view: &ark_view,
        };

        let docked = HelperState::new(HelperId::new(1), Position::new(0.0, 0.0));
        let mut away = HelperState::new(HelperId::new(2), Position::new(0.5, 0.0));
        away.flock.insert(carried);

        let snap = assemble_snapshot(&docked, &ctx).unwrap();
        assert_eq!(snap.ark_view, Some(ark_view.clone()));
        assert_eq!(snap.time_elapsed, 3);
        assert!(snap.flock.is_empty());

        let snap = assemble_snapshot(&away, &ctx).unwrap();
        assert_eq!(snap.ark_view, None);
        assert_eq!(snap.flock.len(), 1);
        assert_eq!(snap.flock.first().map(|a| a.gender), Some(Gender::Male));
    }

    #[test]
    fn snapshot_flock_is_a_copy() {
        let grid = Grid::new(4, 4).unwrap();
        let mut animals = AnimalArena::new();
        let a = animals.spawn(SpeciesId::new(0), Gender::Female).unwrap();
        let rules = Rules::default();
        let ark_view = ArkView {
            position: CellCoord::new(0, 0),
            animals: Vec::new(),
        };
        let ctx = SnapshotContext {
            time_elapsed: 0,
            is_raining: false,
            grid: &grid,
            animals: &animals,
            flocks: &FlockIndex::new(),
            rules: &rules,
            ark: CellCoord::new(0, 0),
            ark_view: &ark_view,
        };
        let mut helper = HelperState::new(HelperId::new(1), Position::new(1.0, 1.0));
        helper.flock.insert(a);

        let mut snap = assemble_snapshot(&helper, &ctx).unwrap();
        snap.flock.clear();
        assert!(helper.flock.contains(&a));
    }
}
