//! The room oracle: every world query and mutation the planner performs goes
//! through `RoomOracle`. Implementations exist for offline use (`SimRoom`) and
//! can be provided by the host bot for the live game.

use crate::kind::StructureKind;
use crate::location::*;
use crate::terrain::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a construction request (or removal) was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("tile is already occupied")]
    Occupied,
    #[error("structure cannot be placed at the target")]
    InvalidTarget,
    #[error("construction site limit reached")]
    Full,
    #[error("room level too low for another structure of this kind")]
    RclNotEnough,
    #[error("no such construction site")]
    NotFound,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorRole {
    Spawn,
    Source,
    Controller,
}

/// A fixed reference point used as a placement origin or path endpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub location: Location,
    pub role: AnchorRole,
}

impl Anchor {
    pub fn new(location: Location, role: AnchorRole) -> Self {
        Anchor { location, role }
    }
}

/// A pending, not-yet-completed build request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionEntry {
    pub location: Location,
    pub kind: StructureKind,
    pub progress: u32,
    pub progress_total: u32,
}

impl ConstructionEntry {
    pub fn new(location: Location, kind: StructureKind, progress_total: u32) -> Self {
        ConstructionEntry {
            location,
            kind,
            progress: 0,
            progress_total,
        }
    }

    pub fn with_progress(mut self, progress: u32) -> Self {
        self.progress = progress.min(self.progress_total);
        self
    }
}

/// Energy held by a structure's store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyStore {
    pub used: u32,
    pub capacity: u32,
}

impl EnergyStore {
    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used)
    }
}

/// Snapshot of a built structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub location: Location,
    pub kind: StructureKind,
    pub hits: u32,
    pub hits_max: u32,
    pub store: Option<EnergyStore>,
}

impl Structure {
    pub fn new(location: Location, kind: StructureKind, hits: u32, hits_max: u32) -> Self {
        Structure {
            location,
            kind,
            hits,
            hits_max,
            store: None,
        }
    }

    pub fn with_store(mut self, used: u32, capacity: u32) -> Self {
        self.store = Some(EnergyStore { used, capacity });
        self
    }
}

/// Options for a bounded path search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathOptions {
    /// Treat creeps as passable.
    pub ignore_creeps: bool,
    /// Treat destructible structures (and pending sites) as passable.
    pub ignore_destructible: bool,
    /// Cost of a swamp tile relative to a plain tile (cost 1).
    pub swamp_cost: u32,
    /// Maximum number of node expansions before the search gives up.
    pub max_ops: u32,
}

impl PathOptions {
    /// Options used when laying out roads: route around structures,
    /// swamps cost the same as plains.
    pub fn road(max_ops: u32) -> Self {
        PathOptions {
            ignore_creeps: true,
            ignore_destructible: false,
            swamp_cost: 1,
            max_ops,
        }
    }

    /// Options used for connectivity probes: only terrain blocks.
    pub fn probe(max_ops: u32) -> Self {
        PathOptions {
            ignore_creeps: true,
            ignore_destructible: true,
            swamp_cost: 5,
            max_ops,
        }
    }
}

impl Default for PathOptions {
    fn default() -> Self {
        PathOptions {
            ignore_creeps: true,
            ignore_destructible: false,
            swamp_cost: 5,
            max_ops: 2000,
        }
    }
}

/// World and grid oracle for a single room.
///
/// Read methods describe the room as of the call; the planner never caches
/// their results across calls.
pub trait RoomOracle {
    fn terrain(&self) -> &FastRoomTerrain;

    /// Terrain passability only.
    fn is_passable(&self, location: Location) -> bool {
        !self.terrain().is_wall(location.x(), location.y())
    }

    fn structures(&self) -> Vec<Structure>;

    fn construction_sites(&self) -> Vec<ConstructionEntry>;

    fn spawns(&self) -> Vec<Anchor>;

    fn sources(&self) -> Vec<Anchor>;

    fn controller(&self) -> Option<Anchor>;

    /// Controller level, 0 when the room has no owned controller.
    fn controller_level(&self) -> u8;

    fn structures_at(&self, location: Location) -> Vec<StructureKind> {
        self.structures()
            .into_iter()
            .filter(|s| s.location == location)
            .map(|s| s.kind)
            .collect()
    }

    fn sites_at(&self, location: Location) -> Vec<StructureKind> {
        self.construction_sites()
            .into_iter()
            .filter(|s| s.location == location)
            .map(|s| s.kind)
            .collect()
    }

    /// Shortest path from `from` to `to`, excluding `from` and including `to`.
    /// Empty when no path exists within the operation budget.
    fn find_path(&self, from: Location, to: Location, options: &PathOptions) -> Vec<Location>;

    /// Index of the candidate with the shortest path from `origin`.
    fn nearest_by_path(&self, origin: Location, candidates: &[Location]) -> Option<usize>;

    fn create_site(&mut self, location: Location, kind: StructureKind)
        -> Result<(), PlacementError>;

    fn remove_site(&mut self, entry: &ConstructionEntry) -> Result<(), PlacementError>;
}

/// Whether a bounded path connects `from` and `to`. Identical points are
/// trivially connected.
pub fn is_connected<R: RoomOracle + ?Sized>(
    room: &R,
    from: Location,
    to: Location,
    options: &PathOptions,
) -> bool {
    from == to || !room.find_path(from, to, options).is_empty()
}
