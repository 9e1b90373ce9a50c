//! In-memory room for offline planning, tests and benchmarking.
//!
//! `SimRoom` implements `RoomOracle` with the game's placement rules
//! (buildable area, one object per tile, room-level limits, the global
//! site cap) and an operation-bounded A* for path queries.

use crate::constants::*;
use crate::kind::StructureKind;
use crate::location::*;
use crate::room::*;
use crate::terrain::*;
use fnv::FnvHashSet;
use log::*;
use pathfinding::directed::astar::astar;
use std::cell::Cell;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map is larger than the room ({width}x{height})")]
    TooLarge { width: usize, height: usize },
    #[error("unknown map tile {tile:?} at ({x}, {y})")]
    UnknownTile { tile: char, x: usize, y: usize },
}

/// Energy needed to finish a construction site of the given kind.
pub fn construction_cost(kind: StructureKind) -> u32 {
    match kind {
        StructureKind::Spawn => 15_000,
        StructureKind::Extension => 3_000,
        StructureKind::Tower => 5_000,
        StructureKind::Storage => 30_000,
        StructureKind::Container => 5_000,
        StructureKind::Road => 300,
        StructureKind::Wall | StructureKind::Rampart => 1,
        StructureKind::Link => 5_000,
        StructureKind::Terminal => 100_000,
        StructureKind::Lab => 50_000,
        StructureKind::Factory => 100_000,
        StructureKind::Nuker => 100_000,
        StructureKind::Observer => 8_000,
        StructureKind::PowerSpawn => 100_000,
        StructureKind::Extractor => 5_000,
        StructureKind::Controller
        | StructureKind::KeeperLair
        | StructureKind::Portal
        | StructureKind::PowerBank
        | StructureKind::InvaderCore => 0,
    }
}

/// Hit points of a freshly completed structure.
pub fn default_hits(kind: StructureKind) -> u32 {
    match kind {
        StructureKind::Spawn => 5_000,
        StructureKind::Extension => 1_000,
        StructureKind::Tower => 3_000,
        StructureKind::Storage => 10_000,
        StructureKind::Container => 250_000,
        StructureKind::Road => 5_000,
        StructureKind::Wall => 300_000_000,
        StructureKind::Rampart => 300_000_000,
        StructureKind::Link => 1_000,
        StructureKind::Terminal => 3_000,
        StructureKind::Lab => 500,
        StructureKind::Factory => 1_000,
        StructureKind::Nuker => 1_000,
        StructureKind::Observer => 500,
        StructureKind::PowerSpawn => 5_000,
        StructureKind::Extractor => 500,
        StructureKind::Controller
        | StructureKind::KeeperLair
        | StructureKind::Portal
        | StructureKind::PowerBank
        | StructureKind::InvaderCore => 0,
    }
}

fn default_energy_capacity(kind: StructureKind) -> Option<u32> {
    match kind {
        StructureKind::Spawn => Some(300),
        StructureKind::Extension => Some(50),
        StructureKind::Tower => Some(1_000),
        _ => None,
    }
}

/// A structure at full health, with an empty store where the kind has one.
pub fn fresh_structure(location: Location, kind: StructureKind) -> Structure {
    let hits = default_hits(kind);
    let structure = Structure::new(location, kind, hits, hits);
    match default_energy_capacity(kind) {
        Some(capacity) => structure.with_store(0, capacity),
        None => structure,
    }
}

/// One `create_site` call and its outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SiteRequest {
    pub location: Location,
    pub kind: StructureKind,
    pub result: Result<(), PlacementError>,
}

#[derive(Clone)]
pub struct SimRoom {
    terrain: FastRoomTerrain,
    structures: Vec<Structure>,
    sites: Vec<ConstructionEntry>,
    sources: Vec<Location>,
    controller: Option<Location>,
    level: u8,
    site_requests: Vec<SiteRequest>,
}

impl SimRoom {
    pub fn new(terrain: FastRoomTerrain) -> Self {
        SimRoom {
            terrain,
            structures: Vec::new(),
            sites: Vec::new(),
            sources: Vec::new(),
            controller: None,
            level: 0,
            site_requests: Vec::new(),
        }
    }

    /// Build a room from an ASCII map anchored at (0, 0). Tiles the map does
    /// not cover are plain.
    ///
    /// | tile | meaning |
    /// |------|---------|
    /// | `.` or space | plain |
    /// | `#` | terrain wall |
    /// | `~` | swamp |
    /// | `S` | spawn |
    /// | `E` | energy source |
    /// | `C` | controller |
    /// | `x` | extension |
    /// | `T` | tower |
    /// | `r` | road |
    /// | `w` | constructed wall |
    /// | `X` | pending extension site |
    /// | `+` | pending road site |
    pub fn from_ascii(map: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = map.lines().collect();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if rows.len() > ROOM_HEIGHT as usize || width > ROOM_WIDTH as usize {
            return Err(MapError::TooLarge {
                width,
                height: rows.len(),
            });
        }

        let mut room = SimRoom::new(FastRoomTerrain::plain());

        for (y, row) in rows.iter().enumerate() {
            for (x, tile) in row.chars().enumerate() {
                let loc = Location::from_coords(x as u32, y as u32);
                match tile {
                    '.' | ' ' => {}
                    '#' => room.terrain.set_xy(x as u8, y as u8, TerrainFlags::WALL),
                    '~' => room.terrain.set_xy(x as u8, y as u8, TerrainFlags::SWAMP),
                    'S' => room.add_structure(fresh_structure(loc, StructureKind::Spawn)),
                    'E' => room.add_source(loc),
                    'C' => room.set_controller(loc),
                    'x' => room.add_structure(fresh_structure(loc, StructureKind::Extension)),
                    'T' => room.add_structure(fresh_structure(loc, StructureKind::Tower)),
                    'r' => room.add_structure(fresh_structure(loc, StructureKind::Road)),
                    'w' => room.add_structure(fresh_structure(loc, StructureKind::Wall)),
                    'X' => room.add_site(ConstructionEntry::new(
                        loc,
                        StructureKind::Extension,
                        construction_cost(StructureKind::Extension),
                    )),
                    '+' => room.add_site(ConstructionEntry::new(
                        loc,
                        StructureKind::Road,
                        construction_cost(StructureKind::Road),
                    )),
                    _ => return Err(MapError::UnknownTile { tile, x, y }),
                }
            }
        }

        Ok(room)
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn terrain_mut(&mut self) -> &mut FastRoomTerrain {
        &mut self.terrain
    }

    /// Insert a built structure without any placement checks.
    pub fn add_structure(&mut self, structure: Structure) {
        self.structures.push(structure);
    }

    /// Insert a pending site without any placement checks.
    pub fn add_site(&mut self, entry: ConstructionEntry) {
        self.sites.push(entry);
    }

    pub fn add_source(&mut self, location: Location) {
        self.sources.push(location);
    }

    /// Place the controller. The controller is also a (natural) structure.
    pub fn set_controller(&mut self, location: Location) {
        self.structures
            .retain(|s| s.kind != StructureKind::Controller);
        self.structures
            .push(Structure::new(location, StructureKind::Controller, 0, 0));
        self.controller = Some(location);
    }

    pub fn structure_mut(&mut self, location: Location, kind: StructureKind) -> Option<&mut Structure> {
        self.structures
            .iter_mut()
            .find(|s| s.location == location && s.kind == kind)
    }

    /// Turn every pending site into a finished structure.
    pub fn complete_all_sites(&mut self) {
        for site in std::mem::take(&mut self.sites) {
            self.structures.push(fresh_structure(site.location, site.kind));
        }
    }

    /// Every `create_site` call made so far, in order.
    pub fn site_requests(&self) -> &[SiteRequest] {
        &self.site_requests
    }

    pub fn clear_site_requests(&mut self) {
        self.site_requests.clear();
    }

    fn count_of_kind(&self, kind: StructureKind) -> u32 {
        let built = self.structures.iter().filter(|s| s.kind == kind).count();
        let pending = self.sites.iter().filter(|s| s.kind == kind).count();
        (built + pending) as u32
    }

    fn check_site(&self, location: Location, kind: StructureKind) -> Result<(), PlacementError> {
        if !location.is_buildable_area() {
            return Err(PlacementError::InvalidTarget);
        }
        if max_structures_at_level(kind, MAX_ROOM_LEVEL) == 0 {
            return Err(PlacementError::InvalidTarget);
        }
        if self.terrain.is_wall(location.x(), location.y()) {
            return Err(PlacementError::InvalidTarget);
        }
        if self.sources.contains(&location) {
            return Err(PlacementError::InvalidTarget);
        }
        if self.structures.iter().any(|s| s.location == location)
            || self.sites.iter().any(|s| s.location == location)
        {
            return Err(PlacementError::Occupied);
        }
        if self.sites.len() >= MAX_CONSTRUCTION_SITES {
            return Err(PlacementError::Full);
        }
        if self.count_of_kind(kind) >= max_structures_at_level(kind, self.level) {
            return Err(PlacementError::RclNotEnough);
        }
        Ok(())
    }

    /// Tiles a path may not enter (other than as its goal).
    fn obstacles(&self, options: &PathOptions) -> FnvHashSet<Location> {
        let mut blocked: FnvHashSet<Location> = self.sources.iter().copied().collect();

        for structure in &self.structures {
            let natural = max_structures_at_level(structure.kind, MAX_ROOM_LEVEL) == 0;
            if natural || (!options.ignore_destructible && !structure.kind.is_walkable()) {
                blocked.insert(structure.location);
            }
        }

        if !options.ignore_destructible {
            for site in &self.sites {
                if !site.kind.is_walkable() {
                    blocked.insert(site.location);
                }
            }
        }

        blocked
    }
}

impl RoomOracle for SimRoom {
    fn terrain(&self) -> &FastRoomTerrain {
        &self.terrain
    }

    fn structures(&self) -> Vec<Structure> {
        self.structures.clone()
    }

    fn construction_sites(&self) -> Vec<ConstructionEntry> {
        self.sites.clone()
    }

    fn spawns(&self) -> Vec<Anchor> {
        self.structures
            .iter()
            .filter(|s| s.kind == StructureKind::Spawn)
            .map(|s| Anchor::new(s.location, AnchorRole::Spawn))
            .collect()
    }

    fn sources(&self) -> Vec<Anchor> {
        self.sources
            .iter()
            .map(|loc| Anchor::new(*loc, AnchorRole::Source))
            .collect()
    }

    fn controller(&self) -> Option<Anchor> {
        self.controller
            .map(|loc| Anchor::new(loc, AnchorRole::Controller))
    }

    fn controller_level(&self) -> u8 {
        if self.controller.is_some() {
            self.level
        } else {
            0
        }
    }

    fn structures_at(&self, location: Location) -> Vec<StructureKind> {
        self.structures
            .iter()
            .filter(|s| s.location == location)
            .map(|s| s.kind)
            .collect()
    }

    fn sites_at(&self, location: Location) -> Vec<StructureKind> {
        self.sites
            .iter()
            .filter(|s| s.location == location)
            .map(|s| s.kind)
            .collect()
    }

    fn find_path(&self, from: Location, to: Location, options: &PathOptions) -> Vec<Location> {
        let blocked = self.obstacles(options);
        let terrain = &self.terrain;
        let swamp_cost = options.swamp_cost.max(1);
        let ops = Cell::new(0u32);

        let result = astar(
            &from,
            |&loc| {
                ops.set(ops.get() + 1);
                if ops.get() > options.max_ops {
                    return Vec::new();
                }
                loc.neighbors()
                    .filter(|next| {
                        *next == to
                            || (!terrain.is_wall(next.x(), next.y()) && !blocked.contains(next))
                    })
                    .map(|next| {
                        let cost = if terrain.is_swamp(next.x(), next.y()) {
                            swamp_cost
                        } else {
                            1
                        };
                        (next, cost)
                    })
                    .collect::<Vec<_>>()
            },
            |loc| loc.distance_to(to) as u32,
            // Once the budget is spent, nodes still queued may not finish the search.
            |loc| *loc == to && ops.get() <= options.max_ops,
        );

        match result {
            Some((path, _cost)) => path.into_iter().skip(1).collect(),
            None => {
                trace!("SimRoom: no path {} -> {} within {} ops", from, to, options.max_ops);
                Vec::new()
            }
        }
    }

    fn nearest_by_path(&self, origin: Location, candidates: &[Location]) -> Option<usize> {
        let options = PathOptions::default();

        candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                if *candidate == origin {
                    return Some((index, 0));
                }
                let path = self.find_path(origin, *candidate, &options);
                if path.is_empty() {
                    None
                } else {
                    Some((index, path.len()))
                }
            })
            .min_by_key(|(_, length)| *length)
            .map(|(index, _)| index)
    }

    fn create_site(
        &mut self,
        location: Location,
        kind: StructureKind,
    ) -> Result<(), PlacementError> {
        let result = self.check_site(location, kind);
        if result.is_ok() {
            self.sites
                .push(ConstructionEntry::new(location, kind, construction_cost(kind)));
        }
        self.site_requests.push(SiteRequest {
            location,
            kind,
            result,
        });
        result
    }

    fn remove_site(&mut self, entry: &ConstructionEntry) -> Result<(), PlacementError> {
        let index = self
            .sites
            .iter()
            .position(|s| s.location == entry.location && s.kind == entry.kind)
            .ok_or(PlacementError::NotFound)?;
        self.sites.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ascii_map() {
        let room = SimRoom::from_ascii(
            "\
#####
#S.E#
#~X+#
#####",
        )
        .unwrap();

        assert!(room.terrain().is_wall(0, 0));
        assert!(room.terrain().is_swamp(1, 2));
        assert_eq!(room.spawns()[0].location, Location::from_xy(1, 1));
        assert_eq!(room.sources()[0].location, Location::from_xy(3, 1));
        assert_eq!(room.construction_sites().len(), 2);
        assert_eq!(room.sites_at(Location::from_xy(3, 2)), vec![StructureKind::Road]);
    }

    #[test]
    fn rejects_unknown_tiles() {
        assert_eq!(
            SimRoom::from_ascii("..?").err(),
            Some(MapError::UnknownTile { tile: '?', x: 2, y: 0 })
        );
    }

    #[test]
    fn placement_rules() {
        let mut room = SimRoom::from_ascii("\n.S\n..#").unwrap().with_level(2);
        room.set_controller(Location::from_xy(30, 30));

        assert_eq!(
            room.create_site(Location::from_xy(0, 5), StructureKind::Road),
            Err(PlacementError::InvalidTarget)
        );
        assert_eq!(
            room.create_site(Location::from_xy(2, 2), StructureKind::Road),
            Err(PlacementError::InvalidTarget)
        );
        assert_eq!(
            room.create_site(Location::from_xy(1, 1), StructureKind::Extension),
            Err(PlacementError::Occupied)
        );
        assert_eq!(
            room.create_site(Location::from_xy(5, 5), StructureKind::Tower),
            Err(PlacementError::RclNotEnough)
        );
        assert_eq!(room.create_site(Location::from_xy(5, 5), StructureKind::Extension), Ok(()));
        assert_eq!(
            room.create_site(Location::from_xy(5, 5), StructureKind::Road),
            Err(PlacementError::Occupied)
        );
        assert_eq!(room.site_requests().len(), 6);
    }

    #[test]
    fn level_limits_count_pending_sites() {
        let mut room = SimRoom::new(FastRoomTerrain::plain()).with_level(2);
        room.set_controller(Location::from_xy(40, 40));
        for x in 10..15 {
            assert_eq!(room.create_site(Location::from_xy(x, 10), StructureKind::Extension), Ok(()));
        }
        assert_eq!(
            room.create_site(Location::from_xy(20, 10), StructureKind::Extension),
            Err(PlacementError::RclNotEnough)
        );
    }

    #[test]
    fn path_respects_obstacles_unless_ignored() {
        // A wall across the room with a one-tile gap, plugged by a pending extension.
        let mut room = SimRoom::new(FastRoomTerrain::plain());
        for x in 0..ROOM_WIDTH {
            if x != 3 {
                room.terrain_mut().set_xy(x, 2, TerrainFlags::WALL);
            }
        }
        room.add_site(ConstructionEntry::new(
            Location::from_xy(3, 2),
            StructureKind::Extension,
            3000,
        ));
        let from = Location::from_xy(3, 0);
        let to = Location::from_xy(3, 4);

        assert!(room.find_path(from, to, &PathOptions::road(2000)).is_empty());

        let path = room.find_path(from, to, &PathOptions::probe(200));
        assert_eq!(path.len(), 4);
        assert!(path.contains(&Location::from_xy(3, 2)));
        assert_eq!(path.last(), Some(&to));
    }

    #[test]
    fn path_search_respects_the_operation_budget() {
        let room = SimRoom::new(FastRoomTerrain::plain());
        let from = Location::from_xy(2, 2);
        let to = Location::from_xy(40, 40);

        assert!(!room.find_path(from, to, &PathOptions::probe(200)).is_empty());
        assert!(room.find_path(from, to, &PathOptions::probe(5)).is_empty());
    }

    #[test]
    fn queued_goal_does_not_beat_the_budget() {
        // The swamp goal is queued by the first expansion but sorts behind
        // the plain neighbors, which exhaust a one-op budget.
        let mut room = SimRoom::new(FastRoomTerrain::plain());
        room.terrain_mut().set_xy(11, 10, TerrainFlags::SWAMP);
        let from = Location::from_xy(10, 10);
        let to = Location::from_xy(11, 10);

        assert!(room.find_path(from, to, &PathOptions::probe(1)).is_empty());
        assert_eq!(room.find_path(from, to, &PathOptions::probe(50)), vec![to]);
    }

    #[test]
    fn structure_mut_edits_in_place() {
        let mut room = SimRoom::new(FastRoomTerrain::plain());
        let loc = Location::from_xy(10, 10);
        room.add_structure(fresh_structure(loc, StructureKind::Road));

        assert!(room.structure_mut(loc, StructureKind::Extension).is_none());
        if let Some(road) = room.structure_mut(loc, StructureKind::Road) {
            road.hits = 100;
        }
        assert_eq!(room.structures()[0].hits, 100);
    }

    #[test]
    fn nearest_by_path_ignores_unreachable_candidates() {
        let room = SimRoom::from_ascii(
            "\
..........
.####.....
.#..#.....
.####.....",
        )
        .unwrap();
        let origin = Location::from_xy(8, 2);
        // (2, 2) is enclosed; (0, 0) is farther but reachable.
        let candidates = [Location::from_xy(2, 2), Location::from_xy(0, 0)];
        assert_eq!(room.nearest_by_path(origin, &candidates), Some(1));
        assert_eq!(room.nearest_by_path(origin, &candidates[..1]), None);
    }
}
