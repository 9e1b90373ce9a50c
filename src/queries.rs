//! Read-only queries for the agents that consume the plan: builders pick
//! construction sites, repairers pick damaged structures, haulers pick where
//! to deliver and collect energy.
//!
//! Nothing here mutates the room. "Closest" always means closest by path from
//! the given position; no target yields `None`.

use crate::config::RepairConfig;
use crate::kind::StructureKind;
use crate::location::*;
use crate::priority::order_construction;
use crate::repair::RepairRanker;
use crate::room::*;

fn closest_by_path<R, T, F>(room: &R, origin: Location, candidates: Vec<T>, location: F) -> Option<T>
where
    R: RoomOracle + ?Sized,
    F: Fn(&T) -> Location,
{
    if candidates.is_empty() {
        return None;
    }

    let locations: Vec<Location> = candidates.iter().map(location).collect();
    let index = room.nearest_by_path(origin, &locations)?;

    candidates.into_iter().nth(index)
}

/// Pending sites, highest priority first, most complete first within a
/// priority.
pub fn ordered_construction_sites<R: RoomOracle + ?Sized>(room: &R) -> Vec<ConstructionEntry> {
    let mut sites = room.construction_sites();
    order_construction(&mut sites);
    sites
}

pub fn closest_construction_site<R: RoomOracle + ?Sized>(
    room: &R,
    origin: Location,
) -> Option<ConstructionEntry> {
    closest_by_path(room, origin, ordered_construction_sites(room), |s| s.location)
}

pub fn construction_site_count<R: RoomOracle + ?Sized>(room: &R) -> usize {
    room.construction_sites().len()
}

/// Whether a builder has anything to do.
pub fn has_pending_work<R: RoomOracle + ?Sized>(room: &R) -> bool {
    construction_site_count(room) > 0
}

pub fn repair_targets<R: RoomOracle + ?Sized>(room: &R, config: &RepairConfig) -> Vec<Structure> {
    RepairRanker::new(*config).rank(room)
}

pub fn closest_repair_target<R: RoomOracle + ?Sized>(
    room: &R,
    origin: Location,
    config: &RepairConfig,
) -> Option<Structure> {
    closest_by_path(room, origin, repair_targets(room, config), |s| s.location)
}

fn sink_rank(kind: StructureKind) -> Option<u8> {
    match kind {
        StructureKind::Spawn => Some(0),
        StructureKind::Extension => Some(1),
        StructureKind::Tower => Some(2),
        _ => None,
    }
}

/// Spawns, extensions and towers with room for more energy, in that order.
pub fn energy_sinks<R: RoomOracle + ?Sized>(room: &R) -> Vec<Structure> {
    let mut sinks: Vec<Structure> = room
        .structures()
        .into_iter()
        .filter(|s| sink_rank(s.kind).is_some())
        .filter(|s| s.store.map_or(false, |store| store.free() > 0))
        .collect();

    sinks.sort_by_key(|s| sink_rank(s.kind));

    sinks
}

pub fn closest_energy_sink<R: RoomOracle + ?Sized>(room: &R, origin: Location) -> Option<Structure> {
    closest_by_path(room, origin, energy_sinks(room), |s| s.location)
}

/// Spawns and extensions currently holding energy.
pub fn energy_providers<R: RoomOracle + ?Sized>(room: &R) -> Vec<Structure> {
    room.structures()
        .into_iter()
        .filter(|s| matches!(s.kind, StructureKind::Spawn | StructureKind::Extension))
        .filter(|s| s.store.map_or(false, |store| store.used > 0))
        .collect()
}

pub fn closest_energy_provider<R: RoomOracle + ?Sized>(room: &R, origin: Location) -> Option<Structure> {
    closest_by_path(room, origin, energy_providers(room), |s| s.location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::*;
    use crate::terrain::FastRoomTerrain;

    fn at(x: u8, y: u8) -> Location {
        Location::from_xy(x, y)
    }

    #[test]
    fn construction_sites_by_priority_then_progress() {
        let mut room = SimRoom::new(FastRoomTerrain::plain());
        room.add_site(ConstructionEntry::new(at(10, 10), StructureKind::Road, 300).with_progress(290));
        room.add_site(ConstructionEntry::new(at(11, 10), StructureKind::Extension, 3000).with_progress(100));
        room.add_site(ConstructionEntry::new(at(12, 10), StructureKind::Extension, 3000).with_progress(2000));
        room.add_site(ConstructionEntry::new(at(13, 10), StructureKind::Spawn, 15000));

        let order: Vec<Location> = ordered_construction_sites(&room)
            .iter()
            .map(|s| s.location)
            .collect();

        assert_eq!(order, vec![at(13, 10), at(12, 10), at(11, 10), at(10, 10)]);
        assert_eq!(construction_site_count(&room), 4);
        assert!(has_pending_work(&room));
    }

    #[test]
    fn empty_room_has_no_targets() {
        let room = SimRoom::new(FastRoomTerrain::plain());
        let origin = at(25, 25);

        assert!(!has_pending_work(&room));
        assert_eq!(closest_construction_site(&room, origin), None);
        assert_eq!(closest_repair_target(&room, origin, &RepairConfig::default()), None);
        assert_eq!(closest_energy_sink(&room, origin), None);
        assert_eq!(closest_energy_provider(&room, origin), None);
    }

    #[test]
    fn closest_site_is_by_path() {
        // A wall with a gap at the bottom puts the site at (12, 5) farther by
        // path than the site at (5, 20).
        let mut room = SimRoom::from_ascii(
            "\
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.+...
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....
..........#.....",
        )
        .unwrap();
        room.add_site(ConstructionEntry::new(at(5, 20), StructureKind::Road, 300));

        let closest = closest_construction_site(&room, at(8, 5)).unwrap();
        assert_eq!(closest.location, at(5, 20));
    }

    #[test]
    fn sinks_prefer_spawns_then_extensions_then_towers() {
        let mut room = SimRoom::new(FastRoomTerrain::plain());
        room.add_structure(fresh_structure(at(10, 10), StructureKind::Tower));
        room.add_structure(fresh_structure(at(11, 10), StructureKind::Extension));
        room.add_structure(fresh_structure(at(12, 10), StructureKind::Spawn).with_store(300, 300));
        room.add_structure(fresh_structure(at(13, 10), StructureKind::Extension).with_store(10, 50));
        room.add_structure(fresh_structure(at(14, 10), StructureKind::Spawn).with_store(100, 300));
        room.add_structure(fresh_structure(at(15, 10), StructureKind::Storage));

        let sinks: Vec<Location> = energy_sinks(&room).iter().map(|s| s.location).collect();
        assert_eq!(sinks, vec![at(14, 10), at(11, 10), at(13, 10), at(10, 10)]);

        let providers: Vec<Location> = energy_providers(&room).iter().map(|s| s.location).collect();
        assert_eq!(providers, vec![at(12, 10), at(13, 10), at(14, 10)]);

        assert_eq!(closest_energy_provider(&room, at(16, 12)).map(|s| s.location), Some(at(14, 10)));
        assert_eq!(closest_energy_sink(&room, at(8, 12)).map(|s| s.location), Some(at(10, 10)));
    }

    #[test]
    fn closest_repair_target_skips_healthy_structures() {
        let mut room = SimRoom::new(FastRoomTerrain::plain());
        room.add_structure(fresh_structure(at(20, 20), StructureKind::Road));
        room.add_structure(Structure::new(at(30, 30), StructureKind::Road, 100, 5000));

        let target = closest_repair_target(&room, at(21, 21), &RepairConfig::default());
        assert_eq!(target.map(|s| s.location), Some(at(30, 30)));
        assert_eq!(repair_targets(&room, &RepairConfig::default()).len(), 1);
    }
}
