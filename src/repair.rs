//! Repair target selection.

use crate::config::RepairConfig;
use crate::priority::order_repair;
use crate::room::*;

pub struct RepairRanker {
    config: RepairConfig,
}

impl RepairRanker {
    pub fn new(config: RepairConfig) -> Self {
        RepairRanker { config }
    }

    /// Walls and ramparts are only topped up to `wall_hits_limit`; everything
    /// else is repaired to full health.
    pub fn needs_repair(&self, structure: &Structure) -> bool {
        if structure.kind.is_fortification() {
            structure.hits < self.config.wall_hits_limit
        } else {
            structure.hits < structure.hits_max
        }
    }

    /// Damaged structures, highest priority first, most damaged first within
    /// a priority.
    pub fn rank<R: RoomOracle + ?Sized>(&self, room: &R) -> Vec<Structure> {
        let mut targets: Vec<Structure> = room
            .structures()
            .into_iter()
            .filter(|s| self.needs_repair(s))
            .collect();

        order_repair(&mut targets);

        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::StructureKind;
    use crate::location::Location;
    use crate::sim::*;
    use crate::terrain::FastRoomTerrain;

    fn damaged(x: u8, kind: StructureKind, hits: u32, hits_max: u32) -> Structure {
        Structure::new(Location::from_xy(x, 20), kind, hits, hits_max)
    }

    #[test]
    fn fortifications_stop_at_the_ceiling() {
        let ranker = RepairRanker::new(RepairConfig::default());

        assert!(ranker.needs_repair(&damaged(1, StructureKind::Wall, 9_999, 300_000_000)));
        assert!(!ranker.needs_repair(&damaged(2, StructureKind::Wall, 10_000, 300_000_000)));
        assert!(!ranker.needs_repair(&damaged(3, StructureKind::Rampart, 50_000, 300_000_000)));
        // Below the ceiling counts even at full health.
        assert!(ranker.needs_repair(&damaged(4, StructureKind::Rampart, 5_000, 5_000)));
        assert!(ranker.needs_repair(&damaged(5, StructureKind::Road, 4_999, 5_000)));
        assert!(!ranker.needs_repair(&damaged(6, StructureKind::Road, 5_000, 5_000)));
    }

    #[test]
    fn ranks_by_priority_then_damage() {
        let mut room = SimRoom::new(FastRoomTerrain::plain());
        room.add_structure(damaged(10, StructureKind::Road, 4_000, 5_000));
        room.add_structure(damaged(11, StructureKind::Extension, 900, 1_000));
        room.add_structure(damaged(12, StructureKind::Road, 1_000, 5_000));
        room.add_structure(damaged(13, StructureKind::Wall, 100, 300_000_000));
        room.add_structure(fresh_structure(Location::from_xy(14, 20), StructureKind::Spawn));
        room.add_structure(damaged(15, StructureKind::Wall, 20_000, 300_000_000));

        let ranked: Vec<u8> = RepairRanker::new(RepairConfig::default())
            .rank(&room)
            .iter()
            .map(|s| s.location.x())
            .collect();

        assert_eq!(ranked, vec![11, 12, 10, 13]);
    }
}
