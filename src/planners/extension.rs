//! ExtensionPlanner: keeps the room at its level's extension allowance.
//!
//! Fills the deficit greedily: every spawn cluster first (spawn-adjacent
//! capacity matters most for refilling), then every source cluster, each in
//! enumeration order, stopping as soon as the deficit is met.

use crate::config::ExtensionConfig;
use crate::constants::extensions_at_level;
use crate::kind::StructureKind;
use crate::placement::*;
use crate::room::*;
use log::*;
use rand::Rng;

pub struct ExtensionPlanner {
    config: ExtensionConfig,
}

impl ExtensionPlanner {
    pub fn new(config: ExtensionConfig) -> Self {
        ExtensionPlanner { config }
    }

    /// Extensions still missing at `level`, counting built extensions only.
    pub fn deficit<R: RoomOracle + ?Sized>(room: &R, level: u8) -> u32 {
        let built = room
            .structures()
            .iter()
            .filter(|s| s.kind == StructureKind::Extension)
            .count() as u32;

        extensions_at_level(level).saturating_sub(built)
    }

    /// Request new extension sites. Returns the number of sites created.
    pub fn plan<R, G>(&self, room: &mut R, level: u8, rng: &mut G) -> u32
    where
        R: RoomOracle + ?Sized,
        G: Rng + ?Sized,
    {
        let deficit = Self::deficit(room, level);
        if deficit == 0 {
            return 0;
        }

        let spawns = room.spawns();
        if spawns.is_empty() {
            return 0;
        }
        let sources = room.sources();

        let mut remaining = deficit;

        let spawn_ring = self.config.spawn_cluster;
        for spawn in &spawns {
            let search = PlacementSearch {
                kind: StructureKind::Extension,
                min_distance: spawn_ring.min_distance,
                max_distance: spawn_ring.max_distance,
                target: spawn_ring.count.min(remaining),
            };
            let mut validator =
                ExtensionSiteValidator::around_spawn(room, spawn.location, &self.config);
            remaining -= search.run(room, spawn.location, rng, &mut validator);

            if remaining == 0 {
                break;
            }
        }

        if remaining > 0 {
            let source_ring = self.config.source_cluster;
            for source in &sources {
                let search = PlacementSearch {
                    kind: StructureKind::Extension,
                    min_distance: source_ring.min_distance,
                    max_distance: source_ring.max_distance,
                    target: source_ring.count.min(remaining),
                };
                let mut validator =
                    ExtensionSiteValidator::around_source(room, source.location, &self.config);
                remaining -= search.run(room, source.location, rng, &mut validator);

                if remaining == 0 {
                    break;
                }
            }
        }

        let placed = deficit - remaining;

        debug!(
            "ExtensionPlanner: placed {} / {} extensions at level {}",
            placed, deficit, level
        );

        placed
    }
}
