//! RoadSynthesizer: lays road sites between anchors.
//!
//! Spawns are linked pairwise; each source and the controller get a road from
//! whichever spawn is nearest to them by path. When enough construction work
//! is queued, one more road runs from the nearest spawn to the centroid of
//! the pending sites so the builders can reach them.

use crate::config::RoadConfig;
use crate::kind::StructureKind;
use crate::location::*;
use crate::room::*;
use log::*;

/// One road request and its outcome (the first refused tile, if any).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoadRequest {
    pub from: Location,
    pub to: Location,
    pub result: Result<(), PlacementError>,
}

pub struct RoadSynthesizer {
    config: RoadConfig,
}

impl RoadSynthesizer {
    pub fn new(config: RoadConfig) -> Self {
        RoadSynthesizer { config }
    }

    /// Request one road site per path tile from `from` to `to`. Refused tiles
    /// (already built, walls, ...) are skipped; the first refusal is returned.
    pub fn create_road<R: RoomOracle + ?Sized>(
        &self,
        room: &mut R,
        from: Location,
        to: Location,
    ) -> Result<(), PlacementError> {
        let path = room.find_path(from, to, &PathOptions::road(self.config.max_ops));
        if path.is_empty() {
            debug!("RoadSynthesizer: no path from {} to {}", from, to);
            return Ok(());
        }

        let mut result = Ok(());
        for tile in path {
            if let Err(err) = room.create_site(tile, StructureKind::Road) {
                trace!("RoadSynthesizer: road at {} refused: {}", tile, err);
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        result
    }

    fn request<R: RoomOracle + ?Sized>(
        &self,
        room: &mut R,
        from: Location,
        to: Location,
        requests: &mut Vec<RoadRequest>,
    ) {
        let result = self.create_road(room, from, to);
        requests.push(RoadRequest { from, to, result });
    }

    pub fn synthesize<R: RoomOracle + ?Sized>(&self, room: &mut R) -> Vec<RoadRequest> {
        let spawns: Vec<Location> = room.spawns().iter().map(|a| a.location).collect();
        if spawns.is_empty() {
            return Vec::new();
        }

        let sources = room.sources();
        let controller = room.controller();
        let pending = room.construction_sites();

        // Path-nearest spawn for each destination, resolved before any road
        // is laid so every spawn sees the same assignment.
        let source_owners: Vec<(Location, Option<usize>)> = sources
            .iter()
            .map(|s| (s.location, room.nearest_by_path(s.location, &spawns)))
            .collect();
        let controller_owner = controller.map(|c| (c.location, room.nearest_by_path(c.location, &spawns)));

        let mut requests = Vec::new();

        for (i, spawn) in spawns.iter().enumerate() {
            for other in &spawns[i + 1..] {
                self.request(room, *spawn, *other, &mut requests);
            }

            for (source, owner) in &source_owners {
                if *owner == Some(i) {
                    self.request(room, *spawn, *source, &mut requests);
                }
            }

            if let Some((controller, Some(owner))) = controller_owner {
                if owner == i {
                    self.request(room, *spawn, controller, &mut requests);
                }
            }
        }

        if pending.len() >= self.config.min_sites_for_road {
            if let Some(center) = Location::centroid(pending.iter().map(|s| s.location)) {
                match room.nearest_by_path(center, &spawns) {
                    Some(owner) => self.request(room, spawns[owner], center, &mut requests),
                    None => debug!("RoadSynthesizer: no spawn reaches site centroid {}", center),
                }
            }
        }

        debug!("RoadSynthesizer: requested {} roads", requests.len());

        requests
    }
}
