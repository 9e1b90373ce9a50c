//! Placement search: ring enumeration around an anchor, shuffled with a
//! caller-seeded RNG, each candidate checked by a validator and built as
//! soon as it passes.

use crate::config::ExtensionConfig;
use crate::kind::StructureKind;
use crate::location::*;
use crate::room::*;
use log::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Decides whether a candidate tile may receive a new structure.
pub trait PlacementValidator<R: RoomOracle + ?Sized> {
    fn is_valid(&self, room: &R, location: Location) -> bool;

    /// Called after a site was successfully requested at `location`.
    fn accepted(&mut self, _location: Location) {}
}

/// Every offset whose Chebyshev distance lies in `[min_distance, max_distance]`,
/// innermost ring first.
pub fn ring_offsets(min_distance: u8, max_distance: u8) -> Vec<(i16, i16)> {
    let mut offsets = Vec::new();
    for radius in min_distance..=max_distance {
        let r = radius as i16;
        for dx in -r..=r {
            for dy in -r..=r {
                if dx.abs() == r || dy.abs() == r {
                    offsets.push((dx, dy));
                }
            }
        }
    }
    offsets
}

/// A square ring search around one anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlacementSearch {
    pub kind: StructureKind,
    pub min_distance: u8,
    pub max_distance: u8,
    pub target: u32,
}

impl PlacementSearch {
    /// Request up to `target` sites around `anchor`. Returns the number of
    /// sites actually created, which may be fewer than `target`.
    pub fn run<R, V, G>(&self, room: &mut R, anchor: Location, rng: &mut G, validator: &mut V) -> u32
    where
        R: RoomOracle + ?Sized,
        V: PlacementValidator<R> + ?Sized,
        G: Rng + ?Sized,
    {
        if self.target == 0 {
            return 0;
        }

        let mut candidates = ring_offsets(self.min_distance, self.max_distance);
        candidates.shuffle(rng);

        let mut created = 0;

        for (dx, dy) in candidates {
            if created >= self.target {
                break;
            }

            let location = match anchor.offset(dx, dy) {
                Some(loc) if loc.is_buildable_area() => loc,
                _ => continue,
            };

            if !validator.is_valid(room, location) {
                continue;
            }

            match room.create_site(location, self.kind) {
                Ok(()) => {
                    created += 1;
                    validator.accepted(location);
                }
                Err(err) => {
                    trace!("PlacementSearch: {:?} at {} refused: {}", self.kind, location, err);
                }
            }
        }

        created
    }
}

/// How a candidate must keep clear of existing buildings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Spacing {
    /// Outside this range of the originating anchor.
    FromAnchor(u8),
    /// Outside this range of every structure in the exclusion set.
    FromStructures(u8),
}

/// Validator shared by both extension cluster searches.
pub struct ExtensionSiteValidator {
    anchor: Location,
    spacing: Spacing,
    sources: Vec<Location>,
    source_clearance: u8,
    min_free_neighbors: u8,
    exclusion: Vec<Location>,
}

impl ExtensionSiteValidator {
    /// Rules for extensions clustered around a spawn.
    pub fn around_spawn<R: RoomOracle + ?Sized>(
        room: &R,
        spawn: Location,
        config: &ExtensionConfig,
    ) -> Self {
        ExtensionSiteValidator {
            anchor: spawn,
            spacing: Spacing::FromAnchor(config.spacing.to_spawn),
            sources: room.sources().iter().map(|a| a.location).collect(),
            source_clearance: config.spacing.to_source,
            min_free_neighbors: config.min_free_neighbors,
            exclusion: Vec::new(),
        }
    }

    /// Rules for extensions clustered around a source. Every structure
    /// standing when the search starts is part of the exclusion set.
    pub fn around_source<R: RoomOracle + ?Sized>(
        room: &R,
        source: Location,
        config: &ExtensionConfig,
    ) -> Self {
        ExtensionSiteValidator {
            anchor: source,
            spacing: Spacing::FromStructures(config.spacing.between),
            sources: room.sources().iter().map(|a| a.location).collect(),
            source_clearance: config.spacing.to_source,
            min_free_neighbors: config.min_free_neighbors,
            exclusion: room.structures().iter().map(|s| s.location).collect(),
        }
    }

    fn keeps_spacing(&self, location: Location) -> bool {
        match self.spacing {
            Spacing::FromAnchor(range) => !location.in_range_to(self.anchor, range),
            Spacing::FromStructures(range) => self
                .exclusion
                .iter()
                .all(|other| !location.in_range_to(*other, range)),
        }
    }

    fn free_neighbors<R: RoomOracle + ?Sized>(room: &R, location: Location) -> u8 {
        location
            .neighbors()
            .filter(|n| n.is_buildable_area() && room.is_passable(*n))
            .filter(|n| {
                room.structures_at(*n)
                    .iter()
                    .chain(room.sites_at(*n).iter())
                    .all(|kind| *kind == StructureKind::Road)
            })
            .count() as u8
    }
}

impl<R: RoomOracle + ?Sized> PlacementValidator<R> for ExtensionSiteValidator {
    fn is_valid(&self, room: &R, location: Location) -> bool {
        if !room.is_passable(location) {
            return false;
        }

        if !room.structures_at(location).is_empty() || !room.sites_at(location).is_empty() {
            return false;
        }

        if !self.keeps_spacing(location) {
            return false;
        }

        if self
            .sources
            .iter()
            .any(|source| location.in_range_to(*source, self.source_clearance))
        {
            return false;
        }

        Self::free_neighbors(room, location) >= self.min_free_neighbors
    }

    fn accepted(&mut self, location: Location) {
        if let Spacing::FromStructures(_) = self.spacing {
            self.exclusion.push(location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimRoom;
    use crate::terrain::FastRoomTerrain;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn ring_offsets_form_square_rings() {
        // Ring r holds 8r tiles.
        assert_eq!(ring_offsets(1, 1).len(), 8);
        assert_eq!(ring_offsets(2, 5).len(), 8 * (2 + 3 + 4 + 5));
        assert!(ring_offsets(2, 5)
            .iter()
            .all(|&(dx, dy)| (2..=5).contains(&dx.abs().max(dy.abs()))));
        assert_eq!(ring_offsets(0, 0), vec![(0, 0)]);
    }

    #[test]
    fn wide_rings_do_not_overflow() {
        let offsets = ring_offsets(127, 128);
        assert_eq!(offsets.len(), 8 * (127 + 128));
        assert!(offsets.contains(&(-128, -128)));
        assert!(offsets.contains(&(128, 0)));

        // Every candidate of an oversized search falls outside the room.
        let mut room = open_room(8);
        let spawn = Location::from_xy(25, 25);
        let mut validator =
            ExtensionSiteValidator::around_spawn(&room, spawn, &ExtensionConfig::default());
        let search = PlacementSearch {
            kind: StructureKind::Extension,
            min_distance: 200,
            max_distance: 255,
            target: 10,
        };
        assert_eq!(
            search.run(&mut room, spawn, &mut SmallRng::seed_from_u64(2), &mut validator),
            0
        );
    }

    fn open_room(level: u8) -> SimRoom {
        let mut room = SimRoom::new(FastRoomTerrain::plain()).with_level(level);
        room.set_controller(Location::from_xy(45, 45));
        room
    }

    #[test]
    fn same_seed_same_layout() {
        let config = ExtensionConfig::default();
        let spawn = Location::from_xy(25, 25);
        let search = PlacementSearch {
            kind: StructureKind::Extension,
            min_distance: 2,
            max_distance: 5,
            target: 10,
        };

        let layout = |seed: u64| {
            let mut room = open_room(8);
            let mut validator = ExtensionSiteValidator::around_spawn(&room, spawn, &config);
            let mut rng = SmallRng::seed_from_u64(seed);
            search.run(&mut room, spawn, &mut rng, &mut validator);
            room.construction_sites()
                .iter()
                .map(|s| s.location)
                .collect::<Vec<_>>()
        };

        assert_eq!(layout(7), layout(7));
        assert_eq!(layout(7).len(), 10);
    }

    #[test]
    fn never_builds_on_the_room_edge() {
        let config = ExtensionConfig::default();
        let spawn = Location::from_xy(3, 3);
        let mut room = open_room(8);
        let mut validator = ExtensionSiteValidator::around_spawn(&room, spawn, &config);
        let search = PlacementSearch {
            kind: StructureKind::Extension,
            min_distance: 2,
            max_distance: 5,
            target: 60,
        };
        search.run(&mut room, spawn, &mut SmallRng::seed_from_u64(1), &mut validator);

        assert!(!room.construction_sites().is_empty());
        for site in room.construction_sites() {
            assert!(site.location.is_buildable_area(), "{}", site.location);
        }
    }

    #[test]
    fn spawn_spacing_rejects_the_inner_ring() {
        let config = ExtensionConfig::default();
        let spawn = Location::from_xy(25, 25);
        let room = open_room(8);
        let validator = ExtensionSiteValidator::around_spawn(&room, spawn, &config);

        assert!(!validator.is_valid(&room, Location::from_xy(27, 25)));
        assert!(validator.is_valid(&room, Location::from_xy(28, 25)));
    }

    #[test]
    fn keeps_clear_of_sources() {
        let config = ExtensionConfig::default();
        let spawn = Location::from_xy(25, 25);
        let mut room = open_room(8);
        room.add_source(Location::from_xy(30, 25));
        let validator = ExtensionSiteValidator::around_spawn(&room, spawn, &config);

        assert!(!validator.is_valid(&room, Location::from_xy(28, 25)));
        assert!(validator.is_valid(&room, Location::from_xy(25, 29)));
    }

    #[test]
    fn requires_free_neighbors() {
        // Candidate at (5, 5) is walled in on seven sides.
        let mut room = SimRoom::from_ascii(
            "\
......
......
......
......
....##
....#.#
....###",
        )
        .unwrap()
        .with_level(8);
        room.set_controller(Location::from_xy(45, 45));
        let config = ExtensionConfig::default();
        let validator = ExtensionSiteValidator::around_spawn(&room, Location::from_xy(20, 20), &config);

        assert!(!validator.is_valid(&room, Location::from_xy(5, 5)));

        // Roads do not count against clearance; pending extensions do.
        assert!(validator.is_valid(&room, Location::from_xy(2, 2)));
        room.add_site(ConstructionEntry::new(Location::from_xy(1, 1), StructureKind::Road, 300));
        assert!(validator.is_valid(&room, Location::from_xy(2, 2)));
        for (x, y) in [(1, 2), (1, 3), (3, 3), (3, 2), (3, 1), (2, 1)] {
            room.add_site(ConstructionEntry::new(
                Location::from_xy(x, y),
                StructureKind::Extension,
                3000,
            ));
        }
        assert!(!validator.is_valid(&room, Location::from_xy(2, 2)));
    }

    #[test]
    fn source_cluster_keeps_its_own_output_apart() {
        let config = ExtensionConfig::default();
        let source = Location::from_xy(25, 25);
        let mut room = open_room(8);
        room.add_source(source);
        let mut validator = ExtensionSiteValidator::around_source(&room, source, &config);
        let search = PlacementSearch {
            kind: StructureKind::Extension,
            min_distance: 2,
            max_distance: 4,
            target: 5,
        };
        let created = search.run(&mut room, source, &mut SmallRng::seed_from_u64(3), &mut validator);

        assert_eq!(created, 5);
        let sites = room.construction_sites();
        for (i, a) in sites.iter().enumerate() {
            assert!(!a.location.in_range_to(source, config.spacing.to_source));
            for b in &sites[i + 1..] {
                assert!(a.location.distance_to(b.location) > config.spacing.between);
            }
        }
    }

    #[test]
    fn refused_requests_do_not_count() {
        let config = ExtensionConfig::default();
        let spawn = Location::from_xy(25, 25);
        // Level 2 allows only five extensions in total.
        let mut room = open_room(2);
        let mut validator = ExtensionSiteValidator::around_spawn(&room, spawn, &config);
        let search = PlacementSearch {
            kind: StructureKind::Extension,
            min_distance: 2,
            max_distance: 5,
            target: 10,
        };
        let created = search.run(&mut room, spawn, &mut SmallRng::seed_from_u64(9), &mut validator);

        assert_eq!(created, 5);
        assert_eq!(room.construction_sites().len(), 5);
    }
}
