//! BlockingSiteAuditor: removes pending sites that stand in the way of the
//! room's essential connectivity.
//!
//! Each pending non-road site is taken out of the room for the duration of a
//! connectivity check:
//!
//! * site -> first spawn
//! * first spawn -> every source
//! * every pair of extension cluster centroids
//!
//! If any of these fails with the site absent, the removal is kept. Otherwise
//! the site is requested again at the same position and kind. Probes treat
//! destructible structures as passable and are bounded by an operation budget,
//! so a budget that is too small reads as "disconnected".

use crate::config::{AuditConfig, ClusterStrategy};
use crate::kind::StructureKind;
use crate::location::*;
use crate::room::*;
use itertools::Itertools;
use log::*;
use pathfinding::undirected::connected_components::connected_components;
use std::ops::Deref;

/// A group of built extensions within `cluster_radius` of each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    pub members: Vec<Location>,
    pub centroid: Location,
}

impl Cluster {
    fn from_members(members: Vec<Location>) -> Option<Cluster> {
        let centroid = Location::centroid(members.iter().copied())?;
        Some(Cluster { members, centroid })
    }
}

/// Group `extensions` into clusters.
///
/// `Greedy` walks the list once: each still-unassigned extension seeds a
/// cluster and claims every unassigned extension within `radius` of the seed.
/// The result depends on enumeration order. `Connected` returns the connected
/// components of the within-`radius` graph, which does not.
pub fn extension_clusters(
    extensions: &[Location],
    radius: u8,
    strategy: ClusterStrategy,
) -> Vec<Cluster> {
    match strategy {
        ClusterStrategy::Greedy => {
            let mut assigned = vec![false; extensions.len()];
            let mut clusters = Vec::new();

            for (i, seed) in extensions.iter().enumerate() {
                if assigned[i] {
                    continue;
                }
                assigned[i] = true;

                let mut members = vec![*seed];
                for (j, other) in extensions.iter().enumerate().skip(i + 1) {
                    if !assigned[j] && other.in_range_to(*seed, radius) {
                        assigned[j] = true;
                        members.push(*other);
                    }
                }

                clusters.extend(Cluster::from_members(members));
            }

            clusters
        }
        ClusterStrategy::Connected => {
            let components = connected_components(extensions, |loc: &Location| {
                extensions
                    .iter()
                    .filter(|other| *other != loc && other.in_range_to(*loc, radius))
                    .copied()
                    .collect::<Vec<_>>()
            });

            let mut clusters: Vec<Cluster> = components
                .into_iter()
                .filter_map(|component| {
                    let mut members: Vec<Location> = component.into_iter().collect();
                    members.sort_by_key(|loc| loc.packed_repr());
                    Cluster::from_members(members)
                })
                .collect();
            clusters.sort_by_key(|cluster| cluster.members[0].packed_repr());

            clusters
        }
    }
}

/// A construction site taken out of the room for inspection.
///
/// Dropping the guard requests the site again; `confirm` makes the removal
/// final. The room stays readable through the guard while it is held.
pub struct ProvisionalRemoval<'a, R: RoomOracle + ?Sized> {
    room: &'a mut R,
    entry: ConstructionEntry,
    confirmed: bool,
    restore_failures: &'a mut u32,
}

impl<'a, R: RoomOracle + ?Sized> ProvisionalRemoval<'a, R> {
    /// Remove `entry` from `room`. A failed restoration on drop increments
    /// `restore_failures`.
    pub fn new(
        room: &'a mut R,
        entry: ConstructionEntry,
        restore_failures: &'a mut u32,
    ) -> Result<Self, PlacementError> {
        room.remove_site(&entry)?;

        Ok(ProvisionalRemoval {
            room,
            entry,
            confirmed: false,
            restore_failures,
        })
    }

    pub fn entry(&self) -> &ConstructionEntry {
        &self.entry
    }

    pub fn confirm(mut self) {
        self.confirmed = true;
        info!("Removed blocking construction site at {}", self.entry.location);
    }
}

impl<'a, R: RoomOracle + ?Sized> Deref for ProvisionalRemoval<'a, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.room
    }
}

impl<'a, R: RoomOracle + ?Sized> Drop for ProvisionalRemoval<'a, R> {
    fn drop(&mut self) {
        if self.confirmed {
            return;
        }

        match self.room.create_site(self.entry.location, self.entry.kind) {
            Ok(()) => {
                trace!(
                    "BlockingSiteAuditor: restored {:?} site at {}",
                    self.entry.kind,
                    self.entry.location
                );
            }
            Err(err) => {
                warn!(
                    "BlockingSiteAuditor: failed to restore {:?} site at {}: {}",
                    self.entry.kind, self.entry.location, err
                );
                *self.restore_failures += 1;
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditSummary {
    /// Sites taken out for inspection.
    pub inspected: u32,
    /// Sites whose removal was made final.
    pub removed: Vec<ConstructionEntry>,
    /// Sites that could not be requested again after inspection.
    pub restore_failures: u32,
}

/// Anchors the connectivity check is evaluated against, fixed for one audit.
struct Anchors {
    spawn: Location,
    sources: Vec<Location>,
    centroids: Vec<Location>,
}

pub struct BlockingSiteAuditor {
    config: AuditConfig,
}

impl BlockingSiteAuditor {
    pub fn new(config: AuditConfig) -> Self {
        BlockingSiteAuditor { config }
    }

    pub fn clusters<R: RoomOracle + ?Sized>(&self, room: &R) -> Vec<Cluster> {
        let extensions: Vec<Location> = room
            .structures()
            .iter()
            .filter(|s| s.kind == StructureKind::Extension)
            .map(|s| s.location)
            .collect();

        extension_clusters(&extensions, self.config.cluster_radius, self.config.clustering)
    }

    fn still_connected<R: RoomOracle + ?Sized>(&self, room: &R, site: Location, anchors: &Anchors) -> bool {
        let options = PathOptions::probe(self.config.max_ops);

        if !is_connected(room, site, anchors.spawn, &options) {
            debug!("BlockingSiteAuditor: {} cannot reach spawn {}", site, anchors.spawn);
            return false;
        }

        if let Some(source) = anchors
            .sources
            .iter()
            .find(|source| !is_connected(room, anchors.spawn, **source, &options))
        {
            debug!("BlockingSiteAuditor: spawn {} cannot reach source {}", anchors.spawn, source);
            return false;
        }

        if let Some((a, b)) = anchors
            .centroids
            .iter()
            .tuple_combinations()
            .find(|(a, b)| !is_connected(room, **a, **b, &options))
        {
            debug!("BlockingSiteAuditor: clusters at {} and {} are disconnected", a, b);
            return false;
        }

        true
    }

    pub fn audit<R: RoomOracle + ?Sized>(&self, room: &mut R) -> AuditSummary {
        let mut summary = AuditSummary::default();

        let spawn = match room.spawns().first() {
            Some(spawn) => spawn.location,
            None => return summary,
        };

        let anchors = Anchors {
            spawn,
            sources: room.sources().iter().map(|a| a.location).collect(),
            centroids: self.clusters(room).iter().map(|c| c.centroid).collect(),
        };

        let pending: Vec<ConstructionEntry> = room
            .construction_sites()
            .into_iter()
            .filter(|s| s.kind != StructureKind::Road)
            .collect();

        for entry in pending {
            let removal = match ProvisionalRemoval::new(&mut *room, entry, &mut summary.restore_failures) {
                Ok(removal) => removal,
                Err(err) => {
                    debug!(
                        "BlockingSiteAuditor: could not remove {:?} site at {}: {}",
                        entry.kind, entry.location, err
                    );
                    continue;
                }
            };
            summary.inspected += 1;

            if self.still_connected(&*removal, entry.location, &anchors) {
                drop(removal);
            } else {
                removal.confirm();
                summary.removed.push(entry);
            }
        }

        debug!(
            "BlockingSiteAuditor: removed {} / {} sites, {} restore failures",
            summary.removed.len(),
            summary.inspected,
            summary.restore_failures
        );

        summary
    }
}
