//! Planner tunables.
//!
//! Every section defaults to the values the planner was tuned with, so a
//! partial JSON document only needs to name the fields it overrides.

use crate::constants::ROOM_WIDTH;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Farthest ring a cluster search may reach.
pub const MAX_RING_DISTANCE: u8 = ROOM_WIDTH - 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse planner config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{section}: min_distance {min} exceeds max_distance {max}")]
    InvalidRing {
        section: &'static str,
        min: u8,
        max: u8,
    },
    #[error("{section}: max_distance {max} exceeds {limit}")]
    RingTooWide {
        section: &'static str,
        max: u8,
        limit: u8,
    },
    #[error("extension.min_free_neighbors {0} exceeds the 8 neighbors of a tile")]
    TooManyFreeNeighbors(u8),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PlannerConfig {
    pub extension: ExtensionConfig,
    pub road: RoadConfig,
    pub audit: AuditConfig,
    pub repair: RepairConfig,
    pub schedule: ScheduleConfig,
    /// Base seed for candidate shuffling.
    pub seed: u64,
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extension
            .spawn_cluster
            .validate("extension.spawn_cluster")?;
        self.extension
            .source_cluster
            .validate("extension.source_cluster")?;
        if self.extension.min_free_neighbors > 8 {
            return Err(ConfigError::TooManyFreeNeighbors(
                self.extension.min_free_neighbors,
            ));
        }

        if self.schedule.road_interval == 0 {
            return Err(ConfigError::ZeroInterval("schedule.road_interval"));
        }
        if self.schedule.audit_interval == 0 {
            return Err(ConfigError::ZeroInterval("schedule.audit_interval"));
        }

        Ok(())
    }
}

/// A square ring search around one anchor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterRing {
    /// Extensions to place around each anchor.
    pub count: u32,
    pub min_distance: u8,
    pub max_distance: u8,
}

impl ClusterRing {
    fn validate(&self, section: &'static str) -> Result<(), ConfigError> {
        if self.min_distance > self.max_distance {
            return Err(ConfigError::InvalidRing {
                section,
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        if self.max_distance > MAX_RING_DISTANCE {
            return Err(ConfigError::RingTooWide {
                section,
                max: self.max_distance,
                limit: MAX_RING_DISTANCE,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpacingConfig {
    /// Extensions never go within this range of the spawn they cluster around.
    pub to_spawn: u8,
    /// Extensions never go within this range of any source.
    pub to_source: u8,
    /// Source-cluster extensions keep this range from every structure.
    pub between: u8,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        SpacingConfig {
            to_spawn: 2,
            to_source: 2,
            between: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtensionConfig {
    pub spawn_cluster: ClusterRing,
    pub source_cluster: ClusterRing,
    pub spacing: SpacingConfig,
    /// Walkable neighbors an extension tile must keep.
    pub min_free_neighbors: u8,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            spawn_cluster: ClusterRing {
                count: 10,
                min_distance: 2,
                max_distance: 5,
            },
            source_cluster: ClusterRing {
                count: 5,
                min_distance: 2,
                max_distance: 4,
            },
            spacing: SpacingConfig::default(),
            min_free_neighbors: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoadConfig {
    /// Pending sites needed before a road is laid to their centroid.
    pub min_sites_for_road: usize,
    pub max_ops: u32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        RoadConfig {
            min_sites_for_road: 5,
            max_ops: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStrategy {
    /// Single pass; each seed claims every unassigned extension in range.
    #[default]
    Greedy,
    /// Connected components of the in-range graph.
    Connected,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuditConfig {
    pub max_ops: u32,
    pub cluster_radius: u8,
    pub clustering: ClusterStrategy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            max_ops: 200,
            cluster_radius: 3,
            clustering: ClusterStrategy::Greedy,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepairConfig {
    /// Walls and ramparts are repaired up to this many hits.
    pub wall_hits_limit: u32,
}

impl Default for RepairConfig {
    fn default() -> Self {
        RepairConfig {
            wall_hits_limit: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScheduleConfig {
    pub road_interval: u32,
    pub audit_interval: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            road_interval: 100,
            audit_interval: 50,
        }
    }
}
