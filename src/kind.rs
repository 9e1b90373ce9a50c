//! Closed set of structure kinds and the construction/repair priority table.

use screeps::constants::StructureType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every structure kind the planner knows about.
///
/// Serialized names match the game's structure type strings.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructureKind {
    Spawn,
    Extension,
    Tower,
    Storage,
    Container,
    Road,
    #[serde(rename = "constructedWall")]
    Wall,
    Rampart,
    Link,
    Terminal,
    Lab,
    Factory,
    Nuker,
    Observer,
    PowerSpawn,
    Extractor,
    Controller,
    KeeperLair,
    Portal,
    PowerBank,
    InvaderCore,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KindError {
    #[error("unrecognized structure type {0:?}")]
    Unrecognized(StructureType),
}

impl StructureKind {
    pub const ALL: [StructureKind; 21] = [
        StructureKind::Spawn,
        StructureKind::Extension,
        StructureKind::Tower,
        StructureKind::Storage,
        StructureKind::Container,
        StructureKind::Road,
        StructureKind::Wall,
        StructureKind::Rampart,
        StructureKind::Link,
        StructureKind::Terminal,
        StructureKind::Lab,
        StructureKind::Factory,
        StructureKind::Nuker,
        StructureKind::Observer,
        StructureKind::PowerSpawn,
        StructureKind::Extractor,
        StructureKind::Controller,
        StructureKind::KeeperLair,
        StructureKind::Portal,
        StructureKind::PowerBank,
        StructureKind::InvaderCore,
    ];

    /// Construction and repair urgency. Higher is more urgent.
    pub fn priority(self) -> u32 {
        match self {
            StructureKind::Spawn => 8,
            StructureKind::Extension => 7,
            StructureKind::Tower => 6,
            StructureKind::Storage => 5,
            StructureKind::Container => 4,
            StructureKind::Road => 3,
            StructureKind::Wall => 2,
            StructureKind::Rampart => 1,
            StructureKind::Link
            | StructureKind::Terminal
            | StructureKind::Lab
            | StructureKind::Factory
            | StructureKind::Nuker
            | StructureKind::Observer
            | StructureKind::PowerSpawn
            | StructureKind::Extractor => 0,
            // Not constructible.
            StructureKind::Controller
            | StructureKind::KeeperLair
            | StructureKind::Portal
            | StructureKind::PowerBank
            | StructureKind::InvaderCore => 0,
        }
    }

    /// Creeps can stand on these.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            StructureKind::Road | StructureKind::Container | StructureKind::Rampart
        )
    }

    /// Repaired only up to a fixed hit ceiling instead of full health.
    pub fn is_fortification(self) -> bool {
        matches!(self, StructureKind::Wall | StructureKind::Rampart)
    }
}

impl TryFrom<StructureType> for StructureKind {
    type Error = KindError;

    fn try_from(structure_type: StructureType) -> Result<Self, Self::Error> {
        let kind = match structure_type {
            StructureType::Spawn => StructureKind::Spawn,
            StructureType::Extension => StructureKind::Extension,
            StructureType::Tower => StructureKind::Tower,
            StructureType::Storage => StructureKind::Storage,
            StructureType::Container => StructureKind::Container,
            StructureType::Road => StructureKind::Road,
            StructureType::Wall => StructureKind::Wall,
            StructureType::Rampart => StructureKind::Rampart,
            StructureType::Link => StructureKind::Link,
            StructureType::Terminal => StructureKind::Terminal,
            StructureType::Lab => StructureKind::Lab,
            StructureType::Factory => StructureKind::Factory,
            StructureType::Nuker => StructureKind::Nuker,
            StructureType::Observer => StructureKind::Observer,
            StructureType::PowerSpawn => StructureKind::PowerSpawn,
            StructureType::Extractor => StructureKind::Extractor,
            StructureType::Controller => StructureKind::Controller,
            StructureType::KeeperLair => StructureKind::KeeperLair,
            StructureType::Portal => StructureKind::Portal,
            StructureType::PowerBank => StructureKind::PowerBank,
            StructureType::InvaderCore => StructureKind::InvaderCore,
            #[allow(unreachable_patterns)]
            other => return Err(KindError::Unrecognized(other)),
        };

        Ok(kind)
    }
}

impl From<StructureKind> for StructureType {
    fn from(kind: StructureKind) -> Self {
        match kind {
            StructureKind::Spawn => StructureType::Spawn,
            StructureKind::Extension => StructureType::Extension,
            StructureKind::Tower => StructureType::Tower,
            StructureKind::Storage => StructureType::Storage,
            StructureKind::Container => StructureType::Container,
            StructureKind::Road => StructureType::Road,
            StructureKind::Wall => StructureType::Wall,
            StructureKind::Rampart => StructureType::Rampart,
            StructureKind::Link => StructureType::Link,
            StructureKind::Terminal => StructureType::Terminal,
            StructureKind::Lab => StructureType::Lab,
            StructureKind::Factory => StructureType::Factory,
            StructureKind::Nuker => StructureType::Nuker,
            StructureKind::Observer => StructureType::Observer,
            StructureKind::PowerSpawn => StructureType::PowerSpawn,
            StructureKind::Extractor => StructureType::Extractor,
            StructureKind::Controller => StructureType::Controller,
            StructureKind::KeeperLair => StructureType::KeeperLair,
            StructureKind::Portal => StructureType::Portal,
            StructureKind::PowerBank => StructureType::PowerBank,
            StructureKind::InvaderCore => StructureType::InvaderCore,
        }
    }
}
