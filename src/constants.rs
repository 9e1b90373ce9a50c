use crate::kind::StructureKind;

pub const ROOM_WIDTH: u8 = 50;
pub const ROOM_HEIGHT: u8 = 50;

/// Tiles closer than this to the room edge are never built on.
pub const ROOM_EDGE_MARGIN: u8 = 1;

/// Maximum number of construction sites a player may have at once.
pub const MAX_CONSTRUCTION_SITES: usize = 100;

/// Highest controller level.
pub const MAX_ROOM_LEVEL: u8 = 8;

/// Maximum number of extensions permitted at a given controller level.
/// Levels outside 0..=8 permit none.
pub fn extensions_at_level(level: u8) -> u32 {
    match level {
        0 | 1 => 0,
        2 => 5,
        3 => 10,
        4 => 20,
        5 => 30,
        6 => 40,
        7 => 50,
        8 => 60,
        _ => 0,
    }
}

/// Maximum number of a given structure kind allowed at a given controller level.
/// Returns 0 if the structure is not available at that level.
/// Based on the Screeps API: <https://docs.screeps.com/control.html>
///
/// Note: Container and Road have no per-level limits (unlimited at all levels).
/// Rampart and Wall share the same limits. Natural structures can never be built.
pub fn max_structures_at_level(kind: StructureKind, level: u8) -> u32 {
    if level > MAX_ROOM_LEVEL {
        return 0;
    }

    match kind {
        StructureKind::Spawn => match level {
            0 => 0,
            1..=6 => 1,
            7 => 2,
            _ => 3,
        },
        StructureKind::Extension => extensions_at_level(level),
        StructureKind::Link => match level {
            0..=4 => 0,
            5 => 2,
            6 => 3,
            7 => 4,
            _ => 6,
        },
        StructureKind::Storage => match level {
            0..=3 => 0,
            _ => 1,
        },
        StructureKind::Tower => match level {
            0..=2 => 0,
            3..=4 => 1,
            5..=6 => 2,
            7 => 3,
            _ => 6,
        },
        StructureKind::Observer | StructureKind::PowerSpawn | StructureKind::Nuker => {
            match level {
                0..=7 => 0,
                _ => 1,
            }
        }
        StructureKind::Extractor | StructureKind::Terminal => match level {
            0..=5 => 0,
            _ => 1,
        },
        StructureKind::Lab => match level {
            0..=5 => 0,
            6 => 3,
            7 => 6,
            _ => 10,
        },
        StructureKind::Factory => match level {
            0..=6 => 0,
            _ => 1,
        },
        StructureKind::Rampart | StructureKind::Wall => match level {
            0 | 1 => 0,
            _ => 2500, // Effectively unlimited
        },
        StructureKind::Road | StructureKind::Container => 2500, // Effectively unlimited
        StructureKind::Controller
        | StructureKind::KeeperLair
        | StructureKind::Portal
        | StructureKind::PowerBank
        | StructureKind::InvaderCore => 0,
    }
}
