use crate::constants::*;
use crate::location::*;
use bitflags::*;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TerrainFlags: u8 {
        const NONE = 0;
        const WALL = 1;
        const SWAMP = 2;
    }
}

/// Room terrain as a flat 50x50 buffer of `TerrainFlags` bits.
#[derive(Clone, Serialize, Deserialize)]
pub struct FastRoomTerrain {
    buffer: Vec<u8>,
}

impl FastRoomTerrain {
    pub fn new(buffer: Vec<u8>) -> FastRoomTerrain {
        FastRoomTerrain { buffer }
    }

    /// A room with no walls or swamps.
    pub fn plain() -> FastRoomTerrain {
        FastRoomTerrain {
            buffer: vec![0; ROOM_WIDTH as usize * ROOM_HEIGHT as usize],
        }
    }

    pub fn get(&self, pos: &Location) -> TerrainFlags {
        self.get_xy(pos.x(), pos.y())
    }

    /// Tiles outside the room read as walls.
    pub fn get_xy(&self, x: u8, y: u8) -> TerrainFlags {
        if x >= ROOM_WIDTH || y >= ROOM_HEIGHT {
            return TerrainFlags::WALL;
        }
        let index = (y as usize * ROOM_WIDTH as usize) + (x as usize);
        self.buffer
            .get(index)
            .map(|bits| TerrainFlags::from_bits_truncate(*bits))
            .unwrap_or(TerrainFlags::WALL)
    }

    pub fn set_xy(&mut self, x: u8, y: u8, flags: TerrainFlags) {
        if x >= ROOM_WIDTH || y >= ROOM_HEIGHT {
            return;
        }
        let index = (y as usize * ROOM_WIDTH as usize) + (x as usize);
        if let Some(slot) = self.buffer.get_mut(index) {
            *slot = flags.bits();
        }
    }

    pub fn is_wall(&self, x: u8, y: u8) -> bool {
        self.get_xy(x, y).contains(TerrainFlags::WALL)
    }

    pub fn is_swamp(&self, x: u8, y: u8) -> bool {
        self.get_xy(x, y).contains(TerrainFlags::SWAMP)
    }
}

/// Neighbor offsets for 8-directional movement.
pub const NEIGHBORS_8: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];
