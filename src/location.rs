use crate::constants::*;
use crate::terrain::NEIGHBORS_8;
use serde::*;
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct Location {
    packed: u16,
}

impl Location {
    pub fn from_coords(x: u32, y: u32) -> Self {
        Location {
            packed: ((x << 8) | y) as u16,
        }
    }

    #[inline]
    pub fn from_xy(x: u8, y: u8) -> Self {
        Location::from_coords(x as u32, y as u32)
    }

    #[inline]
    pub fn x(self) -> u8 {
        ((self.packed >> 8) & 0xFF) as u8
    }

    #[inline]
    pub fn y(self) -> u8 {
        (self.packed & 0xFF) as u8
    }

    #[inline]
    pub fn packed_repr(self) -> u16 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u16) -> Self {
        Location { packed }
    }

    /// Chebyshev distance.
    pub fn distance_to(self, other: Self) -> u8 {
        let dx = (self.x() as i16) - (other.x() as i16);
        let dy = (self.y() as i16) - (other.y() as i16);

        dx.abs().max(dy.abs()) as u8
    }

    /// True when `other` is within `range` tiles (inclusive).
    #[inline]
    pub fn in_range_to(self, other: Self, range: u8) -> bool {
        self.distance_to(other) <= range
    }

    /// Offset by `(dx, dy)`, or `None` when the result leaves the room.
    pub fn offset(self, dx: i16, dy: i16) -> Option<Self> {
        let x = self.x() as i16 + dx;
        let y = self.y() as i16 + dy;
        if (0..ROOM_WIDTH as i16).contains(&x) && (0..ROOM_HEIGHT as i16).contains(&y) {
            Some(Location::from_coords(x as u32, y as u32))
        } else {
            None
        }
    }

    /// Whether the tile lies inside the buildable area (not on the room edge).
    #[inline]
    pub fn is_buildable_area(self) -> bool {
        (ROOM_EDGE_MARGIN..ROOM_WIDTH - ROOM_EDGE_MARGIN).contains(&self.x())
            && (ROOM_EDGE_MARGIN..ROOM_HEIGHT - ROOM_EDGE_MARGIN).contains(&self.y())
    }

    /// The 8 surrounding tiles that lie inside the room.
    pub fn neighbors(self) -> impl Iterator<Item = Location> {
        NEIGHBORS_8
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(dx as i16, dy as i16))
    }

    /// Integer centroid (floor of the mean) of a set of locations.
    pub fn centroid<I>(locations: I) -> Option<Location>
    where
        I: IntoIterator<Item = Location>,
    {
        let (count, sum_x, sum_y) = locations
            .into_iter()
            .fold((0u32, 0u32, 0u32), |(n, sx, sy), loc| {
                (n + 1, sx + loc.x() as u32, sy + loc.y() as u32)
            });

        if count == 0 {
            None
        } else {
            Some(Location::from_coords(sum_x / count, sum_y / count))
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

impl Serialize for Location {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(Location::from_packed)
    }
}
