//! Room model: door geometry, validation, repair, and the default library.
//!
//! A room is a 9x13 [`RoomGrid`](crate::grid::RoomGrid) whose border is wall
//! except for up to four door cells, one per side at the border midpoint.

mod defaults;
mod repair;
mod validate;

pub use defaults::{default_rooms, pick_default};
pub use repair::{repair, repair_until_stable};
pub use validate::{validate, Defect, Verdict};

use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString};

use crate::consts::{ROOM_H, ROOM_W};

/// Compass direction from one room toward an adjacent room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum Dir {
    #[strum(serialize = "N")]
    North,
    #[strum(serialize = "S")]
    South,
    #[strum(serialize = "E")]
    East,
    #[strum(serialize = "W")]
    West,
}

impl Dir {
    /// The direction pointing back
    pub const fn opposite(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::South => Dir::North,
            Dir::East => Dir::West,
            Dir::West => Dir::East,
        }
    }

    /// The border-midpoint door cell a room exposes toward this direction
    pub const fn door_cell(self) -> (usize, usize) {
        match self {
            Dir::North => (0, ROOM_W / 2),
            Dir::South => (ROOM_H - 1, ROOM_W / 2),
            Dir::East => (ROOM_H / 2, ROOM_W - 1),
            Dir::West => (ROOM_H / 2, 0),
        }
    }
}

bitflags! {
    /// The subset of a room's four doors mandated by the floor topology
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DoorMask: u8 {
        const NORTH = 0x01;
        const SOUTH = 0x02;
        const EAST = 0x04;
        const WEST = 0x08;
    }
}

impl From<Dir> for DoorMask {
    fn from(dir: Dir) -> Self {
        match dir {
            Dir::North => DoorMask::NORTH,
            Dir::South => DoorMask::SOUTH,
            Dir::East => DoorMask::EAST,
            Dir::West => DoorMask::WEST,
        }
    }
}

impl DoorMask {
    /// True if the mask mandates a door toward `dir`
    pub fn has(self, dir: Dir) -> bool {
        self.contains(DoorMask::from(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_cells_sit_on_border_midpoints() {
        assert_eq!(Dir::North.door_cell(), (0, ROOM_W / 2));
        assert_eq!(Dir::South.door_cell(), (ROOM_H - 1, ROOM_W / 2));
        assert_eq!(Dir::East.door_cell(), (ROOM_H / 2, ROOM_W - 1));
        assert_eq!(Dir::West.door_cell(), (ROOM_H / 2, 0));
    }

    #[test]
    fn test_opposite_round_trips() {
        use strum::IntoEnumIterator;
        for dir in Dir::iter() {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(Dir::North.to_string(), "N");
        assert_eq!("W".parse::<Dir>(), Ok(Dir::West));
        assert!("X".parse::<Dir>().is_err());
    }

    #[test]
    fn test_mask_from_directions() {
        let mask = DoorMask::from(Dir::North) | DoorMask::from(Dir::East);
        assert!(mask.has(Dir::North));
        assert!(mask.has(Dir::East));
        assert!(!mask.has(Dir::South));
        assert!(!mask.has(Dir::West));
    }
}
