//! Room validation: ordered short-circuit checks over a defect taxonomy.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::consts::{FLOOR, REACHED, ROOM_H, ROOM_W, WALL};
use crate::grid::{find_interior_seed, flood_fill, RoomGrid};

use super::Dir;

/// Structural defect classes, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Defect {
    Garbage,
    Height,
    Width,
    Borders,
    Connections,
    Doors,
}

/// What the validator concluded about a candidate grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Structurally sound, and every door would be reachable if opened
    Valid,
    /// Fixable in place by the repair stage
    Repair(Defect),
    /// Not mechanically fixable; the caller substitutes a default room
    Discard(Defect),
    /// Sound except that some doors are unreachable from the interior;
    /// resolved once the floor topology says which doors actually matter
    Defer,
}

/// Classify a candidate room grid.
///
/// Checks run in a fixed order and the first hit wins: garbage symbols,
/// wrong height, wrong width, non-wall border, disconnected interior,
/// unreachable doors. The connectivity check paints the grid and restores
/// it before returning, so the grid is unchanged on every path.
pub fn validate(room: &mut RoomGrid) -> Verdict {
    for row in room.rows() {
        for &cell in row {
            if cell != WALL && cell != FLOOR {
                return Verdict::Discard(Defect::Garbage);
            }
        }
    }

    if room.height() != ROOM_H {
        return Verdict::Discard(Defect::Height);
    }

    if (0..ROOM_H).any(|r| room.row_len(r) != ROOM_W) {
        return Verdict::Repair(Defect::Width);
    }

    if !border_is_wall(room) {
        return Verdict::Repair(Defect::Borders);
    }

    let Some(seed) = find_interior_seed(room) else {
        return Verdict::Repair(Defect::Connections);
    };
    flood_fill(room, seed, FLOOR, REACHED);
    let disconnected = room.contains(FLOOR);
    flood_fill(room, seed, REACHED, FLOOR);
    if disconnected {
        return Verdict::Repair(Defect::Connections);
    }

    // With all four doors forced open, the whole grid must be reachable
    let mut probe = room.clone();
    for dir in Dir::iter() {
        let (r, c) = dir.door_cell();
        probe.set(r, c, FLOOR);
    }
    flood_fill(&mut probe, seed, FLOOR, REACHED);
    if probe.contains(FLOOR) {
        return Verdict::Defer;
    }

    Verdict::Valid
}

fn border_is_wall(room: &RoomGrid) -> bool {
    (0..ROOM_H).all(|r| {
        room.get(r, 0) == Some(WALL) && room.get(r, ROOM_W - 1) == Some(WALL)
    }) && (0..ROOM_W).all(|c| {
        room.get(0, c) == Some(WALL) && room.get(ROOM_H - 1, c) == Some(WALL)
    })
}
