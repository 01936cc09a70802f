//! Defect-specific room repair, applied in place.

use crate::consts::{FLOOR, REACHED, ROOM_H, ROOM_W, WALL};
use crate::grid::{find_interior_seed, flood_fill, grid_astar, RoomGrid};

use super::{Defect, Verdict, validate};

/// Apply the repair for one defect class.
///
/// Garbage and Height are not mechanically repairable and Doors is resolved
/// by the door enforcer once adjacency is known, so those three are no-ops
/// here; the caller's discard policy handles them.
pub fn repair(room: &mut RoomGrid, defect: Defect) {
    match defect {
        Defect::Width => repair_width(room),
        Defect::Borders => repair_borders(room),
        Defect::Connections => repair_connections(room),
        Defect::Garbage | Defect::Height | Defect::Doors => {}
    }
}

/// Pad short rows with floor just before the trailing wall, trim long rows
fn repair_width(room: &mut RoomGrid) {
    for r in 0..room.height() {
        if let Some(row) = room.row_mut(r) {
            while row.len() < ROOM_W {
                let at = row.len().saturating_sub(1);
                row.insert(at, FLOOR);
            }
            row.truncate(ROOM_W);
        }
    }
}

/// Force every perimeter cell to wall
fn repair_borders(room: &mut RoomGrid) {
    for r in 0..ROOM_H {
        room.set(r, 0, WALL);
        room.set(r, ROOM_W - 1, WALL);
    }
    for c in 0..ROOM_W {
        room.set(0, c, WALL);
        room.set(ROOM_H - 1, c, WALL);
    }
}

/// Join the seed's floor region to the nearest disconnected floor region
/// by carving the cheapest wall-piercing route between them
fn repair_connections(room: &mut RoomGrid) {
    let Some(seed) = find_interior_seed(room) else {
        // No floor at all; nothing to grow a connection from
        return;
    };
    flood_fill(room, seed, FLOOR, REACHED);
    let path = grid_astar(room, REACHED, FLOOR, WALL, None);
    for (r, c) in path {
        room.set(r, c, FLOOR);
    }
    flood_fill(room, seed, REACHED, FLOOR);
}

/// Validate and repair in a loop until the verdict settles.
///
/// Returns Valid, Defer, or Discard. A repair pass that leaves the grid
/// unchanged while the validator still demands repair cannot make progress
/// (a grid with zero floor cells does this), so it settles as a discard
/// and the caller substitutes a default room.
pub fn repair_until_stable(room: &mut RoomGrid) -> Verdict {
    loop {
        match validate(room) {
            Verdict::Repair(defect) => {
                let before = room.clone();
                repair(room, defect);
                if *room == before {
                    return Verdict::Discard(defect);
                }
            }
            verdict => return verdict,
        }
    }
}
