//! Built-in fallback rooms, substituted when a candidate is unusable.

use std::sync::LazyLock;

use crate::grid::RoomGrid;
use crate::rng::FloorRng;

// Every room here is 9x13, fully walled, internally connected, and keeps
// all four door approaches clear, so substitution never needs a repair.
static DEFAULT_ROOMS: LazyLock<Vec<RoomGrid>> = LazyLock::new(|| {
    vec![
        // Open hall
        RoomGrid::from_lines(&[
            "wwwwwwwwwwwww",
            "w...........w",
            "w...........w",
            "w...........w",
            "w...........w",
            "w...........w",
            "w...........w",
            "w...........w",
            "wwwwwwwwwwwww",
        ]),
        // Pillared hall
        RoomGrid::from_lines(&[
            "wwwwwwwwwwwww",
            "w...........w",
            "w..w..w..w..w",
            "w...........w",
            "w..w..w..w..w",
            "w...........w",
            "w..w..w..w..w",
            "w...........w",
            "wwwwwwwwwwwww",
        ]),
        // Crossing
        RoomGrid::from_lines(&[
            "wwwwwwwwwwwww",
            "wwwww...wwwww",
            "wwwww...wwwww",
            "w...........w",
            "w...........w",
            "w...........w",
            "wwwww...wwwww",
            "wwwww...wwwww",
            "wwwwwwwwwwwww",
        ]),
        // Ring walk around a vault
        RoomGrid::from_lines(&[
            "wwwwwwwwwwwww",
            "w...........w",
            "w.wwww.wwww.w",
            "w.w.......w.w",
            "w.w.......w.w",
            "w.w.......w.w",
            "w.wwwwwwwww.w",
            "w...........w",
            "wwwwwwwwwwwww",
        ]),
        // Twin chambers
        RoomGrid::from_lines(&[
            "wwwwwwwwwwwww",
            "w...........w",
            "w.....w.....w",
            "w.....w.....w",
            "w.....w.....w",
            "w.....w.....w",
            "w.....w.....w",
            "w...........w",
            "wwwwwwwwwwwww",
        ]),
        // Alcoved hall
        RoomGrid::from_lines(&[
            "wwwwwwwwwwwww",
            "w...........w",
            "w...........w",
            "w...........w",
            "w...........w",
            "w.ww.www.ww.w",
            "w.w...w...w.w",
            "w...........w",
            "wwwwwwwwwwwww",
        ]),
    ]
});

/// The full default library
pub fn default_rooms() -> &'static [RoomGrid] {
    &DEFAULT_ROOMS
}

/// A fresh copy of a uniformly chosen default room
pub fn pick_default(rng: &mut FloorRng) -> RoomGrid {
    let rooms = default_rooms();
    rng.choose(rooms).cloned().unwrap_or_else(|| rooms[0].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ROOM_H, ROOM_W};
    use crate::room::{validate, Verdict};

    #[test]
    fn test_every_default_is_valid() {
        for (i, room) in default_rooms().iter().enumerate() {
            let mut room = room.clone();
            assert_eq!(validate(&mut room), Verdict::Valid, "default room {i}");
        }
    }

    #[test]
    fn test_every_default_has_exact_dimensions() {
        for room in default_rooms() {
            assert_eq!(room.height(), ROOM_H);
            for r in 0..ROOM_H {
                assert_eq!(room.row_len(r), ROOM_W);
            }
        }
    }

    #[test]
    fn test_pick_returns_a_library_member() {
        let mut rng = FloorRng::new(3);
        for _ in 0..20 {
            let picked = pick_default(&mut rng);
            assert!(default_rooms().contains(&picked));
        }
    }
}
