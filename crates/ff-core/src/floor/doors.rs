//! Door-reachability enforcement against the floor topology.

use strum::IntoEnumIterator;

use crate::consts::{FLOOR, MASKED, REACHED, WALL};
use crate::grid::{find_interior_seed, flood_fill, grid_astar, RoomGrid};
use crate::room::{Dir, DoorMask};

/// Open each mandated door and carve until it is reachable from the interior.
///
/// Runs on every finalized room. Unmandated doors keep their border wall: a
/// room does not expose a door no neighbor uses. The work happens on a
/// scratch copy whose border is masked off so the search never routes along
/// the border ring; the reached scratch cells are applied back to the room
/// at the end, which is what finally opens the mandated door cells.
pub fn enforce_doors(room: &mut RoomGrid, mask: DoorMask) {
    if mask.is_empty() {
        return;
    }

    let mut scratch = room.clone();
    for dir in Dir::iter() {
        if mask.has(dir) {
            let (r, c) = dir.door_cell();
            scratch.set(r, c, FLOOR);
        }
    }
    mask_border(&mut scratch);

    let Some(seed) = find_interior_seed(&scratch) else {
        // No interior floor to connect from
        return;
    };

    loop {
        flood_fill(&mut scratch, seed, FLOOR, REACHED);

        let any_unmet = Dir::iter()
            .filter(|&dir| mask.has(dir))
            .map(Dir::door_cell)
            .any(|(r, c)| scratch.get(r, c) != Some(REACHED));
        if !any_unmet {
            break;
        }

        // The first unreached floor cell is connected to the filled region
        // via the cheapest wall-piercing route; carve that route.
        let path = grid_astar(&scratch, FLOOR, REACHED, WALL, Some(MASKED));
        if path.is_empty() {
            // An unmet door always leaves a carvable route; bail if not
            break;
        }
        for (r, c) in path {
            room.set(r, c, FLOOR);
            scratch.set(r, c, FLOOR);
        }
        flood_fill(&mut scratch, seed, REACHED, FLOOR);
    }

    for r in 0..scratch.height() {
        for c in 0..scratch.row_len(r) {
            if scratch.get(r, c) == Some(REACHED) {
                room.set(r, c, FLOOR);
            }
        }
    }
}

/// Swap every border wall for the mask sentinel so the search ignores it
fn mask_border(grid: &mut RoomGrid) {
    let h = grid.height();
    for r in 0..h {
        let len = grid.row_len(r);
        for c in 0..len {
            let on_border = r == 0 || r == h - 1 || c == 0 || c == len - 1;
            if on_border && grid.get(r, c) == Some(WALL) {
                grid.set(r, c, MASKED);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_hall() -> RoomGrid {
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
        ])
    }

    fn reaches_interior(room: &RoomGrid, from: (usize, usize)) -> bool {
        let mut probe = room.clone();
        flood_fill(&mut probe, from, FLOOR, REACHED);
        find_interior_seed(room)
            .map(|(r, c)| probe.get(r, c) == Some(REACHED))
            .unwrap_or(false)
    }

    #[test]
    fn test_empty_mask_leaves_room_untouched() {
        let mut room = open_hall();
        let before = room.clone();
        enforce_doors(&mut room, DoorMask::empty());
        assert_eq!(room, before);
    }

    #[test]
    fn test_mandated_doors_open_on_clear_interior() {
        let mut room = open_hall();
        enforce_doors(&mut room, DoorMask::EAST | DoorMask::WEST);
        assert_eq!(room.get(4, 0), Some(FLOOR));
        assert_eq!(room.get(4, 12), Some(FLOOR));
        // Unmandated doors stay shut
        assert_eq!(room.get(0, 6), Some(WALL));
        assert_eq!(room.get(8, 6), Some(WALL));
    }

    #[test]
    fn test_unmandated_border_is_intact() {
        let mut room = open_hall();
        enforce_doors(&mut room, DoorMask::NORTH);
        for c in 0..13 {
            if c != 6 {
                assert_eq!(room.get(0, c), Some(WALL));
                assert_eq!(room.get(8, c), Some(WALL));
            }
        }
        for r in 1..8 {
            assert_eq!(room.get(r, 0), Some(WALL));
            assert_eq!(room.get(r, 12), Some(WALL));
        }
    }

    #[test]
    fn test_carves_through_interior_wall_to_door() {
        // A full interior wall cuts the north door off from the floor below
        let mut room = RoomGrid::from_lines(&[
            "wwwwwwwwwwwww",
            "wwwwwwwwwwwww",
            "w...........w",
            "w...........w",
            "w...........w",
            "w...........w",
            "w...........w",
            "w...........w",
            "wwwwwwwwwwwww",
        ]);
        enforce_doors(&mut room, DoorMask::NORTH);
        assert_eq!(room.get(0, 6), Some(FLOOR));
        assert!(reaches_interior(&room, (0, 6)));
    }

    #[test]
    fn test_all_four_doors() {
        let mut room = open_hall();
        enforce_doors(&mut room, DoorMask::all());
        for dir in Dir::iter() {
            let (r, c) = dir.door_cell();
            assert_eq!(room.get(r, c), Some(FLOOR), "{dir} door should be open");
            assert!(reaches_interior(&room, (r, c)), "{dir} door should reach in");
        }
    }

    #[test]
    fn test_no_sentinels_left_behind() {
        let mut room = RoomGrid::from_lines(&[
            "wwwwwwwwwwwww",
            "wwwwwwwwwwwww",
            "w.wwwwwwwww.w",
            "w.wwwwwwwww.w",
            "w.wwwwwwwww.w",
            "w.wwwwwwwww.w",
            "w.wwwwwwwww.w",
            "w.wwwwwwwww.w",
            "wwwwwwwwwwwww",
        ]);
        enforce_doors(&mut room, DoorMask::all());
        assert!(!room.contains(REACHED));
        assert!(!room.contains(MASKED));
    }
}
