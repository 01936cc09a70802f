//! Floor layout: which room identifier occupies which coarse-grid cell.

use serde::{Deserialize, Serialize};

use crate::rng::FloorRng;

/// A square grid of room identifiers, 0 for empty.
///
/// Identifiers are 1-based and dense: a layout for R rooms uses each of
/// 1..=R exactly once. The side length (R + 2) / 2 leaves enough slack for
/// the growth loop to always find a free neighbor eventually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorLayout {
    cells: Vec<Vec<u8>>,
}

impl FloorLayout {
    /// Wrap pre-existing rows, exactly as received
    pub fn from_rows(cells: Vec<Vec<u8>>) -> Self {
        Self { cells }
    }

    /// Grow a layout for `room_count` rooms by greedy randomized placement.
    ///
    /// The first room lands on a uniformly random cell. Each further room
    /// picks a random already-placed cell as its anchor, shuffles the four
    /// orthogonal directions, and takes the free in-bounds candidate with
    /// the lowest 3x3 occupancy count, which biases the floor toward
    /// sprawling instead of clumping. A room with no free candidate goes
    /// back to the front of the queue and is retried from a fresh anchor.
    pub fn generate(room_count: usize, rng: &mut FloorRng) -> Self {
        let side = (room_count + 2) / 2;
        let mut layout = Self {
            cells: vec![vec![0; side]; side],
        };

        let mut ids: Vec<u8> = (1..=room_count as u8).collect();
        rng.shuffle(&mut ids);

        let mut placed: Vec<(usize, usize)> = Vec::new();
        if let Some(id) = ids.pop() {
            let start = (
                rng.rn2(side as u32) as usize,
                rng.rn2(side as u32) as usize,
            );
            layout.cells[start.0][start.1] = id;
            placed.push(start);
        }

        while let Some(id) = ids.pop() {
            let Some(&(ar, ac)) = rng.choose(&placed) else {
                break;
            };

            let mut dirs = [(0i32, 1i32), (1, 0), (0, -1), (-1, 0)];
            rng.shuffle(&mut dirs);

            let mut best: Option<(usize, usize)> = None;
            let mut best_density = usize::MAX;
            for (dr, dc) in dirs {
                let nr = ar as i32 + dr;
                let nc = ac as i32 + dc;
                if nr < 0 || nc < 0 || nr as usize >= side || nc as usize >= side {
                    continue;
                }
                let (nr, nc) = (nr as usize, nc as usize);
                if layout.cells[nr][nc] != 0 {
                    continue;
                }
                let density = layout.density(nr, nc);
                if density < best_density {
                    best_density = density;
                    best = Some((nr, nc));
                }
            }

            match best {
                Some((r, c)) => {
                    layout.cells[r][c] = id;
                    placed.push((r, c));
                }
                // All four neighbors taken, retry later from another anchor
                None => ids.insert(0, id),
            }
        }

        layout
    }

    /// Occupied cells in the 3x3 block around (r, c), self included
    fn density(&self, r: usize, c: usize) -> usize {
        let side = self.side();
        let mut count = 0;
        for i in r.saturating_sub(1)..=(r + 1).min(side.saturating_sub(1)) {
            for j in c.saturating_sub(1)..=(c + 1).min(side.saturating_sub(1)) {
                if self.cells[i][j] != 0 {
                    count += 1;
                }
            }
        }
        count
    }

    /// Side length of the grid
    pub fn side(&self) -> usize {
        self.cells.len()
    }

    /// Identifier at (row, col), None when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Iterate over every non-zero cell as (row, col, identifier)
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &id)| id != 0)
                .map(move |(c, &id)| (r, c, id))
        })
    }

    /// Check a layout that did not come from [`FloorLayout::generate`].
    ///
    /// Accepts any rectangular grid that uses each identifier 1..=room_count
    /// exactly once, has no other non-zero values, and whose occupied cells
    /// form one 4-connected region. Provider-proposed layouts that fail are
    /// thrown away and regenerated locally.
    pub fn validate(&self, room_count: usize) -> bool {
        let Some(first_row) = self.cells.first() else {
            return false;
        };
        let width = first_row.len();
        if self.cells.iter().any(|row| row.len() != width) {
            return false;
        }

        let mut seen = vec![0usize; room_count + 1];
        for row in &self.cells {
            for &id in row {
                if id == 0 {
                    continue;
                }
                if id as usize > room_count {
                    return false;
                }
                seen[id as usize] += 1;
            }
        }
        if seen[1..].iter().any(|&n| n != 1) {
            return false;
        }

        self.occupied_region_size() == room_count
    }

    /// Size of the 4-connected occupied region around the first non-zero cell
    fn occupied_region_size(&self) -> usize {
        let Some((sr, sc, _)) = self.occupied_cells().next() else {
            return 0;
        };

        let mut visited = vec![vec![false; self.cells[0].len()]; self.cells.len()];
        let mut stack = vec![(sr, sc)];
        let mut count = 0;
        while let Some((r, c)) = stack.pop() {
            if visited[r][c] || self.cells[r][c] == 0 {
                continue;
            }
            visited[r][c] = true;
            count += 1;
            if r > 0 {
                stack.push((r - 1, c));
            }
            if r + 1 < self.cells.len() {
                stack.push((r + 1, c));
            }
            if c > 0 {
                stack.push((r, c - 1));
            }
            if c + 1 < self.cells[r].len() {
                stack.push((r, c + 1));
            }
        }
        count
    }
}
