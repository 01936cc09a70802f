//! Character-grid primitives: flood fill, interior seed scan, grid A*.
//!
//! Everything downstream (validation, repair, door carving) is built on the
//! three operations in this module. Grids use (row, col) indexing throughout.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::consts::FLOOR;

/// A room-sized character grid.
///
/// Construction performs no shape enforcement: candidate grids coming back
/// from a content provider may be ragged, wrong-sized, or full of garbage
/// symbols, and the validator owns that judgment. The operations here are
/// written to tolerate arbitrary row lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomGrid {
    rows: Vec<Vec<char>>,
}

impl RoomGrid {
    /// Create a grid from raw rows, exactly as received
    pub fn from_rows(rows: Vec<Vec<char>>) -> Self {
        Self { rows }
    }

    /// Create a grid from string rows, one character per cell
    pub fn from_lines(lines: &[&str]) -> Self {
        Self {
            rows: lines.iter().map(|line| line.chars().collect()).collect(),
        }
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of one row, 0 if the row does not exist
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |r| r.len())
    }

    /// Cell at (row, col), None when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Set cell at (row, col), ignored when out of bounds
    pub fn set(&mut self, row: usize, col: usize, sym: char) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = sym;
        }
    }

    /// Mutable access to one row, for structural edits (pad/truncate)
    pub fn row_mut(&mut self, row: usize) -> Option<&mut Vec<char>> {
        self.rows.get_mut(row)
    }

    /// Iterate over rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// True if any cell equals the symbol
    pub fn contains(&self, sym: char) -> bool {
        self.rows.iter().any(|r| r.contains(&sym))
    }

    /// Number of cells equal to the symbol
    pub fn count(&self, sym: char) -> usize {
        self.rows
            .iter()
            .map(|r| r.iter().filter(|&&c| c == sym).count())
            .sum()
    }

    /// First cell equal to the symbol in row-major order
    pub fn find(&self, sym: char) -> Option<(usize, usize)> {
        for (r, row) in self.rows.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                if cell == sym {
                    return Some((r, c));
                }
            }
        }
        None
    }
}

impl std::ops::Index<usize> for RoomGrid {
    type Output = [char];

    fn index(&self, row: usize) -> &Self::Output {
        &self.rows[row]
    }
}

impl std::fmt::Display for RoomGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterative 4-connected flood fill starting at (row, col).
///
/// Replaces every reachable cell equal to `target` with `replacement`.
/// No-op when target == replacement, which would otherwise toggle forever.
pub fn flood_fill(grid: &mut RoomGrid, start: (usize, usize), target: char, replacement: char) {
    if target == replacement {
        return;
    }

    let mut stack = vec![start];
    while let Some((r, c)) = stack.pop() {
        if grid.get(r, c) != Some(target) {
            continue;
        }
        grid.set(r, c, replacement);
        if r > 0 {
            stack.push((r - 1, c));
        }
        stack.push((r + 1, c));
        if c > 0 {
            stack.push((r, c - 1));
        }
        stack.push((r, c + 1));
    }
}

/// First floor cell strictly inside the border ring, row-major order.
///
/// Returns None when the grid has no interior floor at all. Rows shorter
/// than the nominal width contribute whatever interior cells they have.
pub fn find_interior_seed(grid: &RoomGrid) -> Option<(usize, usize)> {
    let h = grid.height();
    if h < 3 {
        return None;
    }
    for r in 1..h - 1 {
        let len = grid.row_len(r);
        if len < 3 {
            continue;
        }
        for c in 1..len - 1 {
            if grid.get(r, c) == Some(FLOOR) {
                return Some((r, c));
            }
        }
    }
    None
}

/// 4-directional A* between the first `start_sym` and first `goal_sym` cell.
///
/// Step cost is uniform and wall cells are traversable, so the search finds
/// the cheapest wall-piercing route. The returned path keeps only the cells
/// currently equal to `wall_sym`: the walls that must be carved to realize
/// the route. Cells equal to `ignore_sym` are excluded from the neighbor set.
/// Missing start or goal symbol yields an empty path, which callers treat as
/// "nothing to repair".
pub fn grid_astar(
    grid: &RoomGrid,
    start_sym: char,
    goal_sym: char,
    wall_sym: char,
    ignore_sym: Option<char>,
) -> Vec<(usize, usize)> {
    let (Some(start), Some(goal)) = (grid.find(start_sym), grid.find(goal_sym)) else {
        return Vec::new();
    };

    let heuristic = |(r, c): (usize, usize)| goal.0.abs_diff(r) + goal.1.abs_diff(c);

    let mut open = BinaryHeap::new();
    open.push(Reverse((heuristic(start), start)));
    let mut came_from: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    let mut g_score: HashMap<(usize, usize), usize> = HashMap::new();
    g_score.insert(start, 0);

    while let Some(Reverse((_, current))) = open.pop() {
        if current == goal {
            let mut path = Vec::new();
            let mut node = current;
            while let Some(&prev) = came_from.get(&node) {
                node = prev;
                if grid.get(node.0, node.1) == Some(wall_sym) {
                    path.push(node);
                }
            }
            return path;
        }

        for (dr, dc) in [(0i32, 1i32), (1, 0), (0, -1), (-1, 0)] {
            let nr = current.0 as i32 + dr;
            let nc = current.1 as i32 + dc;
            if nr < 0 || nc < 0 {
                continue;
            }
            let neighbor = (nr as usize, nc as usize);
            let Some(cell) = grid.get(neighbor.0, neighbor.1) else {
                continue;
            };
            if ignore_sym == Some(cell) {
                continue;
            }

            let tentative = g_score[&current] + 1;
            if g_score.get(&neighbor).is_none_or(|&g| tentative < g) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                open.push(Reverse((tentative + heuristic(neighbor), neighbor)));
            }
        }
    }

    Vec::new()
}
