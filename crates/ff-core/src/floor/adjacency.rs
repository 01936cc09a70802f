//! The room-to-room adjacency matrix derived from a layout.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::FloorError;
use crate::room::{Dir, DoorMask};

use super::layout::FloorLayout;

/// Which rooms neighbor which, and from what side.
///
/// `get(a, b)` is the direction of room b as seen from room a (0-based
/// indices into the ordered room list). Symmetric by construction: if b is
/// north of a, then a is south of b. Derived once from the layout and
/// read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    cells: Vec<Vec<Option<Dir>>>,
}

impl AdjacencyMatrix {
    /// An empty matrix for `room_count` rooms
    pub fn empty(room_count: usize) -> Self {
        Self {
            cells: vec![vec![None; room_count]; room_count],
        }
    }

    /// Build a matrix from pre-existing rows, checking the shape
    pub fn from_rows(rows: Vec<Vec<Option<Dir>>>, room_count: usize) -> Result<Self, FloorError> {
        let cols = rows.first().map_or(room_count, |r| r.len());
        if rows.len() != room_count || rows.iter().any(|r| r.len() != room_count) {
            return Err(FloorError::AdjacencyShape {
                rows: rows.len(),
                cols,
                expected: room_count,
            });
        }
        Ok(Self { cells: rows })
    }

    /// Derive the matrix from a floor layout.
    ///
    /// Every non-zero cell is checked against its four orthogonal neighbors;
    /// each neighboring pair is recorded in both directions. Self-pairs and
    /// identifiers outside 1..=room_count are skipped, so a malformed layout
    /// degrades to missing adjacencies rather than junk entries.
    pub fn derive(layout: &FloorLayout, room_count: usize) -> Self {
        let mut matrix = Self::empty(room_count);

        for (r, c, id) in layout.occupied_cells() {
            for dir in Dir::iter() {
                let Some((nr, nc)) = step(r, c, dir) else {
                    continue;
                };
                let neighbor = layout.get(nr, nc).unwrap_or(0);
                if neighbor == 0 {
                    continue;
                }
                let a = id as usize;
                let b = neighbor as usize;
                if a == b || a > room_count || b > room_count {
                    continue;
                }
                matrix.cells[a - 1][b - 1] = Some(dir);
                matrix.cells[b - 1][a - 1] = Some(dir.opposite());
            }
        }

        matrix
    }

    /// Number of rooms the matrix covers
    pub fn room_count(&self) -> usize {
        self.cells.len()
    }

    /// Direction of room `b` as seen from room `a`, 0-based
    pub fn get(&self, a: usize, b: usize) -> Option<Dir> {
        self.cells.get(a).and_then(|row| row.get(b).copied()).flatten()
    }

    /// One room's full adjacency row, 0-based
    pub fn row(&self, room: usize) -> &[Option<Dir>] {
        &self.cells[room]
    }

    /// The mandated doors for one room: every direction present in its row
    pub fn door_mask(&self, room: usize) -> DoorMask {
        let mut mask = DoorMask::empty();
        if let Some(row) = self.cells.get(room) {
            for dir in row.iter().flatten() {
                mask |= DoorMask::from(*dir);
            }
        }
        mask
    }
}

fn step(r: usize, c: usize, dir: Dir) -> Option<(usize, usize)> {
    match dir {
        Dir::North => r.checked_sub(1).map(|nr| (nr, c)),
        Dir::South => Some((r + 1, c)),
        Dir::East => Some((r, c + 1)),
        Dir::West => c.checked_sub(1).map(|nc| (r, nc)),
    }
}

// The wire format writes each cell as "N"/"S"/"E"/"W" or "" for no neighbor.
impl Serialize for AdjacencyMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let rows: Vec<Vec<String>> = self
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or_else(String::new, |dir| dir.to_string()))
                    .collect()
            })
            .collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AdjacencyMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Vec<String>>::deserialize(deserializer)?;
        let cells = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        if cell.is_empty() {
                            Ok(None)
                        } else {
                            Dir::from_str(&cell).map(Some).map_err(|_| {
                                serde::de::Error::custom(format!(
                                    "unknown direction label '{cell}'"
                                ))
                            })
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells })
    }
}
