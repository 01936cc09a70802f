//! Floor model: layout, adjacency, and door enforcement.

mod adjacency;
mod doors;
mod layout;

pub use adjacency::AdjacencyMatrix;
pub use doors::enforce_doors;
pub use layout::FloorLayout;
