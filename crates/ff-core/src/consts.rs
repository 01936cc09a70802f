//! Core floor constants.
//!
//! Dimensions and symbols shared across the grid, room, and floor modules.

use std::time::Duration;

/// Room dimensions (rows x columns)
pub const ROOM_H: usize = 9;
pub const ROOM_W: usize = 13;

/// Room limits
pub const MAX_ROOMS: usize = 40;

/// Tile symbols
pub const WALL: char = 'w';
pub const FLOOR: char = '.';

/// Transient sentinels, never present in finished output
pub const REACHED: char = '$';
pub const MASKED: char = '*';

/// Stat ranges for generated denizens
pub const STAT_MIN: u8 = 1;
pub const STAT_MAX: u8 = 10;

/// Default per-request budget for the content provider
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
