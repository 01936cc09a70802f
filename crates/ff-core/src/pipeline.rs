//! The floor synthesis pipeline.
//!
//! One request fans out into R room proposals, one layout proposal, and
//! one tile choice, all running concurrently against the content provider.
//! Everything that comes back is treated as hostile: rooms are validated
//! and repaired, the layout is checked and regenerated if broken, tiles
//! are checked against the candidate lists. Missing or late answers fall
//! back to local generation, so the pipeline always produces a complete
//! floor plan once the request itself is well formed.

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TIMEOUT, MAX_ROOMS};
use crate::error::{FloorError, ProviderError};
use crate::floor::{enforce_doors, AdjacencyMatrix, FloorLayout};
use crate::grid::RoomGrid;
use crate::provider::{ContentProvider, TileChoice, TileRequest};
use crate::rng::FloorRng;
use crate::room::{pick_default, repair_until_stable, Verdict};

/// A request for one complete floor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorRequest {
    /// Number of rooms, 1 through [`MAX_ROOMS`]
    pub room_count: usize,
    /// Theme passed through to the provider, e.g. "catacombs"
    pub area: String,
    /// Floor tile candidates, must be non-empty
    pub floor_tiles: Vec<String>,
    /// Wall tile candidates, must be non-empty
    pub wall_tiles: Vec<String>,
    /// Seed for the local generation steps, fresh entropy when None
    pub seed: Option<u64>,
    /// Deadline for the whole provider batch
    pub timeout: Duration,
}

impl FloorRequest {
    pub fn new(
        room_count: usize,
        area: &str,
        floor_tiles: Vec<String>,
        wall_tiles: Vec<String>,
    ) -> Self {
        Self {
            room_count,
            area: area.to_string(),
            floor_tiles,
            wall_tiles,
            seed: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn check(&self) -> Result<(), FloorError> {
        if self.room_count == 0 || self.room_count > MAX_ROOMS {
            return Err(FloorError::BadRoomCount {
                count: self.room_count,
            });
        }
        if self.floor_tiles.is_empty() {
            return Err(FloorError::EmptyCandidates {
                which: "floor tile".to_string(),
            });
        }
        if self.wall_tiles.is_empty() {
            return Err(FloorError::EmptyCandidates {
                which: "wall tile".to_string(),
            });
        }
        Ok(())
    }
}

/// A finished floor, ready to serialize
///
/// `rooms[i]` is the grid for room identifier i + 1, written to the wire
/// as `"room1"` through `"roomR"` in identifier order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlan {
    #[serde(
        serialize_with = "rooms_to_named_map",
        deserialize_with = "rooms_from_named_map"
    )]
    pub rooms: Vec<RoomGrid>,
    #[serde(rename = "floorMap")]
    pub floor_map: FloorLayout,
    #[serde(rename = "adjacencyMatrix")]
    pub adjacency: AdjacencyMatrix,
    /// Chosen floor tile; the save format keeps the plural key
    #[serde(rename = "floorTiles")]
    pub floor_tile: String,
    /// Chosen wall tile; the save format keeps the plural key
    #[serde(rename = "wallTiles")]
    pub wall_tile: String,
}

/// One answer from the fan-out batch
enum TaskAnswer {
    Room(usize, Result<RoomGrid, ProviderError>),
    Layout(Result<FloorLayout, ProviderError>),
    Tiles(Result<TileChoice, ProviderError>),
}

/// Synthesize one floor.
///
/// Fails only on a malformed request. Provider trouble of any kind,
/// including a worker that panics and never reports, degrades to local
/// generation for the affected piece.
pub fn synthesize_floor(
    request: &FloorRequest,
    provider: Arc<dyn ContentProvider>,
) -> Result<FloorPlan, FloorError> {
    request.check()?;

    let mut rng = request
        .seed
        .map(FloorRng::new)
        .unwrap_or_else(FloorRng::from_entropy);
    log::info!(
        "synthesizing {} rooms for '{}' with seed {}",
        request.room_count,
        request.area,
        rng.seed()
    );

    // Fallback tiles are picked before the fan-out so the degraded palette
    // does not depend on how many provider answers arrive.
    let fallback_tiles = TileChoice {
        floor: rng.choose(&request.floor_tiles).cloned().unwrap_or_default(),
        wall: rng.choose(&request.wall_tiles).cloned().unwrap_or_default(),
    };

    let (tx, rx) = mpsc::channel();
    for slot in 0..request.room_count {
        let provider = Arc::clone(&provider);
        let tx = tx.clone();
        thread::spawn(move || {
            let _ = tx.send(TaskAnswer::Room(slot, provider.propose_room()));
        });
    }
    {
        let provider = Arc::clone(&provider);
        let tx = tx.clone();
        let room_count = request.room_count;
        thread::spawn(move || {
            let _ = tx.send(TaskAnswer::Layout(provider.propose_layout(room_count)));
        });
    }
    {
        let provider = Arc::clone(&provider);
        let tx = tx.clone();
        let tile_request = TileRequest {
            area: request.area.clone(),
            floor_candidates: request.floor_tiles.clone(),
            wall_candidates: request.wall_tiles.clone(),
        };
        thread::spawn(move || {
            let _ = tx.send(TaskAnswer::Tiles(provider.choose_tiles(&tile_request)));
        });
    }
    drop(tx);

    let mut proposed_rooms: Vec<Option<RoomGrid>> = Vec::new();
    proposed_rooms.resize_with(request.room_count, || None);
    let mut proposed_layout: Option<FloorLayout> = None;
    let mut chosen_tiles: Option<TileChoice> = None;

    let deadline = Instant::now() + request.timeout;
    let mut outstanding = request.room_count + 2;
    while outstanding > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(answer) => {
                outstanding -= 1;
                match answer {
                    TaskAnswer::Room(slot, Ok(room)) => {
                        if let Some(entry) = proposed_rooms.get_mut(slot) {
                            *entry = Some(room);
                        }
                    }
                    TaskAnswer::Room(slot, Err(err)) => {
                        log::warn!("room {} failed, substituting a default: {err}", slot + 1);
                    }
                    TaskAnswer::Layout(Ok(layout)) => proposed_layout = Some(layout),
                    TaskAnswer::Layout(Err(err)) => {
                        log::warn!("layout failed, generating locally: {err}");
                    }
                    TaskAnswer::Tiles(Ok(tiles)) => chosen_tiles = Some(tiles),
                    TaskAnswer::Tiles(Err(err)) => {
                        log::warn!("tile choice failed, keeping the local pick: {err}");
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                log::warn!("provider deadline passed with {outstanding} tasks outstanding");
                break;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    // Sequential phase: normalize every proposal on the request thread.
    let mut rooms = Vec::with_capacity(request.room_count);
    for (slot, proposal) in proposed_rooms.into_iter().enumerate() {
        let room = match proposal {
            Some(mut room) => match repair_until_stable(&mut room) {
                Verdict::Valid | Verdict::Defer => room,
                Verdict::Repair(defect) | Verdict::Discard(defect) => {
                    log::warn!(
                        "room {} unrepairable ({defect}), substituting a default",
                        slot + 1
                    );
                    pick_default(&mut rng)
                }
            },
            None => pick_default(&mut rng),
        };
        rooms.push(room);
    }

    let floor_map = match proposed_layout {
        Some(layout) if layout.validate(request.room_count) => layout,
        Some(_) => {
            log::warn!("provider layout rejected, generating locally");
            FloorLayout::generate(request.room_count, &mut rng)
        }
        None => FloorLayout::generate(request.room_count, &mut rng),
    };

    let adjacency = AdjacencyMatrix::derive(&floor_map, request.room_count);
    for (index, room) in rooms.iter_mut().enumerate() {
        enforce_doors(room, adjacency.door_mask(index));
    }

    let tiles = match chosen_tiles {
        Some(choice)
            if request.floor_tiles.contains(&choice.floor)
                && request.wall_tiles.contains(&choice.wall) =>
        {
            choice
        }
        Some(choice) => {
            log::warn!(
                "provider tiles '{}'/'{}' are not candidates, keeping the local pick",
                choice.floor,
                choice.wall
            );
            fallback_tiles
        }
        None => fallback_tiles,
    };

    Ok(FloorPlan {
        rooms,
        floor_map,
        adjacency,
        floor_tile: tiles.floor,
        wall_tile: tiles.wall,
    })
}

fn rooms_to_named_map<S>(rooms: &[RoomGrid], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(rooms.len()))?;
    for (index, room) in rooms.iter().enumerate() {
        map.serialize_entry(&format!("room{}", index + 1), room)?;
    }
    map.end()
}

fn rooms_from_named_map<'de, D>(deserializer: D) -> Result<Vec<RoomGrid>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let named = HashMap::<String, RoomGrid>::deserialize(deserializer)?;
    let mut rooms = Vec::with_capacity(named.len());
    for index in 1..=named.len() {
        let key = format!("room{index}");
        match named.get(&key) {
            Some(room) => rooms.push(room.clone()),
            None => return Err(D::Error::custom(format!("missing room entry '{key}'"))),
        }
    }
    Ok(rooms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FLOOR, ROOM_H, ROOM_W, WALL};
    use crate::grid::{find_interior_seed, flood_fill};
    use crate::provider::{LocalProvider, StoryRequest};
    use crate::room::{default_rooms, Dir};
    use crate::spawn::{Enemy, Weapon};
    use strum::IntoEnumIterator;

    /// Provider returning fixed answers, for deterministic pipeline tests
    struct ScriptedProvider {
        room: Option<RoomGrid>,
        layout: Option<FloorLayout>,
    }

    impl ContentProvider for ScriptedProvider {
        fn propose_room(&self) -> Result<RoomGrid, ProviderError> {
            self.room.clone().ok_or(ProviderError::Timeout)
        }
        fn propose_layout(&self, _room_count: usize) -> Result<FloorLayout, ProviderError> {
            self.layout.clone().ok_or(ProviderError::Timeout)
        }
        fn choose_tiles(&self, _request: &TileRequest) -> Result<TileChoice, ProviderError> {
            Err(ProviderError::Timeout)
        }
        fn invent_enemy(&self, _sprites: &[String]) -> Result<Enemy, ProviderError> {
            Err(ProviderError::Timeout)
        }
        fn invent_weapon(&self, _sprites: &[String]) -> Result<Weapon, ProviderError> {
            Err(ProviderError::Timeout)
        }
        fn narrate(&self, _request: &StoryRequest) -> Result<String, ProviderError> {
            Err(ProviderError::Timeout)
        }
    }

    fn request(room_count: usize) -> FloorRequest {
        let mut request = FloorRequest::new(
            room_count,
            "catacombs",
            vec!["mud".to_string(), "slate".to_string()],
            vec!["brick".to_string()],
        );
        request.seed = Some(42);
        request
    }

    fn assert_plan_contract(plan: &FloorPlan, room_count: usize) {
        assert_eq!(plan.rooms.len(), room_count);
        assert!(plan.floor_map.validate(room_count));
        assert_eq!(plan.adjacency, AdjacencyMatrix::derive(&plan.floor_map, room_count));

        for (index, room) in plan.rooms.iter().enumerate() {
            assert_eq!(room.height(), ROOM_H, "room {} height", index + 1);
            for row in 0..ROOM_H {
                assert_eq!(room.row_len(row), ROOM_W, "room {} row {row}", index + 1);
            }

            let mask = plan.adjacency.door_mask(index);
            for dir in Dir::iter() {
                let (row, col) = dir.door_cell();
                if mask.has(dir) {
                    assert_eq!(room.get(row, col), Some(FLOOR), "room {} {dir} door", index + 1);
                }
            }

            // Every mandated door must be reachable from the interior
            if let Some(seed) = find_interior_seed(room) {
                let mut probe = room.clone();
                flood_fill(&mut probe, seed, FLOOR, '#');
                for dir in Dir::iter() {
                    if mask.has(dir) {
                        let (row, col) = dir.door_cell();
                        assert_eq!(probe.get(row, col), Some('#'), "room {} {dir}", index + 1);
                    }
                }
            }

            // Non-door border cells stay walls
            let mut border: Vec<(usize, usize)> = Vec::new();
            border.extend((0..ROOM_W).flat_map(|col| [(0, col), (ROOM_H - 1, col)]));
            border.extend((0..ROOM_H).flat_map(|row| [(row, 0), (row, ROOM_W - 1)]));
            for (row, col) in border {
                let is_door = Dir::iter().any(|d| mask.has(d) && d.door_cell() == (row, col));
                if !is_door {
                    assert_eq!(room.get(row, col), Some(WALL));
                }
            }
        }

        assert!(!plan.floor_tile.is_empty());
        assert!(!plan.wall_tile.is_empty());
    }

    #[test]
    fn test_rejects_bad_room_counts() {
        for count in [0, MAX_ROOMS + 1] {
            let err = synthesize_floor(&request(count), Arc::new(LocalProvider)).unwrap_err();
            assert!(matches!(err, FloorError::BadRoomCount { .. }));
        }
    }

    #[test]
    fn test_rejects_empty_tile_candidates() {
        let mut bad = request(3);
        bad.floor_tiles.clear();
        let err = synthesize_floor(&bad, Arc::new(LocalProvider)).unwrap_err();
        assert!(matches!(err, FloorError::EmptyCandidates { .. }));
    }

    #[test]
    fn test_local_provider_plan_satisfies_contract() {
        let plan = synthesize_floor(&request(8), Arc::new(LocalProvider)).unwrap();
        assert_plan_contract(&plan, 8);
        assert!(plan.floor_tile == "mud" || plan.floor_tile == "slate");
        assert_eq!(plan.wall_tile, "brick");
    }

    #[test]
    fn test_single_room_floor() {
        let plan = synthesize_floor(&request(1), Arc::new(LocalProvider)).unwrap();
        assert_plan_contract(&plan, 1);
        assert_eq!(plan.floor_map.side(), 1);
    }

    #[test]
    fn test_seeded_runs_reproduce_under_failing_provider() {
        let failing = || {
            Arc::new(ScriptedProvider {
                room: None,
                layout: None,
            })
        };
        let first = synthesize_floor(&request(6), failing()).unwrap();
        let second = synthesize_floor(&request(6), failing()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_valid_provider_layout_is_kept() {
        let layout = FloorLayout::from_rows(vec![vec![1, 2]]);
        let provider = ScriptedProvider {
            room: None,
            layout: Some(layout.clone()),
        };
        let plan = synthesize_floor(&request(2), Arc::new(provider)).unwrap();
        assert_eq!(plan.floor_map, layout);
        assert_eq!(plan.adjacency.get(0, 1), Some(Dir::East));
    }

    #[test]
    fn test_broken_provider_layout_is_regenerated() {
        let provider = ScriptedProvider {
            room: None,
            layout: Some(FloorLayout::from_rows(vec![vec![1, 1]])),
        };
        let plan = synthesize_floor(&request(2), Arc::new(provider)).unwrap();
        assert!(plan.floor_map.validate(2));
    }

    #[test]
    fn test_garbage_room_replaced_by_default() {
        let provider = ScriptedProvider {
            room: Some(RoomGrid::from_lines(&["wxw", "w.w"])),
            layout: None,
        };
        let plan = synthesize_floor(&request(1), Arc::new(provider)).unwrap();
        // Single-room floor mandates no doors, so the default is untouched
        assert!(default_rooms().contains(&plan.rooms[0]));
    }

    #[test]
    fn test_wire_format_round_trip_and_key_order() {
        let plan = synthesize_floor(&request(12), Arc::new(LocalProvider)).unwrap();
        let json = serde_json::to_string_pretty(&plan).unwrap();

        let mut last = 0;
        for index in 1..=12 {
            let key = format!("\"room{index}\"");
            let at = json.find(&key).unwrap_or_else(|| panic!("{key} missing"));
            assert!(at > last || index == 1, "{key} out of order");
            last = at;
        }
        for key in ["\"floorMap\"", "\"adjacencyMatrix\"", "\"floorTiles\"", "\"wallTiles\""] {
            assert!(json.contains(key), "{key} missing");
        }

        let back: FloorPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
