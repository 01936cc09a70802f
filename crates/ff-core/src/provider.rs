//! The content provider seam.
//!
//! A [`ContentProvider`] is the engine's view of an external generator:
//! something that can propose rooms and layouts, pick tile palettes, and
//! invent enemies, weapons, and narration. The pipeline treats every call
//! as unreliable: calls run on worker threads, answers past the deadline
//! are dropped, and anything missing or broken degrades to locally
//! generated content.
//!
//! [`LocalProvider`] is that local fallback promoted to a full provider,
//! so the whole engine can run without any external service.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::ProviderError;
use crate::floor::FloorLayout;
use crate::grid::RoomGrid;
use crate::rng::FloorRng;
use crate::room::pick_default;
use crate::spawn::{roll_stat, Enemy, Weapon, WeaponKind};

/// Inputs for a tile palette choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRequest {
    /// Theme the palette should match, e.g. "catacombs"
    pub area: String,
    pub floor_candidates: Vec<String>,
    pub wall_candidates: Vec<String>,
}

/// One floor tile and one wall tile drawn from a [`TileRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileChoice {
    pub floor: String,
    pub wall: String,
}

/// Inputs for a story beat bridging the previous floor to the next
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRequest {
    pub prev_area: String,
    pub next_area: String,
    /// Story text the previous floor was delivered with, for continuity
    pub prev_story: String,
}

/// An external source of generated content.
///
/// Implementations are shared across worker threads, so every call takes
/// `&self` and must be safe to issue concurrently. A provider backed by a
/// remote service should bound each call with its own transport timeout;
/// the pipeline additionally enforces a deadline on the whole batch and
/// discards late answers.
pub trait ContentProvider: Send + Sync {
    /// Propose one room grid. The result may be malformed in any way;
    /// the caller validates and repairs it.
    fn propose_room(&self) -> Result<RoomGrid, ProviderError>;

    /// Propose a floor layout for `room_count` rooms. The result may be
    /// malformed; the caller validates it and falls back to a local one.
    fn propose_layout(&self, room_count: usize) -> Result<FloorLayout, ProviderError>;

    /// Pick one floor tile and one wall tile from the given candidates.
    fn choose_tiles(&self, request: &TileRequest) -> Result<TileChoice, ProviderError>;

    /// Invent one enemy using one of the given sprites.
    fn invent_enemy(&self, sprites: &[String]) -> Result<Enemy, ProviderError>;

    /// Invent one weapon using one of the given sprites.
    fn invent_weapon(&self, sprites: &[String]) -> Result<Weapon, ProviderError>;

    /// Narrate the transition described by the request.
    fn narrate(&self, request: &StoryRequest) -> Result<String, ProviderError>;
}

/// Built-in provider that synthesizes everything locally.
///
/// Rooms come from the default library, layouts from the local placement
/// walk, and everything else from uniform rolls. Calls draw fresh entropy
/// each time, so there is no state to share or lock across threads. The
/// only way a call fails is an empty candidate list in the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProvider;

impl ContentProvider for LocalProvider {
    fn propose_room(&self) -> Result<RoomGrid, ProviderError> {
        Ok(pick_default(&mut FloorRng::from_entropy()))
    }

    fn propose_layout(&self, room_count: usize) -> Result<FloorLayout, ProviderError> {
        Ok(FloorLayout::generate(
            room_count,
            &mut FloorRng::from_entropy(),
        ))
    }

    fn choose_tiles(&self, request: &TileRequest) -> Result<TileChoice, ProviderError> {
        let mut rng = FloorRng::from_entropy();
        Ok(TileChoice {
            floor: pick_one(&request.floor_candidates, "floor tile", &mut rng)?,
            wall: pick_one(&request.wall_candidates, "wall tile", &mut rng)?,
        })
    }

    fn invent_enemy(&self, sprites: &[String]) -> Result<Enemy, ProviderError> {
        let mut rng = FloorRng::from_entropy();
        let sprite = pick_one(sprites, "sprite", &mut rng)?;
        Ok(Enemy {
            attack: roll_stat(&mut rng),
            health: roll_stat(&mut rng),
            sprite,
        })
    }

    fn invent_weapon(&self, sprites: &[String]) -> Result<Weapon, ProviderError> {
        let mut rng = FloorRng::from_entropy();
        let sprite = pick_one(sprites, "sprite", &mut rng)?;
        let kinds: Vec<WeaponKind> = WeaponKind::iter().collect();
        Ok(Weapon {
            attack: roll_stat(&mut rng),
            kind: rng.choose(&kinds).copied().unwrap_or(WeaponKind::Melee),
            sprite,
        })
    }

    fn narrate(&self, request: &StoryRequest) -> Result<String, ProviderError> {
        Ok(format!(
            "The {} falls silent behind you. Ahead, the {} waits.",
            request.prev_area, request.next_area
        ))
    }
}

fn pick_one(
    items: &[String],
    which: &str,
    rng: &mut FloorRng,
) -> Result<String, ProviderError> {
    rng.choose(items)
        .cloned()
        .ok_or_else(|| ProviderError::Unavailable {
            detail: format!("no {which} candidates"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{validate, Verdict};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_local_room_is_valid() {
        let mut room = LocalProvider.propose_room().unwrap();
        assert_eq!(validate(&mut room), Verdict::Valid);
    }

    #[test]
    fn test_local_layout_validates() {
        let layout = LocalProvider.propose_layout(5).unwrap();
        assert!(layout.validate(5));
    }

    #[test]
    fn test_local_tiles_come_from_candidates() {
        let request = TileRequest {
            area: "catacombs".to_string(),
            floor_candidates: strings(&["mud", "slate"]),
            wall_candidates: strings(&["brick"]),
        };
        let choice = LocalProvider.choose_tiles(&request).unwrap();
        assert!(request.floor_candidates.contains(&choice.floor));
        assert_eq!(choice.wall, "brick");
    }

    #[test]
    fn test_local_tiles_reject_empty_candidates() {
        let request = TileRequest {
            area: "catacombs".to_string(),
            floor_candidates: Vec::new(),
            wall_candidates: strings(&["brick"]),
        };
        assert!(LocalProvider.choose_tiles(&request).is_err());
    }

    #[test]
    fn test_local_enemy_stats_in_range() {
        let sprites = strings(&["bat", "rat"]);
        for _ in 0..50 {
            let enemy = LocalProvider.invent_enemy(&sprites).unwrap();
            assert!((1..=10).contains(&enemy.attack));
            assert!((1..=10).contains(&enemy.health));
            assert!(sprites.contains(&enemy.sprite));
        }
    }

    #[test]
    fn test_local_weapon_sprite_from_list() {
        let sprites = strings(&["sword"]);
        let weapon = LocalProvider.invent_weapon(&sprites).unwrap();
        assert_eq!(weapon.sprite, "sword");
        assert!((1..=10).contains(&weapon.attack));
    }

    #[test]
    fn test_local_story_mentions_areas() {
        let request = StoryRequest {
            prev_area: "crypt".to_string(),
            next_area: "sewers".to_string(),
            prev_story: String::new(),
        };
        let story = LocalProvider.narrate(&request).unwrap();
        assert!(story.contains("crypt"));
        assert!(story.contains("sewers"));
    }
}
