//! Enemy and weapon generation.
//!
//! Each spawn is requested from the content provider on its own worker
//! thread. Answers that miss the batch deadline or come back as errors
//! are replaced with a local uniform roll, so a request for N spawns
//! always yields exactly N.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::consts::{DEFAULT_TIMEOUT, STAT_MAX, STAT_MIN};
use crate::error::{FloorError, ProviderError};
use crate::provider::ContentProvider;
use crate::rng::FloorRng;

/// How a weapon delivers its attack
///
/// Serializes as its numeric id (0 through 3) to match the save format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[repr(u8)]
pub enum WeaponKind {
    Melee = 0,
    Line = 1,
    Aoe = 2,
    Sweep = 3,
}

impl Serialize for WeaponKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for WeaponKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            0 => Ok(WeaponKind::Melee),
            1 => Ok(WeaponKind::Line),
            2 => Ok(WeaponKind::Aoe),
            3 => Ok(WeaponKind::Sweep),
            other => Err(serde::de::Error::custom(format!(
                "unknown weapon kind {other}"
            ))),
        }
    }
}

/// One generated enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub attack: u8,
    pub health: u8,
    pub sprite: String,
}

/// One generated weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub attack: u8,
    #[serde(rename = "type")]
    pub kind: WeaponKind,
    pub sprite: String,
}

/// Wire shape for an enemy batch, `{"enemies": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyBatch {
    pub enemies: Vec<Enemy>,
}

/// Wire shape for a weapon batch, `{"weapons": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponBatch {
    pub weapons: Vec<Weapon>,
}

/// A request for a batch of spawns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub count: usize,
    /// Sprite names the provider may assign, must be non-empty
    pub sprites: Vec<String>,
    /// Deadline for the whole batch
    pub timeout: Duration,
}

impl SpawnRequest {
    pub fn new(count: usize, sprites: Vec<String>) -> Self {
        Self {
            count,
            sprites,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Generate `request.count` enemies, one provider call per enemy.
pub fn generate_enemies(
    request: &SpawnRequest,
    provider: Arc<dyn ContentProvider>,
) -> Result<EnemyBatch, FloorError> {
    check_sprites(&request.sprites)?;

    let (tx, rx) = mpsc::channel();
    for slot in 0..request.count {
        let provider = Arc::clone(&provider);
        let sprites = request.sprites.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            let _ = tx.send((slot, provider.invent_enemy(&sprites)));
        });
    }
    drop(tx);

    let slots = drain_slots(rx, request.count, request.timeout, "enemy");
    let mut rng = FloorRng::from_entropy();
    let enemies = slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| fallback_enemy(&request.sprites, &mut rng)))
        .collect();
    Ok(EnemyBatch { enemies })
}

/// Generate `request.count` weapons, one provider call per weapon.
pub fn generate_weapons(
    request: &SpawnRequest,
    provider: Arc<dyn ContentProvider>,
) -> Result<WeaponBatch, FloorError> {
    check_sprites(&request.sprites)?;

    let (tx, rx) = mpsc::channel();
    for slot in 0..request.count {
        let provider = Arc::clone(&provider);
        let sprites = request.sprites.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            let _ = tx.send((slot, provider.invent_weapon(&sprites)));
        });
    }
    drop(tx);

    let slots = drain_slots(rx, request.count, request.timeout, "weapon");
    let mut rng = FloorRng::from_entropy();
    let weapons = slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| fallback_weapon(&request.sprites, &mut rng)))
        .collect();
    Ok(WeaponBatch { weapons })
}

/// Uniform roll in the shared stat range.
pub(crate) fn roll_stat(rng: &mut FloorRng) -> u8 {
    rng.rn2((STAT_MAX - STAT_MIN) as u32 + 1) as u8 + STAT_MIN
}

fn check_sprites(sprites: &[String]) -> Result<(), FloorError> {
    if sprites.is_empty() {
        return Err(FloorError::EmptyCandidates {
            which: "sprite".to_string(),
        });
    }
    Ok(())
}

fn fallback_enemy(sprites: &[String], rng: &mut FloorRng) -> Enemy {
    Enemy {
        attack: roll_stat(rng),
        health: roll_stat(rng),
        sprite: rng.choose(sprites).cloned().unwrap_or_default(),
    }
}

fn fallback_weapon(sprites: &[String], rng: &mut FloorRng) -> Weapon {
    let kinds: Vec<WeaponKind> = WeaponKind::iter().collect();
    Weapon {
        attack: roll_stat(rng),
        kind: rng.choose(&kinds).copied().unwrap_or(WeaponKind::Melee),
        sprite: rng.choose(sprites).cloned().unwrap_or_default(),
    }
}

/// Collect per-slot answers until every slot is filled, the deadline
/// passes, or all workers are gone. Missing slots stay `None`.
fn drain_slots<T: Send + 'static>(
    rx: mpsc::Receiver<(usize, Result<T, ProviderError>)>,
    count: usize,
    timeout: Duration,
    what: &str,
) -> Vec<Option<T>> {
    let deadline = Instant::now() + timeout;
    let mut slots: Vec<Option<T>> = Vec::new();
    slots.resize_with(count, || None);

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((slot, Ok(item))) => {
                if let Some(entry) = slots.get_mut(slot) {
                    *entry = Some(item);
                }
            }
            Ok((slot, Err(err))) => {
                log::warn!("{what} task {slot} failed, rolling locally: {err}");
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let missing = slots.iter().filter(|slot| slot.is_none()).count();
                log::warn!("{what} batch hit its deadline with {missing} tasks outstanding");
                break;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    slots
}
