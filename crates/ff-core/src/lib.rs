//! ff-core: Floor synthesis engine for dungeon crawlers
//!
//! This crate turns one request into one complete, playable floor: a set
//! of fixed-size rooms, a coarse layout placing them, the adjacency
//! between neighbors, and the doors that adjacency mandates. Content can
//! come from any [`provider::ContentProvider`]; everything a provider
//! returns is validated, repaired, or replaced, so the output contract
//! holds even when the provider is slow, wrong, or absent.
//!
//! No I/O beyond the provider seam. Serialization is plain data, ready
//! for `serde_json`.

pub mod consts;
pub mod error;
pub mod floor;
pub mod grid;
pub mod pipeline;
pub mod provider;
pub mod rng;
pub mod room;
pub mod spawn;
pub mod story;

pub use error::{FloorError, ProviderError};
pub use pipeline::{synthesize_floor, FloorPlan, FloorRequest};
pub use provider::{ContentProvider, LocalProvider};
