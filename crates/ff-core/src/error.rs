//! Error types for floor synthesis.
//!
//! Content defects are not errors: malformed rooms are repaired or replaced
//! in the pipeline, and provider failures degrade to local fallbacks. The
//! types here cover the two things that are allowed to be loud: requests
//! that violate the engine contract, and the reasons a provider call failed.

use thiserror::Error;

use crate::consts::MAX_ROOMS;

/// Contract violations that fail a synthesis request fast
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FloorError {
    #[error("room count must be between 1 and {MAX_ROOMS}, got {count}")]
    BadRoomCount { count: usize },

    #[error("candidate list '{which}' is empty")]
    EmptyCandidates { which: String },

    #[error("adjacency matrix is {rows}x{cols}, expected {expected}x{expected}")]
    AdjacencyShape {
        rows: usize,
        cols: usize,
        expected: usize,
    },
}

/// Reasons a content provider call failed
///
/// Every variant degrades to a local fallback in the pipeline; none of them
/// abort a synthesis run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider did not answer within the request budget")]
    Timeout,

    #[error("provider rejected the credentials")]
    BadCredentials,

    #[error("provider rate limit reached")]
    RateLimited,

    #[error("provider response was malformed: {detail}")]
    MalformedResponse { detail: String },

    #[error("provider unavailable: {detail}")]
    Unavailable { detail: String },
}
