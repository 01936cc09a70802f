//! Story generation for floor transitions.

use crate::error::ProviderError;
use crate::provider::{ContentProvider, StoryRequest};

/// Generate the story beat bridging one floor to the next.
///
/// A single provider call, bounded by the provider's own transport
/// timeout. Never fails: errors are mapped to a short placeholder line
/// so the floor still ships with some narration attached.
pub fn generate_story(request: &StoryRequest, provider: &dyn ContentProvider) -> String {
    match provider.narrate(request) {
        Ok(story) => story,
        Err(err) => {
            log::warn!("story generation degraded: {err}");
            degraded_line(&err).to_string()
        }
    }
}

fn degraded_line(err: &ProviderError) -> &'static str {
    match err {
        ProviderError::BadCredentials => "Invalid API Key",
        ProviderError::RateLimited => "Rate limit reached",
        _ => "An error occurred while generating the story. Please try again.",
    }
}
