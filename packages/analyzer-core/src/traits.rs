//! Collaborator traits.
//!
//! These are infrastructure seams only: fetching tagged entities and
//! completing a prompt. Aggregation and layout stay in pure functions that
//! never touch them.

use async_trait::async_trait;

use crate::error::{CompletionError, FetchError};
use crate::types::{Coordinates, EntityBatch, Fetched, TagFilter};

/// Source of tagged geo-entities.
#[async_trait]
pub trait GeoSource: Send + Sync {
    /// Fetch entities matching `filter` within `radius_m` meters of `center`.
    ///
    /// Zero matches is [`Fetched::Empty`], not an error.
    async fn fetch(
        &self,
        center: Coordinates,
        filter: &TagFilter,
        radius_m: u32,
    ) -> Result<Fetched, FetchError>;

    /// Fetch every amenity inside the administrative area called `area`,
    /// one batch per amenity type.
    async fn fetch_area(&self, area: &str) -> Result<Vec<EntityBatch>, FetchError> {
        let _ = area;
        Err(FetchError::Unsupported("administrative area lookup"))
    }
}

/// Hosted chat-completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Submit a single user prompt and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
