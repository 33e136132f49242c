//! Geo-tagged entities and the batches they arrive in.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::filter::TagFilter;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// One fetched amenity/feature record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEntity {
    /// Tag value the entity was classified under (e.g. `"restaurant"`).
    pub category: Option<String>,

    /// Display label.
    pub name: Option<String>,

    /// `None` when the source had no usable geometry.
    pub position: Option<Coordinates>,
}

impl GeoEntity {
    pub fn new(category: impl Into<String>, position: Coordinates) -> Self {
        Self {
            category: Some(category.into()),
            name: None,
            position: Some(position),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Same entity without geometry.
    pub fn without_position(mut self) -> Self {
        self.position = None;
        self
    }

    /// Same entity without its own category; it will be grouped under the
    /// batch key.
    pub fn uncategorized(mut self) -> Self {
        self.category = None;
        self
    }
}

/// The entities returned by one fetch, tagged with the filter used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityBatch {
    pub filter: TagFilter,
    pub entities: Vec<GeoEntity>,
}

impl EntityBatch {
    pub fn new(filter: TagFilter, entities: Vec<GeoEntity>) -> Self {
        Self { filter, entities }
    }

    /// A batch for a fetch that matched nothing.
    pub fn empty(filter: TagFilter) -> Self {
        Self::new(filter, Vec::new())
    }

    /// Grouping key for entities that carry no category of their own.
    pub fn key(&self) -> &str {
        self.filter.label()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Outcome of a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Entities(EntityBatch),

    /// Nothing matched the filter; shown as a soft warning.
    Empty(TagFilter),
}

impl Fetched {
    /// Wrap a batch, turning an empty one into [`Fetched::Empty`].
    pub fn from_batch(batch: EntityBatch) -> Self {
        if batch.is_empty() {
            Self::Empty(batch.filter)
        } else {
            Self::Entities(batch)
        }
    }

    /// The batch to record in the session; empty for [`Fetched::Empty`].
    pub fn into_batch(self) -> EntityBatch {
        match self {
            Self::Entities(batch) => batch,
            Self::Empty(filter) => EntityBatch::empty(filter),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}
