use analyzer_core::{Coordinates, EntityBatch, GeoEntity, TagFilter, DEFAULT_TAG_KEY};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// Top-level Overpass JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,

    /// Set by the server on runtime errors such as query timeouts.
    #[serde(default)]
    pub remark: Option<String>,
}

/// A node, way or relation.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Present for ways and relations with `out center`.
    pub center: Option<Center>,

    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl Element {
    /// Own coordinates for nodes, centre point otherwise.
    pub fn position(&self) -> Option<Coordinates> {
        match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => Some(Coordinates::new(lat, lon)),
            (_, _, Some(c)) => Some(Coordinates::new(c.lat, c.lon)),
            _ => None,
        }
    }

    /// Convert to an entity categorized by the `key` tag.
    pub fn to_entity(&self, key: &str) -> GeoEntity {
        GeoEntity {
            category: self.tags.get(key).cloned(),
            name: self.tags.get("name").cloned(),
            position: self.position(),
        }
    }
}

impl OverpassResponse {
    /// Entities for a filtered query. Untagged elements are skipped.
    pub fn into_batch(self, filter: &TagFilter) -> EntityBatch {
        let entities = self
            .elements
            .iter()
            .filter(|e| !e.tags.is_empty())
            .map(|e| e.to_entity(filter.key()))
            .collect();
        EntityBatch::new(filter.clone(), entities)
    }

    /// One batch per amenity type, in first-occurrence order.
    ///
    /// Amenity values that cannot be expressed as a tag filter (blank, or
    /// containing query syntax) are logged and left out.
    pub fn into_amenity_batches(self) -> Vec<EntityBatch> {
        let mut groups: IndexMap<String, Vec<GeoEntity>> = IndexMap::new();
        for element in &self.elements {
            if let Some(value) = element.tags.get(DEFAULT_TAG_KEY) {
                groups
                    .entry(value.clone())
                    .or_default()
                    .push(element.to_entity(DEFAULT_TAG_KEY));
            }
        }

        groups
            .into_iter()
            .filter_map(|(value, entities)| match TagFilter::amenity(value.as_str()) {
                Ok(filter) => Some(EntityBatch::new(filter, entities)),
                Err(e) => {
                    warn!(
                        value = %value,
                        entities = entities.len(),
                        error = %e,
                        "Dropping amenity group with an unusable tag value"
                    );
                    None
                }
            })
            .collect()
    }
}
