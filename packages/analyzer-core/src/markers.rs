//! Map markers for fetched entities.
//!
//! The map surface itself is external; markers are exported as a GeoJSON
//! `FeatureCollection` that any map viewer can display.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{Coordinates, EntityBatch};

/// Fill and stroke colour for amenity markers.
pub const MARKER_COLOR: &str = "#f16948";

/// Marker radius in pixels.
pub const MARKER_RADIUS: u32 = 5;

/// One point on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinates,
    pub category: String,
    pub popup: String,
}

/// Markers for every entity with a position, grouped by category in
/// first-occurrence order.
pub fn markers<'a, I>(batches: I) -> Vec<Marker>
where
    I: IntoIterator<Item = &'a EntityBatch>,
{
    let mut groups: IndexMap<String, Vec<Marker>> = IndexMap::new();

    for batch in batches {
        for entity in &batch.entities {
            let Some(position) = entity.position else {
                continue;
            };
            let category = entity.category.as_deref().unwrap_or_else(|| batch.key());
            let popup = format!("{}: {}", category, entity.name.as_deref().unwrap_or("N/A"));
            groups
                .entry(category.to_string())
                .or_default()
                .push(Marker {
                    position,
                    category: category.to_string(),
                    popup,
                });
        }
    }

    groups.into_values().flatten().collect()
}

/// Where to center the map: the first marker, else `fallback`.
pub fn map_center(markers: &[Marker], fallback: Coordinates) -> Coordinates {
    markers.first().map(|m| m.position).unwrap_or(fallback)
}

/// GeoJSON `FeatureCollection` of `Point` features.
pub fn markers_to_geojson(markers: &[Marker]) -> Value {
    let features: Vec<Value> = markers
        .iter()
        .map(|m| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [m.position.lon, m.position.lat],
                },
                "properties": {
                    "category": m.category,
                    "popup": m.popup,
                    "marker-color": MARKER_COLOR,
                    "radius": MARKER_RADIUS,
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeoEntity, TagFilter};

    fn at(lat: f64) -> Coordinates {
        Coordinates::new(lat, 10.9)
    }

    #[test]
    fn test_markers_skip_missing_geometry_and_group() {
        let batches = vec![EntityBatch::new(
            TagFilter::AllAmenities,
            vec![
                GeoEntity::new("cafe", at(1.0)).with_name("Bar Centrale"),
                GeoEntity::new("bank", at(2.0)),
                GeoEntity::new("cafe", at(3.0)),
                GeoEntity::new("bank", at(4.0)).without_position(),
            ],
        )];

        let markers = markers(&batches);
        let popups: Vec<_> = markers.iter().map(|m| m.popup.as_str()).collect();
        assert_eq!(popups, vec!["cafe: Bar Centrale", "cafe: N/A", "bank: N/A"]);
    }

    #[test]
    fn test_map_center() {
        let fallback = at(0.0);
        assert_eq!(map_center(&[], fallback), fallback);

        let batches = vec![EntityBatch::new(
            TagFilter::amenity("school").unwrap(),
            vec![GeoEntity::new("school", at(5.0))],
        )];
        assert_eq!(map_center(&markers(&batches), fallback), at(5.0));
    }

    #[test]
    fn test_geojson_uses_lon_lat_order() {
        let marker = Marker {
            position: Coordinates::new(46.37, 10.93),
            category: "school".into(),
            popup: "school: N/A".into(),
        };
        let geojson = markers_to_geojson(&[marker]);

        assert_eq!(geojson["type"], "FeatureCollection");
        let feature = &geojson["features"][0];
        assert_eq!(feature["geometry"]["coordinates"][0], 10.93);
        assert_eq!(feature["geometry"]["coordinates"][1], 46.37);
        assert_eq!(feature["properties"]["marker-color"], MARKER_COLOR);
    }
}
