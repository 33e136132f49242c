//! Overpass QL query builders.

use analyzer_core::{Coordinates, TagFilter};

/// Server-side timeout in seconds written into each query.
pub const QUERY_TIMEOUT_SECS: u32 = 25;

const ELEMENT_TYPES: [&str; 3] = ["node", "way", "relation"];

/// Quote a string for use inside an Overpass QL `"..."` literal.
pub fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Tag selector for a filter: `["amenity"]` or `["amenity"="school"]`.
pub fn tag_selector(filter: &TagFilter) -> String {
    match filter {
        TagFilter::AllAmenities => format!("[{}]", quote(filter.key())),
        TagFilter::SingleTag { key, value } => format!("[{}={}]", quote(key), quote(value)),
    }
}

fn union(selector: &str, scope: &str) -> String {
    ELEMENT_TYPES
        .iter()
        .map(|kind| format!("  {}{}{};\n", kind, selector, scope))
        .collect()
}

/// Every element matching `filter` within `radius_m` of `center`.
///
/// `out center tags` gives ways and relations a centre point so every
/// element comes back with a usable position.
pub fn around_query(center: Coordinates, filter: &TagFilter, radius_m: u32) -> String {
    let scope = format!("(around:{},{},{})", radius_m, center.lat, center.lon);
    format!(
        "[out:json][timeout:{}];\n(\n{});\nout center tags;",
        QUERY_TIMEOUT_SECS,
        union(&tag_selector(filter), &scope)
    )
}

/// Every amenity inside the administrative boundary named `area`.
pub fn area_query(area: &str) -> String {
    let selector = tag_selector(&TagFilter::AllAmenities);
    format!(
        "[out:json][timeout:{}];\narea[\"name\"={}][\"boundary\"=\"administrative\"]->.searchArea;\n(\n{});\nout center tags;",
        QUERY_TIMEOUT_SECS,
        quote(area),
        union(&selector, "(area.searchArea)")
    )
}
