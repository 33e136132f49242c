//! GeoJSON map export.

use analyzer_core::{map_center, markers_to_geojson, Session};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::sanitize;

/// `TA_Map_<place>.geojson`.
pub fn map_file_name(place: &str) -> String {
    format!("TA_Map_{}.geojson", sanitize(place))
}

/// Write the session's markers as GeoJSON into `dir`.
///
/// Returns the written path and the number of markers.
pub fn export_map(session: &Session, dir: &Path) -> Result<(PathBuf, usize)> {
    let markers = session.markers();
    let center = map_center(&markers, session.center());

    let mut geojson = markers_to_geojson(&markers);
    geojson["properties"] = serde_json::json!({
        "place": session.place().name,
        "center": [center.lon, center.lat],
        "radius_m": session.radius_m(),
    });

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(map_file_name(session.place().short_name()));
    let body = serde_json::to_string_pretty(&geojson)?;
    fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), markers = markers.len(), "Exported map");
    Ok((path, markers.len()))
}
