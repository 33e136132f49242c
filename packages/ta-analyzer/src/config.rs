//! Configuration for the analyzer.
//!
//! Loaded in three layers, later ones winning:
//! - built-in defaults
//! - `ta-analyzer.toml` in the working directory (or `--config <path>`)
//! - environment variables, including those from a `.env` file
//!
//! Environment variables:
//! - `CHATBASE_API_KEY` - required for the analysis step
//! - `CHATBASE_CHATBOT_ID` - overrides `[chatbase] chatbot_id`
//! - `OVERPASS_URL` - overrides `[overpass] endpoint`
//! - `TA_RADIUS_M` - overrides `[search] radius_m`

use analyzer_core::{
    Helvetica, Margins, PageGeometry, Place, PlaceCatalog, TagFilter, DEFAULT_RADIUS_M, PT_PER_MM,
};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ta-analyzer.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub overpass: OverpassConfig,
    pub chatbase: ChatbaseConfig,
    pub report: ReportConfig,
    pub places: Vec<Place>,

    /// Only ever read from the environment.
    #[serde(skip)]
    pub chatbase_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search radius around the test area in meters
    pub radius_m: u32,
    /// Amenity types offered in the menu (`all`, `school`, `shop=bakery`, ...)
    pub amenity_types: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            amenity_types: ["all", "restaurant", "hospital", "school", "cafe", "bank"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: overpass_client::DEFAULT_ENDPOINT.to_string(),
            timeout_secs: overpass_client::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatbaseConfig {
    pub base_url: String,
    pub chatbot_id: Option<String>,
}

impl Default for ChatbaseConfig {
    fn default() -> Self {
        Self {
            base_url: chatbase_client::DEFAULT_BASE_URL.to_string(),
            chatbot_id: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory generated files are written to
    pub output_dir: PathBuf,
    /// Font size in points
    pub font_size: f32,
    /// Line advance as a multiple of the font size
    pub line_spacing: f32,
    /// Page margins in millimetres
    pub margin_mm: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            font_size: 12.0,
            line_spacing: 2.5,
            margin_mm: 15.0,
        }
    }
}

impl ReportConfig {
    /// A4 page with uniform margins and the configured line advance.
    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry::a4(
            Margins::uniform(self.margin_mm * PT_PER_MM),
            self.font_size * self.line_spacing,
        )
    }

    pub fn font(&self) -> Helvetica {
        Helvetica::new(self.font_size)
    }
}

impl Config {
    /// Load `.env`, the config file and environment overrides.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply environment overrides read through `get`.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = get("CHATBASE_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.chatbase_api_key = Some(key);
        }
        if let Some(id) = get("CHATBASE_CHATBOT_ID").filter(|v| !v.trim().is_empty()) {
            self.chatbase.chatbot_id = Some(id);
        }
        if let Some(url) = get("OVERPASS_URL").filter(|v| !v.trim().is_empty()) {
            self.overpass.endpoint = url;
        }
        if let Some(radius) = get("TA_RADIUS_M") {
            self.search.radius_m = radius
                .trim()
                .parse()
                .context("TA_RADIUS_M must be a whole number of meters")?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.radius_m == 0 {
            bail!("search radius must be greater than zero");
        }
        self.amenity_filters()?;
        self.report
            .page_geometry()
            .validate()
            .context("invalid report layout")?;
        for place in &self.places {
            if !place.location.is_valid() {
                bail!("place {:?} has invalid coordinates", place.name);
            }
        }
        Ok(())
    }

    /// Menu amenity types as validated filters.
    pub fn amenity_filters(&self) -> Result<Vec<TagFilter>> {
        self.search
            .amenity_types
            .iter()
            .map(|s| TagFilter::parse(s).with_context(|| format!("invalid amenity type {:?}", s)))
            .collect()
    }

    /// Built-in places plus those from the config file.
    pub fn catalog(&self) -> PlaceCatalog {
        let mut catalog = PlaceCatalog::builtin();
        catalog.extend(self.places.iter().cloned());
        catalog
    }
}
