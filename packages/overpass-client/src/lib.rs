//! OpenStreetMap Overpass API client.
//!
//! Fetches tagged entities around a point or inside a named administrative
//! area and returns them as analyzer [`EntityBatch`]es.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyzer_core::{Coordinates, TagFilter};
//! use overpass_client::OverpassClient;
//!
//! let client = OverpassClient::new()?;
//! let fetched = client
//!     .around(Coordinates::new(46.3732, 10.9279), &TagFilter::amenity("school")?, 1000)
//!     .await?;
//! ```

pub mod error;
pub mod query;
pub mod types;

pub use error::{OverpassError, Result};
pub use types::{Element, OverpassResponse};

use analyzer_core::{Coordinates, EntityBatch, FetchError, Fetched, GeoSource, TagFilter};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Public Overpass instance.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Client-side request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Overpass API client.
#[derive(Clone)]
pub struct OverpassClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl OverpassClient {
    /// Create a client for the public endpoint with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ta-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Use another Overpass instance.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a raw Overpass QL query.
    pub async fn run_query(&self, query: &str) -> Result<OverpassResponse> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.endpoint)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Overpass request failed");
                OverpassError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, "Overpass API error");
            return Err(OverpassError::Api {
                status: status.as_u16(),
                message: summarize_error_body(&message),
            });
        }

        let body = response.text().await?;
        let parsed = parse_response(&body)?;

        debug!(
            elements = parsed.elements.len(),
            duration_ms = start.elapsed().as_millis(),
            "Overpass query"
        );

        Ok(parsed)
    }

    /// Entities matching `filter` within `radius_m` of `center`.
    pub async fn around(
        &self,
        center: Coordinates,
        filter: &TagFilter,
        radius_m: u32,
    ) -> Result<Fetched> {
        let query = query::around_query(center, filter, radius_m);
        let response = self.run_query(&query).await?;
        Ok(Fetched::from_batch(response.into_batch(filter)))
    }

    /// Amenities inside the administrative area called `area`, one batch per
    /// amenity type.
    pub async fn area_amenities(&self, area: &str) -> Result<Vec<EntityBatch>> {
        let response = self.run_query(&query::area_query(area)).await?;
        Ok(response.into_amenity_batches())
    }
}

/// Decode a response body, surfacing server-side runtime errors.
pub fn parse_response(body: &str) -> Result<OverpassResponse> {
    let parsed: OverpassResponse =
        serde_json::from_str(body).map_err(|e| OverpassError::Parse(e.to_string()))?;

    if let Some(remark) = &parsed.remark {
        if parsed.elements.is_empty() && remark.contains("error") {
            return Err(OverpassError::Remark(remark.clone()));
        }
    }

    Ok(parsed)
}

/// Overpass error pages are HTML; keep the first non-markup line.
fn summarize_error_body(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('<'))
        .map(|l| l.to_string())
        .next()
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

#[async_trait]
impl GeoSource for OverpassClient {
    async fn fetch(
        &self,
        center: Coordinates,
        filter: &TagFilter,
        radius_m: u32,
    ) -> std::result::Result<Fetched, FetchError> {
        Ok(self.around(center, filter, radius_m).await?)
    }

    async fn fetch_area(&self, area: &str) -> std::result::Result<Vec<EntityBatch>, FetchError> {
        Ok(self.area_amenities(area).await?)
    }
}
