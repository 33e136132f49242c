//! Amenity aggregation and document layout for the TA Analyzer.
//!
//! Two independent pieces:
//!
//! * **Aggregation**: folds [`EntityBatch`]es fetched from a geo-data source
//!   into a [`CategoryCount`] and turns it into an assessment prompt.
//! * **Layout**: wraps arbitrary text into fixed-width lines and pages for a
//!   fixed-layout document.
//!
//! Network access lives behind the [`GeoSource`] and [`CompletionService`]
//! traits; everything else here is pure.
//!
//! # Example
//!
//! ```rust,ignore
//! use analyzer_core::{build_prompt, count_entities, render, Helvetica, PageGeometry};
//!
//! let counts = count_entities(session.batches());
//! let answer = chat.complete(&build_prompt(&counts)).await?;
//!
//! let pages = render(&answer, &PageGeometry::a4(margins, 30.0), &Helvetica::new(12.0))?;
//! ```

pub mod aggregate;
pub mod error;
pub mod layout;
pub mod markers;
pub mod places;
pub mod prompt;
pub mod session;
pub mod testing;
pub mod traits;
pub mod types;

pub use aggregate::{count_entities, summarize, CategoryCount, SummaryPlan};
pub use error::{CompletionError, FetchError, LayoutError, TagFilterError};
pub use layout::{
    encode_win_ansi, printed_byte, render, win_ansi_byte, wrap_line, wrap_text, FontMetrics,
    Helvetica, Line, Margins, Monospace, Page, PageGeometry, PT_PER_MM,
};
pub use markers::{map_center, markers, markers_to_geojson, Marker};
pub use places::{Place, PlaceCatalog, DEFAULT_COORDINATES, DEFAULT_VILLAGE};
pub use prompt::{build_prompt, build_prompt_for, summary_lines};
pub use session::{Session, DEFAULT_RADIUS_M};
pub use traits::{CompletionService, GeoSource};
pub use types::{
    Coordinates, EntityBatch, Fetched, GeoEntity, TagFilter, DEFAULT_TAG_KEY, RESERVED_ALL_LABEL,
};
