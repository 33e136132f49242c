//! Core data model.

pub mod entity;
pub mod filter;

pub use entity::{Coordinates, EntityBatch, Fetched, GeoEntity};
pub use filter::{TagFilter, DEFAULT_TAG_KEY, RESERVED_ALL_LABEL};
