//! Amenity aggregation.
//!
//! Folds one or more [`EntityBatch`]es into a [`CategoryCount`]: one entry per
//! distinct category, in order of first occurrence.
//!
//! # Reserved "all" label
//!
//! A batch fetched with [`TagFilter::AllAmenities`] has the key `"all"`. When
//! the session holds such a batch, the merged per-type counts are not what the
//! user asked for; [`summarize`] reports this explicitly with
//! [`SummaryPlan::NeedsUnfiltered`] so the caller fetches a flat count of every
//! amenity in the radius instead.
//!
//! ```rust,ignore
//! match summarize(session.batches()) {
//!     SummaryPlan::Merged(counts) => build_prompt(&counts),
//!     SummaryPlan::NeedsUnfiltered { .. } => {
//!         let flat = source.fetch(center, &TagFilter::AllAmenities, radius).await?;
//!         build_prompt(&count_entities([&flat.into_batch()]))
//!     }
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{EntityBatch, RESERVED_ALL_LABEL};

/// Category label → occurrence count, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryCount(IndexMap<String, usize>);

impl CategoryCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` occurrences of `label`.
    pub fn add(&mut self, label: &str, n: usize) {
        if n == 0 {
            return;
        }
        match self.0.get_mut(label) {
            Some(count) => *count += n,
            None => {
                self.0.insert(label.to_string(), n);
            }
        }
    }

    /// Pointwise sum; labels new to `self` are appended in `other`'s order.
    pub fn merge(&mut self, other: &CategoryCount) {
        for (label, n) in other.iter() {
            self.add(label, n);
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.0.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(label, n)| (label.as_str(), *n))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_reserved(&self) -> bool {
        self.0.contains_key(RESERVED_ALL_LABEL)
    }

    /// Copy with the reserved "all" label removed, order preserved.
    pub fn without_reserved(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(label, _)| label.as_str() != RESERVED_ALL_LABEL)
                .map(|(label, n)| (label.clone(), *n))
                .collect(),
        )
    }
}

impl<'a> FromIterator<(&'a str, usize)> for CategoryCount {
    fn from_iter<I: IntoIterator<Item = (&'a str, usize)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (label, n) in iter {
            counts.add(label, n);
        }
        counts
    }
}

/// Count entities per category across all batches.
///
/// Entities without a category are grouped under their batch's key.
/// Entities without a position are skipped.
pub fn count_entities<'a, I>(batches: I) -> CategoryCount
where
    I: IntoIterator<Item = &'a EntityBatch>,
{
    let mut counts = CategoryCount::new();
    let mut skipped = 0usize;

    for batch in batches {
        for entity in &batch.entities {
            if entity.position.is_none() {
                skipped += 1;
                continue;
            }
            let label = entity.category.as_deref().unwrap_or_else(|| batch.key());
            counts.add(label, 1);
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped entities without geometry");
    }

    counts
}

/// Which granularity of data to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryPlan {
    /// Per-type counts merged across every batch.
    Merged(CategoryCount),

    /// An unfiltered batch is present: fetch a flat count of every amenity
    /// in the radius and summarize that. `partial` holds the merged counts
    /// with the reserved label removed.
    NeedsUnfiltered { partial: CategoryCount },
}

/// Decide how to summarize the accumulated batches.
pub fn summarize(batches: &[EntityBatch]) -> SummaryPlan {
    let counts = count_entities(batches);
    if batches.iter().any(|b| b.filter.is_unfiltered()) {
        SummaryPlan::NeedsUnfiltered {
            partial: counts.without_reserved(),
        }
    } else {
        SummaryPlan::Merged(counts)
    }
}
