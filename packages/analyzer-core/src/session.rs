//! Per-user session state.

use crate::aggregate::{count_entities, summarize, CategoryCount, SummaryPlan};
use crate::markers::{markers, Marker};
use crate::places::Place;
use crate::types::{Coordinates, EntityBatch};

/// Default search radius in meters.
pub const DEFAULT_RADIUS_M: u32 = 1000;

/// Accumulated fetch results for one interactive session.
///
/// Created when the session starts and cleared when the user changes place
/// or radius or resets; batches are only ever appended in between, so every
/// recorded batch describes the current place and radius.
#[derive(Debug, Clone)]
pub struct Session {
    place: Place,
    radius_m: u32,
    batches: Vec<EntityBatch>,
}

impl Session {
    pub fn new(place: Place, radius_m: u32) -> Self {
        Self {
            place,
            radius_m,
            batches: Vec::new(),
        }
    }

    pub fn place(&self) -> &Place {
        &self.place
    }

    pub fn center(&self) -> Coordinates {
        self.place.location
    }

    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    /// Change the search radius; batches fetched with another radius are
    /// dropped.
    pub fn set_radius(&mut self, radius_m: u32) {
        if radius_m != self.radius_m {
            self.batches.clear();
        }
        self.radius_m = radius_m;
    }

    /// Switch to another place; batches from the previous one are dropped.
    pub fn set_place(&mut self, place: Place) {
        if place != self.place {
            self.batches.clear();
        }
        self.place = place;
    }

    pub fn record(&mut self, batch: EntityBatch) {
        tracing::debug!(
            filter = %batch.filter,
            entities = batch.len(),
            total_batches = self.batches.len() + 1,
            "Recorded batch"
        );
        self.batches.push(batch);
    }

    pub fn batches(&self) -> &[EntityBatch] {
        &self.batches
    }

    /// Most recent batch fetched with [`TagFilter::AllAmenities`].
    ///
    /// [`TagFilter::AllAmenities`]: crate::TagFilter::AllAmenities
    pub fn unfiltered_batch(&self) -> Option<&EntityBatch> {
        self.batches.iter().rev().find(|b| b.filter.is_unfiltered())
    }

    pub fn has_data(&self) -> bool {
        !self.batches.is_empty()
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }

    pub fn counts(&self) -> CategoryCount {
        count_entities(&self.batches)
    }

    pub fn summary(&self) -> SummaryPlan {
        summarize(&self.batches)
    }

    pub fn markers(&self) -> Vec<Marker> {
        markers(&self.batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeoEntity, TagFilter};

    fn caldes() -> Place {
        Place::new("Caldes", 46.3732, 10.9279)
    }

    #[test]
    fn test_record_accumulates() {
        let mut session = Session::new(caldes(), DEFAULT_RADIUS_M);
        assert!(!session.has_data());

        let filter = TagFilter::amenity("cafe").unwrap();
        session.record(EntityBatch::new(
            filter.clone(),
            vec![GeoEntity::new("cafe", session.center())],
        ));
        session.record(EntityBatch::new(
            filter,
            vec![GeoEntity::new("cafe", session.center())],
        ));

        assert_eq!(session.batches().len(), 2);
        assert_eq!(session.counts().get("cafe"), Some(2));
        assert_eq!(session.markers().len(), 2);
    }

    #[test]
    fn test_changing_place_clears_batches() {
        let mut session = Session::new(caldes(), DEFAULT_RADIUS_M);
        session.record(EntityBatch::empty(TagFilter::AllAmenities));

        session.set_place(caldes());
        assert!(session.has_data());

        session.set_place(Place::new("Male", 46.3546, 10.9055));
        assert!(!session.has_data());
        assert_eq!(session.place().name, "Male");
    }

    #[test]
    fn test_changing_radius_clears_batches() {
        let mut session = Session::new(caldes(), DEFAULT_RADIUS_M);
        session.record(EntityBatch::empty(TagFilter::AllAmenities));

        session.set_radius(DEFAULT_RADIUS_M);
        assert!(session.has_data());

        session.set_radius(2500);
        assert!(!session.has_data());
        assert_eq!(session.radius_m(), 2500);
    }

    #[test]
    fn test_unfiltered_batch_is_latest() {
        let mut session = Session::new(caldes(), DEFAULT_RADIUS_M);
        let cafe = GeoEntity::new("cafe", session.center());
        session.record(EntityBatch::new(TagFilter::amenity("cafe").unwrap(), vec![cafe.clone()]));
        assert!(session.unfiltered_batch().is_none());

        session.record(EntityBatch::empty(TagFilter::AllAmenities));
        session.record(EntityBatch::new(TagFilter::AllAmenities, vec![cafe]));
        assert_eq!(session.unfiltered_batch().map(|b| b.len()), Some(1));
    }
}
