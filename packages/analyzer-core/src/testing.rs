//! Mock collaborators for testing.
//!
//! Useful for exercising front-end handlers without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{CompletionError, FetchError};
use crate::traits::{CompletionService, GeoSource};
use crate::types::{Coordinates, EntityBatch, Fetched, GeoEntity, TagFilter};

/// Canned response for a filter.
#[derive(Debug, Clone)]
enum MockFetch {
    Entities(Vec<GeoEntity>),
    Fail { status: u16, message: String },
}

/// Record of a call made to the mock geo source.
#[derive(Debug, Clone, PartialEq)]
pub enum MockGeoCall {
    Fetch {
        center: Coordinates,
        filter: TagFilter,
        radius_m: u32,
    },
    FetchArea {
        area: String,
    },
}

/// A geo source answering from predefined entities per filter.
///
/// Filters without a predefined answer return [`Fetched::Empty`].
#[derive(Default, Clone)]
pub struct MockGeoSource {
    responses: Arc<RwLock<HashMap<TagFilter, MockFetch>>>,
    areas: Arc<RwLock<HashMap<String, Vec<EntityBatch>>>>,
    calls: Arc<RwLock<Vec<MockGeoCall>>>,
}

impl MockGeoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `filter` with these entities.
    pub fn with_entities(self, filter: TagFilter, entities: Vec<GeoEntity>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(filter, MockFetch::Entities(entities));
        self
    }

    /// Answer `filter` with a service error.
    pub fn with_failure(self, filter: TagFilter, status: u16, message: impl Into<String>) -> Self {
        self.responses.write().unwrap().insert(
            filter,
            MockFetch::Fail {
                status,
                message: message.into(),
            },
        );
        self
    }

    /// Answer an area lookup with these batches.
    pub fn with_area(self, area: impl Into<String>, batches: Vec<EntityBatch>) -> Self {
        self.areas.write().unwrap().insert(area.into(), batches);
        self
    }

    pub fn calls(&self) -> Vec<MockGeoCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockGeoCall::Fetch { .. }))
            .count()
    }
}

#[async_trait]
impl GeoSource for MockGeoSource {
    async fn fetch(
        &self,
        center: Coordinates,
        filter: &TagFilter,
        radius_m: u32,
    ) -> Result<Fetched, FetchError> {
        self.calls.write().unwrap().push(MockGeoCall::Fetch {
            center,
            filter: filter.clone(),
            radius_m,
        });

        match self.responses.read().unwrap().get(filter) {
            Some(MockFetch::Entities(entities)) => Ok(Fetched::from_batch(EntityBatch::new(
                filter.clone(),
                entities.clone(),
            ))),
            Some(MockFetch::Fail { status, message }) => Err(FetchError::Service {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(Fetched::Empty(filter.clone())),
        }
    }

    async fn fetch_area(&self, area: &str) -> Result<Vec<EntityBatch>, FetchError> {
        self.calls.write().unwrap().push(MockGeoCall::FetchArea {
            area: area.to_string(),
        });
        Ok(self
            .areas
            .read()
            .unwrap()
            .get(area)
            .cloned()
            .unwrap_or_default())
    }
}

/// A completion service returning a fixed answer or rejection.
#[derive(Clone)]
pub struct MockCompletion {
    answer: Result<String, (u16, String)>,
    prompts: Arc<RwLock<Vec<String>>>,
}

impl MockCompletion {
    pub fn answering(text: impl Into<String>) -> Self {
        Self {
            answer: Ok(text.into()),
            prompts: Arc::default(),
        }
    }

    pub fn rejecting(status: u16, message: impl Into<String>) -> Self {
        Self {
            answer: Err((status, message.into())),
            prompts: Arc::default(),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.write().unwrap().push(prompt.to_string());
        match &self.answer {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => Err(CompletionError::Rejected {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
