//! User actions: fetch amenities, analyze the area.
//!
//! Each action runs to completion or fails on its own; the session stays
//! usable after any error so the user can retry.

use analyzer_core::{
    build_prompt_for, count_entities, CategoryCount, CompletionError, CompletionService,
    FetchError, Fetched, GeoSource, Session, SummaryPlan, TagFilter,
};
use thiserror::Error;
use tracing::{debug, info};

/// Result of a "show amenities" action.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowOutcome {
    /// `entities` were fetched and recorded.
    Found { filter: TagFilter, entities: usize },

    /// Nothing matched; an empty batch was recorded.
    Empty(TagFilter),
}

/// Fetch `filter` around the session's place and record the batch.
///
/// A fetch error records nothing.
pub async fn show_amenities(
    session: &mut Session,
    source: &dyn GeoSource,
    filter: &TagFilter,
) -> Result<ShowOutcome, FetchError> {
    let fetched = source
        .fetch(session.center(), filter, session.radius_m())
        .await?;

    let outcome = match &fetched {
        Fetched::Entities(batch) => ShowOutcome::Found {
            filter: filter.clone(),
            entities: batch.len(),
        },
        Fetched::Empty(filter) => ShowOutcome::Empty(filter.clone()),
    };

    info!(
        place = %session.place().name,
        filter = %filter,
        outcome = ?outcome,
        "Fetched amenities"
    );

    session.record(fetched.into_batch());
    Ok(outcome)
}

/// Fetch every amenity inside the place's administrative area and record
/// one batch per amenity type. Returns the number of batches.
pub async fn show_area_amenities(
    session: &mut Session,
    source: &dyn GeoSource,
) -> Result<usize, FetchError> {
    let area = session.place().short_name().to_string();
    let batches = source.fetch_area(&area).await?;
    let count = batches.len();

    info!(area = %area, batches = count, "Fetched area amenities");

    for batch in batches {
        session.record(batch);
    }
    Ok(count)
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no amenities fetched yet; show the amenities first")]
    NoData,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// A finished assessment.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub counts: CategoryCount,
    pub prompt: String,
    pub response: String,
    /// The summary came from a flat unfiltered fetch.
    pub unfiltered: bool,
}

/// Summarize the session, ask the completion service, return its answer.
///
/// With an unfiltered batch in the session the merged per-type counts are
/// replaced by a fresh unfiltered count of every amenity in the radius.
pub async fn analyze(
    session: &Session,
    source: &dyn GeoSource,
    chat: &dyn CompletionService,
) -> Result<Analysis, AnalyzeError> {
    if !session.has_data() {
        return Err(AnalyzeError::NoData);
    }

    let (counts, unfiltered) = match session.summary() {
        SummaryPlan::Merged(counts) => (counts, false),
        SummaryPlan::NeedsUnfiltered { .. } => {
            let counts = match session.unfiltered_batch() {
                Some(batch) => {
                    debug!(entities = batch.len(), "Using recorded unfiltered batch");
                    count_entities([batch])
                }
                None => {
                    let fetched = source
                        .fetch(
                            session.center(),
                            &TagFilter::AllAmenities,
                            session.radius_m(),
                        )
                        .await?;
                    count_entities([&fetched.into_batch()])
                }
            };
            (counts.without_reserved(), true)
        }
    };

    let prompt = build_prompt_for(session.place().short_name(), &counts);
    info!(
        categories = counts.len(),
        total = counts.total(),
        unfiltered,
        "Requesting assessment"
    );

    let response = chat.complete(&prompt).await?;

    Ok(Analysis {
        counts,
        prompt,
        response,
        unfiltered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_core::testing::{MockCompletion, MockGeoCall, MockGeoSource};
    use analyzer_core::{Coordinates, EntityBatch, GeoEntity, Place, PlaceCatalog};

    fn caldes() -> Session {
        Session::new(Place::new("P1 - Valle di Sole - Caldes", 46.3732, 10.9279), 1000)
    }

    fn entities(category: &str, n: usize) -> Vec<GeoEntity> {
        (0..n)
            .map(|i| GeoEntity::new(category, Coordinates::new(46.37 + i as f64 * 0.001, 10.92)))
            .collect()
    }

    fn amenity(value: &str) -> TagFilter {
        TagFilter::amenity(value).unwrap()
    }

    #[tokio::test]
    async fn test_show_records_found_batch() {
        let source = MockGeoSource::new().with_entities(amenity("school"), entities("school", 2));
        let mut session = caldes();

        let outcome = show_amenities(&mut session, &source, &amenity("school"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ShowOutcome::Found {
                filter: amenity("school"),
                entities: 2
            }
        );
        assert_eq!(session.counts().get("school"), Some(2));
        assert_eq!(
            source.calls(),
            vec![MockGeoCall::Fetch {
                center: Coordinates::new(46.3732, 10.9279),
                filter: amenity("school"),
                radius_m: 1000,
            }]
        );
    }

    #[tokio::test]
    async fn test_show_empty_records_empty_batch() {
        let source = MockGeoSource::new();
        let mut session = caldes();

        let outcome = show_amenities(&mut session, &source, &amenity("hospital"))
            .await
            .unwrap();

        assert_eq!(outcome, ShowOutcome::Empty(amenity("hospital")));
        assert_eq!(session.batches().len(), 1);
        assert_eq!(session.counts().get("hospital"), None);
    }

    #[tokio::test]
    async fn test_show_error_records_nothing() {
        let source = MockGeoSource::new().with_failure(amenity("bank"), 504, "Gateway Timeout");
        let mut session = caldes();

        let err = show_amenities(&mut session, &source, &amenity("bank"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Service { status: 504, .. }));
        assert!(!session.has_data());
    }

    #[tokio::test]
    async fn test_show_area_records_each_batch() {
        let source = MockGeoSource::new().with_area(
            "Caldes",
            vec![
                EntityBatch::new(amenity("cafe"), entities("cafe", 3)),
                EntityBatch::new(amenity("bank"), entities("bank", 1)),
            ],
        );
        let mut session = caldes();

        let batches = show_area_amenities(&mut session, &source).await.unwrap();
        assert_eq!(batches, 2);
        assert_eq!(session.counts().total(), 4);
    }

    #[tokio::test]
    async fn test_show_area_uses_village_name() {
        let catalog = PlaceCatalog::builtin();
        let village = catalog.find("šmarje").unwrap();
        let source = MockGeoSource::new().with_area(
            "Šmarje",
            vec![EntityBatch::new(amenity("school"), entities("school", 2))],
        );
        let mut session = Session::new(village.clone(), 1000);

        let batches = show_area_amenities(&mut session, &source).await.unwrap();

        assert_eq!(batches, 1);
        assert_eq!(session.counts().get("school"), Some(2));
        assert_eq!(
            source.calls(),
            vec![MockGeoCall::FetchArea {
                area: "Šmarje".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_analyze_without_data() {
        let source = MockGeoSource::new();
        let chat = MockCompletion::answering("unused");

        let err = analyze(&caldes(), &source, &chat).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::NoData));
        assert!(chat.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_merges_typed_batches() {
        let source = MockGeoSource::new()
            .with_entities(amenity("school"), entities("school", 2))
            .with_entities(amenity("cafe"), entities("cafe", 1));
        let chat = MockCompletion::answering("Fairly smart.");
        let mut session = caldes();

        show_amenities(&mut session, &source, &amenity("school")).await.unwrap();
        show_amenities(&mut session, &source, &amenity("cafe")).await.unwrap();
        show_amenities(&mut session, &source, &amenity("hospital")).await.unwrap();

        let analysis = analyze(&session, &source, &chat).await.unwrap();

        assert!(!analysis.unfiltered);
        assert_eq!(analysis.response, "Fairly smart.");
        assert!(analysis.prompt.contains("in Caldes with these facilities:\nschool: 2\ncafe: 1\n"));
        assert!(!analysis.prompt.contains("hospital"));
        assert_eq!(chat.prompts(), vec![analysis.prompt.clone()]);
        // No extra fetch for a typed-only session.
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_analyze_uses_recorded_unfiltered_batch() {
        let mut all = entities("cafe", 2);
        all.extend(entities("bank", 1));
        let source = MockGeoSource::new()
            .with_entities(TagFilter::AllAmenities, all)
            .with_entities(amenity("school"), entities("school", 4));
        let chat = MockCompletion::answering("ok");
        let mut session = caldes();

        show_amenities(&mut session, &source, &amenity("school")).await.unwrap();
        show_amenities(&mut session, &source, &TagFilter::AllAmenities)
            .await
            .unwrap();

        let analysis = analyze(&session, &source, &chat).await.unwrap();

        assert!(analysis.unfiltered);
        let pairs: Vec<_> = analysis.counts.iter().collect();
        assert_eq!(pairs, vec![("cafe", 2), ("bank", 1)]);
        assert!(!analysis.prompt.contains("school"));
        // The unfiltered batch already covers this place and radius.
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_analyze_after_radius_change_needs_new_fetch() {
        let source = MockGeoSource::new()
            .with_entities(TagFilter::AllAmenities, entities("cafe", 2));
        let chat = MockCompletion::answering("ok");
        let mut session = caldes();

        show_amenities(&mut session, &source, &TagFilter::AllAmenities)
            .await
            .unwrap();
        session.set_radius(5000);
        assert!(matches!(
            analyze(&session, &source, &chat).await,
            Err(AnalyzeError::NoData)
        ));

        show_amenities(&mut session, &source, &TagFilter::AllAmenities)
            .await
            .unwrap();
        let analysis = analyze(&session, &source, &chat).await.unwrap();
        assert_eq!(analysis.counts.get("cafe"), Some(2));
        assert_eq!(
            source.calls().last(),
            Some(&MockGeoCall::Fetch {
                center: session.center(),
                filter: TagFilter::AllAmenities,
                radius_m: 5000,
            })
        );
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_analyze_surfaces_rejection_message() {
        let source = MockGeoSource::new().with_entities(amenity("cafe"), entities("cafe", 1));
        let chat = MockCompletion::rejecting(400, "Chatbot not found");
        let mut session = caldes();
        show_amenities(&mut session, &source, &amenity("cafe")).await.unwrap();

        let err = analyze(&session, &source, &chat).await.unwrap_err();
        assert!(err.to_string().contains("Chatbot not found"));
        // The session is untouched and can be analyzed again.
        assert_eq!(session.batches().len(), 1);
    }
}
