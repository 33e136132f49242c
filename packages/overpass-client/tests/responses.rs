//! Decoding of Overpass JSON responses into analyzer entities.

use analyzer_core::{count_entities, Coordinates, FetchError, Fetched, TagFilter};
use overpass_client::{parse_response, OverpassError};

const AROUND_SCHOOLS: &str = r#"{
  "version": 0.6,
  "generator": "Overpass API",
  "elements": [
    {
      "type": "node",
      "id": 1,
      "lat": 46.3731,
      "lon": 10.9281,
      "tags": { "amenity": "school", "name": "Scuola Primaria" }
    },
    {
      "type": "way",
      "id": 2,
      "center": { "lat": 46.3740, "lon": 10.9270 },
      "nodes": [10, 11, 12],
      "tags": { "amenity": "school" }
    },
    {
      "type": "relation",
      "id": 3,
      "tags": { "amenity": "school", "name": "No geometry" }
    },
    {
      "type": "node",
      "id": 4,
      "lat": 46.0,
      "lon": 10.0
    }
  ]
}"#;

const AREA_MIXED: &str = r#"{
  "elements": [
    { "type": "node", "id": 1, "lat": 46.30, "lon": 10.73, "tags": { "amenity": "cafe" } },
    { "type": "node", "id": 2, "lat": 46.31, "lon": 10.74, "tags": { "amenity": "bank", "name": "Cassa Rurale" } },
    { "type": "node", "id": 3, "lat": 46.32, "lon": 10.75, "tags": { "amenity": "cafe" } },
    { "type": "node", "id": 4, "lat": 46.33, "lon": 10.76, "tags": { "shop": "bakery" } }
  ]
}"#;

#[test]
fn test_around_response_positions() {
    let filter = TagFilter::amenity("school").unwrap();
    let batch = parse_response(AROUND_SCHOOLS).unwrap().into_batch(&filter);

    // The untagged node is dropped.
    assert_eq!(batch.len(), 3);

    let node = &batch.entities[0];
    assert_eq!(node.category.as_deref(), Some("school"));
    assert_eq!(node.name.as_deref(), Some("Scuola Primaria"));
    assert_eq!(node.position, Some(Coordinates::new(46.3731, 10.9281)));

    let way = &batch.entities[1];
    assert_eq!(way.position, Some(Coordinates::new(46.3740, 10.9270)));

    let relation = &batch.entities[2];
    assert_eq!(relation.position, None);
}

#[test]
fn test_null_geometry_not_counted() {
    let filter = TagFilter::amenity("school").unwrap();
    let batch = parse_response(AROUND_SCHOOLS).unwrap().into_batch(&filter);
    assert_eq!(count_entities([&batch]).get("school"), Some(2));
}

#[test]
fn test_unfiltered_response_categorizes_by_own_tag() {
    let batch = parse_response(AREA_MIXED)
        .unwrap()
        .into_batch(&TagFilter::AllAmenities);
    let counts = count_entities([&batch]);

    let pairs: Vec<_> = counts.iter().collect();
    // The bakery has no amenity tag and falls back to the batch key.
    assert_eq!(pairs, vec![("cafe", 2), ("bank", 1), ("all", 1)]);
    assert_eq!(counts.without_reserved().total(), 3);
}

#[test]
fn test_area_response_groups_by_amenity() {
    let batches = parse_response(AREA_MIXED).unwrap().into_amenity_batches();

    let labels: Vec<_> = batches.iter().map(|b| b.key().to_string()).collect();
    assert_eq!(labels, vec!["cafe", "bank"]);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[1].entities[0].name.as_deref(), Some("Cassa Rurale"));
}

#[test]
fn test_area_response_skips_unusable_amenity_values() {
    let body = r#"{"elements": [
      { "type": "node", "id": 1, "lat": 46.30, "lon": 10.73, "tags": { "amenity": "bar\"s" } },
      { "type": "node", "id": 2, "lat": 46.31, "lon": 10.74, "tags": { "amenity": "  " } },
      { "type": "node", "id": 3, "lat": 46.32, "lon": 10.75, "tags": { "amenity": "pharmacy" } }
    ]}"#;
    let batches = parse_response(body).unwrap().into_amenity_batches();

    let labels: Vec<_> = batches.iter().map(|b| b.key().to_string()).collect();
    assert_eq!(labels, vec!["pharmacy"]);
    assert_eq!(batches[0].len(), 1);
}

#[test]
fn test_empty_response_is_empty_outcome() {
    let filter = TagFilter::amenity("hospital").unwrap();
    let batch = parse_response(r#"{"elements": []}"#)
        .unwrap()
        .into_batch(&filter);
    assert_eq!(Fetched::from_batch(batch), Fetched::Empty(filter));
}

#[test]
fn test_invalid_json_is_parse_error() {
    let err = parse_response("<html>busy</html>").unwrap_err();
    assert!(matches!(err, OverpassError::Parse(_)));
    assert!(matches!(FetchError::from(err), FetchError::Decode(_)));
}

#[test]
fn test_api_error_maps_to_service_error() {
    let err = OverpassError::Api {
        status: 429,
        message: "rate_limited".into(),
    };
    match FetchError::from(err) {
        FetchError::Service { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate_limited");
        }
        other => panic!("unexpected {:?}", other),
    }
}
