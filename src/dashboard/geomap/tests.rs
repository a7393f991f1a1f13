use super::*;

#[test]
fn summarize_valid_geojson() {
    let body = r#"{"type":"FeatureCollection","features":[{"type":"Feature"},{"type":"Feature"}]}"#;
    assert_eq!(summarize_boundary(body), Some(2));
}

#[test]
fn summarize_rejects_malformed_body() {
    assert_eq!(summarize_boundary("not json"), None);
    assert_eq!(summarize_boundary(r#"{"type":"FeatureCollection"}"#), None);
    assert_eq!(summarize_boundary(r#"{"features":"not an array"}"#), None);
}

#[test]
fn unreachable_endpoint_degrades_to_unavailable() {
    // Port 9 (discard) with nothing listening: the fetch must come back as
    // Unavailable rather than erroring out
    let result = fetch_boundary("http://127.0.0.1:9/boundary.json");
    assert!(matches!(result, BoundaryData::Unavailable { .. }));
}
