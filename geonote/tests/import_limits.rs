use geonote::geometry::limits::{MAX_IMPORT_FEATURES, MAX_VERTICES_PER_GEOMETRY};
use geonote::{import_layer, Error};
use serde_json::json;

fn collection(features: Vec<serde_json::Value>) -> String {
    json!({"type": "FeatureCollection", "features": features}).to_string()
}

fn point(lng: f64, lat: f64) -> serde_json::Value {
    json!({"type": "Feature", "geometry": {"type": "Point", "coordinates": [lng, lat]}, "properties": {}})
}

#[test]
fn feature_cap_exceeded() {
    let features = (0..MAX_IMPORT_FEATURES + 1).map(|_| point(0.0, 0.0)).collect();
    let r = import_layer(&collection(features), "big.geojson");
    assert!(matches!(r, Err(Error::Parse(_))), "expected failure on feature cap");
}

#[test]
fn vertex_cap_exceeded() {
    let coords: Vec<[f64; 2]> = (0..MAX_VERTICES_PER_GEOMETRY + 1).map(|i| [0.0, (i % 80) as f64]).collect();
    let f = json!({"type": "Feature", "geometry": {"type": "LineString", "coordinates": coords}, "properties": {}});
    assert!(import_layer(&collection(vec![f]), "x").is_err());
}

#[test]
fn unsupported_geometry_rejected() {
    let multi = json!({"type": "Feature", "geometry": {"type": "MultiPoint", "coordinates": [[0.0, 0.0]]}, "properties": {}});
    let err = import_layer(&collection(vec![point(1.0, 1.0), multi]), "x").unwrap_err();
    assert!(err.to_string().contains("features[1]"), "{}", err);
    let null_geom = json!({"type": "Feature", "geometry": null, "properties": {}});
    assert!(import_layer(&collection(vec![null_geom]), "x").is_err());
}

#[test]
fn wrong_document_type_rejected() {
    assert!(import_layer(r#"{"type": "Feature", "features": []}"#, "x").is_err());
    assert!(import_layer(r#"{"type": "FeatureCollection"}"#, "x").is_err());
    assert!(import_layer("[]", "x").is_err());
}

#[test]
fn empty_collection_is_fine() {
    let layer = import_layer(&collection(vec![]), "empty.json").unwrap();
    assert_eq!(layer.name, "empty");
    assert!(layer.features.is_empty());
    assert!(layer.visible);
}
