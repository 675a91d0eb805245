use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::model::{Feature, FeatureCollection, Geometry, Position, Properties};
use serde::Deserialize;
use serde_json::Value;

/// Parse GeoJSON text into a feature collection.
pub fn parse_collection(text: &str) -> Result<FeatureCollection> {
    let v: Value = serde_json::from_str(text)?;
    collection_from_value(v)
}

/// Validate and convert a JSON value into a feature collection.
///
/// Only `Point`, `LineString` and `Polygon` geometries are accepted. Any
/// problem rejects the whole input; nothing is partially converted.
pub fn collection_from_value(v: Value) -> Result<FeatureCollection> {
    #[derive(Deserialize)]
    struct FeatureDe {
        #[serde(rename = "type")]
        kind: String,
        geometry: Option<Value>,
        #[serde(default)]
        properties: Option<Properties>,
    }
    #[derive(Deserialize)]
    struct DocDe {
        #[serde(rename = "type")]
        kind: String,
        features: Vec<FeatureDe>,
    }

    let doc: DocDe = serde_json::from_value(v)?;
    if doc.kind != "FeatureCollection" {
        return Err(Error::Parse(format!("expected a FeatureCollection, got '{}'", doc.kind)));
    }
    if doc.features.len() > limits::MAX_IMPORT_FEATURES {
        return Err(Error::Parse(format!(
            "too many features ({} > {})",
            doc.features.len(),
            limits::MAX_IMPORT_FEATURES
        )));
    }
    let mut features = Vec::with_capacity(doc.features.len());
    for (i, f) in doc.features.into_iter().enumerate() {
        if f.kind != "Feature" {
            return Err(Error::Parse(format!("features[{}]: expected a Feature, got '{}'", i, f.kind)));
        }
        let geometry = match f.geometry {
            Some(g) if !g.is_null() => {
                geometry_from_value(g).map_err(|e| Error::Parse(format!("features[{}]: {}", i, e)))?
            }
            _ => return Err(Error::Parse(format!("features[{}]: missing geometry", i))),
        };
        features.push(Feature::new(geometry, f.properties.unwrap_or_default()));
    }
    Ok(FeatureCollection { features })
}

fn geometry_from_value(v: Value) -> std::result::Result<Geometry, String> {
    #[derive(Deserialize)]
    struct GeometryDe {
        #[serde(rename = "type")]
        kind: String,
        coordinates: Value,
    }
    let g: GeometryDe = serde_json::from_value(v).map_err(|e| e.to_string())?;
    let geometry = match g.kind.as_str() {
        "Point" => Geometry::Point(from_coords(g.coordinates)?),
        "LineString" => Geometry::LineString(from_coords(g.coordinates)?),
        "Polygon" => Geometry::Polygon(from_coords(g.coordinates)?),
        other => return Err(format!("unsupported geometry type '{}'", other)),
    };
    check_geometry(&geometry)?;
    Ok(geometry)
}

fn from_coords<T: serde::de::DeserializeOwned>(v: Value) -> std::result::Result<T, String> {
    serde_json::from_value(v).map_err(|e| format!("bad coordinates: {}", e))
}

fn check_geometry(g: &Geometry) -> std::result::Result<(), String> {
    let (rings, vertices): (usize, usize) = match g {
        Geometry::Point(_) => (0, 1),
        Geometry::LineString(line) => (0, line.len()),
        Geometry::Polygon(rings) => (rings.len(), rings.iter().map(Vec::len).sum()),
    };
    if rings > limits::MAX_RINGS_PER_POLYGON {
        return Err(format!("too many rings ({})", rings));
    }
    if vertices > limits::MAX_VERTICES_PER_GEOMETRY {
        return Err(format!("too many vertices ({})", vertices));
    }
    let finite = |p: &Position| p.lat.is_finite() && p.lng.is_finite();
    let all_finite = match g {
        Geometry::Point(p) => finite(p),
        Geometry::LineString(line) => line.iter().all(finite),
        Geometry::Polygon(rings) => rings.iter().flatten().all(finite),
    };
    if !all_finite {
        return Err("non-finite coordinate".to_string());
    }
    Ok(())
}

/// Pretty-printed GeoJSON text, as written to export files.
pub fn to_pretty_string(fc: &FeatureCollection) -> Result<String> {
    serde_json::to_string_pretty(fc).map_err(|e| Error::Parse(e.to_string()))
}
