use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type LayerId = String;
pub type FeatureId = String;

/// Free-form GeoJSON properties bag.
pub type Properties = Map<String, Value>;

/// A GeoJSON position. Serialized in `[lng, lat]` (or `[lng, lat, alt]`) order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
    pub alt: Option<f64>,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Position { lng, lat, alt: None }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let len = if self.alt.is_some() { 3 } else { 2 };
        let mut seq = s.serialize_seq(Some(len))?;
        seq.serialize_element(&self.lng)?;
        seq.serialize_element(&self.lat)?;
        if let Some(alt) = self.alt {
            seq.serialize_element(&alt)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Vec::<f64>::deserialize(d)?;
        match raw.as_slice() {
            [lng, lat] => Ok(Position { lng: *lng, lat: *lat, alt: None }),
            [lng, lat, alt] => Ok(Position { lng: *lng, lat: *lat, alt: Some(*alt) }),
            _ => Err(de::Error::invalid_length(raw.len(), &"a position of 2 or 3 numbers")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
        }
    }

    /// Positions that contribute to the footprint: the point, every line
    /// vertex, or the outer ring of a polygon.
    pub fn footprint(&self) -> &[Position] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::LineString(line) => line,
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Every coordinate (holes included) is a finite number.
    pub fn is_finite(&self) -> bool {
        let finite = |p: &Position| p.lat.is_finite() && p.lng.is_finite() && p.alt.map_or(true, f64::is_finite);
        match self {
            Geometry::Point(p) => finite(p),
            Geometry::LineString(line) => line.iter().all(finite),
            Geometry::Polygon(rings) => rings.iter().flatten().all(finite),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Feature { geometry, properties }
    }

    /// The lookup key for edit/delete/select. Empty ids count as missing.
    pub fn id(&self) -> Option<&str> {
        self.properties.get("id").and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut st = s.serialize_struct("Feature", 3)?;
        st.serialize_field("type", "Feature")?;
        st.serialize_field("geometry", &self.geometry)?;
        st.serialize_field("properties", &self.properties)?;
        st.end()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        FeatureCollection::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id() == Some(id))
    }
}

impl Serialize for FeatureCollection {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut st = s.serialize_struct("FeatureCollection", 2)?;
        st.serialize_field("type", "FeatureCollection")?;
        st.serialize_field("features", &self.features)?;
        st.end()
    }
}

impl<'de> Deserialize<'de> for FeatureCollection {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        crate::geojson::collection_from_value(v).map_err(de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub features: FeatureCollection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Layer {
    pub fn is_protected(&self) -> bool {
        self.id == crate::config::PROTECTED_LAYER_ID
    }
}

/// Tri-state review status stored in the `validated` property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Validation {
    Invalid,
    #[default]
    Pending,
    Valid,
}

impl Validation {
    pub fn as_str(self) -> &'static str {
        match self {
            Validation::Invalid => "0",
            Validation::Pending => "1",
            Validation::Valid => "2",
        }
    }

    pub fn parse(s: &str) -> Option<Validation> {
        match s {
            "0" => Some(Validation::Invalid),
            "1" => Some(Validation::Pending),
            "2" => Some(Validation::Valid),
            _ => None,
        }
    }

    pub fn of(props: &Properties) -> Option<Validation> {
        props.get("validated").and_then(Value::as_str).and_then(Validation::parse)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BaseLayer {
    #[default]
    Nearmap,
    Esri,
    Osm,
}

impl BaseLayer {
    pub fn parse(s: &str) -> Option<BaseLayer> {
        match s {
            "nearmap" => Some(BaseLayer::Nearmap),
            "esri" => Some(BaseLayer::Esri),
            "osm" => Some(BaseLayer::Osm),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSettings {
    pub base_layer: BaseLayer,
    pub show_annotations: bool,
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        MapSettings {
            base_layer: BaseLayer::Nearmap,
            show_annotations: true,
            center: crate::config::DEFAULT_CENTER,
            zoom: crate::config::DEFAULT_ZOOM,
        }
    }
}

/// The feature currently open in the edit form.
#[derive(Clone, Debug, PartialEq)]
pub struct EditingFeature {
    pub layer_id: LayerId,
    pub feature_id: FeatureId,
    pub properties: Properties,
}
