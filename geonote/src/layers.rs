use crate::error::{Error, Result};
use crate::ids::generate_id;
use crate::model::{Feature, FeatureCollection, Layer, Properties};
use crate::properties::{id_of, normalize_new_properties, sanitize_properties};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Ordered set of layers, each owning its feature collection.
///
/// Every mutation is all-or-nothing: an `Err` leaves the set untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerSet {
    pub layers: Vec<Layer>,
}

impl From<Vec<Layer>> for LayerSet {
    fn from(layers: Vec<Layer>) -> Self {
        LayerSet { layers }
    }
}

/// Build an empty, visible layer with a fresh id.
pub fn create_layer(name: &str) -> Result<Layer> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Layer name cannot be empty".to_string()));
    }
    Ok(Layer {
        id: generate_id(),
        name: name.to_string(),
        visible: true,
        features: FeatureCollection::new(),
        color: None,
    })
}

/// Parse GeoJSON text into a new layer.
///
/// Features without an id, or repeating an id seen earlier in the same
/// input, get a freshly generated one.
pub fn import_layer(raw: &str, suggested_name: &str) -> Result<Layer> {
    let mut fc = crate::geojson::parse_collection(raw)?;
    let mut seen = HashSet::new();
    for f in &mut fc.features {
        let id = match id_of(&f.properties) {
            Some(id) if !seen.contains(&id) => id,
            _ => generate_id(),
        };
        seen.insert(id.clone());
        f.properties.insert("id".to_string(), Value::String(id));
    }
    let name = layer_name_from_file(suggested_name);
    Ok(Layer {
        id: generate_id(),
        name: if name.trim().is_empty() { "Imported layer".to_string() } else { name },
        visible: true,
        features: fc,
        color: None,
    })
}

/// Strip a `.geojson` / `.json` suffix from an uploaded file name.
pub fn layer_name_from_file(file_name: &str) -> String {
    file_name
        .strip_suffix(".geojson")
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name)
        .to_string()
}

/// Flatten the given layers into one collection with sanitized properties.
pub fn export_collection<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> FeatureCollection {
    let features = layers
        .into_iter()
        .flat_map(|l| l.features.features.iter())
        .map(|f| Feature::new(f.geometry.clone(), sanitize_properties(&f.properties)))
        .collect();
    FeatureCollection { features }
}

impl LayerSet {
    pub fn new() -> Self {
        LayerSet::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Get layer by ID
    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Mutable access to an existing, unprotected layer.
    fn editable(&mut self, id: &str) -> Result<&mut Layer> {
        let layer = self.get_mut(id).ok_or_else(|| Error::layer_not_found(id))?;
        if layer.is_protected() {
            return Err(Error::ProtectedLayer(id.to_string()));
        }
        Ok(layer)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append a layer; its id must not already be in use.
    pub fn insert(&mut self, layer: Layer) -> Result<()> {
        if self.contains(&layer.id) {
            return Err(Error::Validation(format!("duplicate layer id '{}'", layer.id)));
        }
        tracing::info!(layer = %layer.id, name = %layer.name, features = layer.features.len(), "layer added");
        self.layers.push(layer);
        Ok(())
    }

    /// Flip visibility, returning the new state.
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool> {
        let layer = self.editable(id)?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    pub fn rename_layer(&mut self, id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Layer name cannot be empty".to_string()));
        }
        self.editable(id)?.name = name.to_string();
        Ok(())
    }

    /// Remove a layer and every feature it owns.
    pub fn remove_layer(&mut self, id: &str) -> Result<Layer> {
        self.editable(id)?;
        let idx = self.layers.iter().position(|l| l.id == id).ok_or_else(|| Error::layer_not_found(id))?;
        let layer = self.layers.remove(idx);
        tracing::info!(layer = %layer.id, features = layer.features.len(), "layer removed");
        Ok(layer)
    }

    /// Normalize and append a feature, returning its id.
    ///
    /// A missing id, or one already used in the layer, is replaced by a
    /// fresh id so ids stay unique per layer. Geometry with non-finite
    /// coordinates is rejected.
    pub fn add_feature(&mut self, layer_id: &str, feature: Feature) -> Result<String> {
        let layer = self.get_mut(layer_id).ok_or_else(|| Error::layer_not_found(layer_id))?;
        if !feature.geometry.is_finite() {
            return Err(Error::Validation("Invalid coordinates".to_string()));
        }
        let mut props = normalize_new_properties(&feature.properties);
        let id = match id_of(&props) {
            Some(id) if layer.features.find(&id).is_none() => id,
            _ => generate_id(),
        };
        props.insert("id".to_string(), Value::String(id.clone()));
        tracing::debug!(layer = layer_id, feature = %id, kind = feature.geometry.type_name(), "feature added");
        layer.features.features.push(Feature::new(feature.geometry, props));
        Ok(id)
    }

    /// Merge `patch` into the first feature with a matching id.
    ///
    /// Unknown layers or features are ignored. The `id` key of the patch is
    /// dropped since ids never change. Returns whether a feature was updated.
    pub fn update_feature_properties(&mut self, layer_id: &str, feature_id: &str, patch: &Properties) -> bool {
        let Some(feature) = self
            .get_mut(layer_id)
            .and_then(|l| l.features.features.iter_mut().find(|f| f.id() == Some(feature_id)))
        else {
            tracing::warn!(layer = layer_id, feature = feature_id, "update ignored: feature not found");
            return false;
        };
        for (k, v) in patch.iter().filter(|(k, _)| k.as_str() != "id") {
            feature.properties.insert(k.clone(), v.clone());
        }
        true
    }

    /// Remove every feature with a matching id. Idempotent.
    pub fn delete_feature(&mut self, layer_id: &str, feature_id: &str) -> bool {
        let Some(layer) = self.get_mut(layer_id) else {
            return false;
        };
        let before = layer.features.len();
        layer.features.features.retain(|f| f.id() != Some(feature_id));
        before != layer.features.len()
    }

    pub fn find_feature(&self, layer_id: &str, feature_id: &str) -> Option<&Feature> {
        self.get(layer_id)?.features.find(feature_id)
    }

    pub fn export_all(&self) -> FeatureCollection {
        export_collection(&self.layers)
    }
}
