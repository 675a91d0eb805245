//! Side panel: the layer list with its per-layer controls, and the edit form
//! for the feature currently open.

use crate::layers::LayerSet;
use crate::model::{EditingFeature, FeatureId, Layer, LayerId, Properties, Validation};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

impl EditingFeature {
    pub fn name(&self) -> &str {
        self.text("name")
    }

    pub fn description(&self) -> &str {
        self.text("description")
    }

    pub fn validated(&self) -> Validation {
        Validation::of(&self.properties).unwrap_or_default()
    }

    pub fn set_name(&mut self, name: &str) {
        self.properties.insert("name".to_string(), Value::String(name.to_string()));
    }

    pub fn set_description(&mut self, description: &str) {
        self.properties.insert("description".to_string(), Value::String(description.to_string()));
    }

    pub fn set_validated(&mut self, v: Validation) {
        self.properties.insert("validated".to_string(), Value::String(v.as_str().to_string()));
    }

    /// Properties to merge on save.
    pub fn patch(&self) -> Properties {
        self.properties.clone()
    }

    fn text(&self, key: &str) -> &str {
        self.properties.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRow {
    pub id: FeatureId,
    pub label: String,
    pub geometry_type: &'static str,
    pub selected: bool,
    pub can_delete: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRow {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub active: bool,
    pub expanded: bool,
    pub feature_count: usize,
    pub can_remove: bool,
    pub can_rename: bool,
    pub can_activate: bool,
    pub features: Vec<FeatureRow>,
}

/// Which controls a layer offers; all mutating ones are off for the
/// protected layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerControls {
    pub remove: bool,
    pub rename: bool,
    pub activate: bool,
    pub delete_features: bool,
}

impl LayerControls {
    pub fn for_layer(layer: &Layer) -> Self {
        let open = !layer.is_protected();
        LayerControls { remove: open, rename: open, activate: open, delete_features: open }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EditingPanel {
    expanded: HashSet<LayerId>,
    editing: Option<EditingFeature>,
}

impl EditingPanel {
    pub fn open(&mut self, editing: EditingFeature) {
        self.editing = Some(editing);
    }

    pub fn editing(&self) -> Option<&EditingFeature> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditingFeature> {
        self.editing.as_mut()
    }

    /// Clear the form, returning what was open.
    pub fn close(&mut self) -> Option<EditingFeature> {
        self.editing.take()
    }

    pub fn is_editing(&self, layer_id: &str, feature_id: Option<&str>) -> bool {
        self.editing
            .as_ref()
            .is_some_and(|e| e.layer_id == layer_id && feature_id.map_or(true, |f| e.feature_id == f))
    }

    pub fn toggle_expanded(&mut self, layer_id: &str) -> bool {
        if !self.expanded.remove(layer_id) {
            self.expanded.insert(layer_id.to_string());
            return true;
        }
        false
    }

    pub fn forget_layer(&mut self, layer_id: &str) {
        self.expanded.remove(layer_id);
        if self.is_editing(layer_id, None) {
            self.editing = None;
        }
    }

    pub fn rows(&self, layers: &LayerSet, active: Option<&str>, selected: Option<(&str, &str)>) -> Vec<LayerRow> {
        layers
            .iter()
            .map(|layer| {
                let controls = LayerControls::for_layer(layer);
                let expanded = self.expanded.contains(&layer.id);
                let features = if expanded { feature_rows(layer, controls, selected) } else { Vec::new() };
                LayerRow {
                    id: layer.id.clone(),
                    name: layer.name.clone(),
                    visible: layer.visible,
                    active: active == Some(layer.id.as_str()),
                    expanded,
                    feature_count: layer.features.len(),
                    can_remove: controls.remove,
                    can_rename: controls.rename,
                    can_activate: controls.activate,
                    features,
                }
            })
            .collect()
    }
}

fn feature_rows(layer: &Layer, controls: LayerControls, selected: Option<(&str, &str)>) -> Vec<FeatureRow> {
    layer
        .features
        .features
        .iter()
        .map(|f| {
            let id = f.id().unwrap_or_default().to_string();
            let label = if layer.is_protected() {
                format!("ID: {}", f.id().unwrap_or("N/A"))
            } else {
                f.name().filter(|n| !n.is_empty()).unwrap_or("Unnamed").to_string()
            };
            FeatureRow {
                selected: selected == Some((layer.id.as_str(), id.as_str())),
                id,
                label,
                geometry_type: f.geometry.type_name(),
                can_delete: controls.delete_features,
            }
        })
        .collect()
}
