//! Typed persistence over a string key-value backend (browser local storage
//! in production, [`MemoryStore`] elsewhere).

use crate::config::{LAYERS_KEY, SETTINGS_KEY};
use crate::error::{Error, Result};
use crate::layers::LayerSet;
use crate::model::MapSettings;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory backend. Clones share the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.raw(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct StateStore {
    backend: Box<dyn KeyValueStore>,
}

impl StateStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        StateStore { backend }
    }

    /// Read and decode `key`, falling back to `default` when the entry is
    /// missing or does not decode.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: impl FnOnce() -> T) -> T {
        let Some(raw) = self.backend.get(key) else {
            return default();
        };
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored entry is corrupt, using default");
                default()
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| Error::Storage(e.to_string()))?;
        self.backend.set(key, &raw)
    }

    pub fn load_layers(&self) -> LayerSet {
        self.get_or(LAYERS_KEY, LayerSet::new)
    }

    pub fn save_layers(&mut self, layers: &LayerSet) -> Result<()> {
        self.set(LAYERS_KEY, layers)
    }

    pub fn load_settings(&self) -> MapSettings {
        self.get_or(SETTINGS_KEY, MapSettings::default)
    }

    pub fn save_settings(&mut self, settings: &MapSettings) -> Result<()> {
        self.set(SETTINGS_KEY, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BaseLayer;

    #[test]
    fn missing_and_corrupt_entries_use_defaults() {
        let mut backend = MemoryStore::new();
        let store = StateStore::new(Box::new(backend.clone()));
        assert!(store.load_layers().is_empty());
        assert_eq!(store.load_settings(), MapSettings::default());

        backend.set(LAYERS_KEY, "{oops").unwrap();
        backend.set(SETTINGS_KEY, "{\"baseLayer\":\"mars\"}").unwrap();
        assert!(store.load_layers().is_empty());
        assert_eq!(store.load_settings(), MapSettings::default());
    }

    #[test]
    fn settings_round_trip_uses_camel_case() {
        let backend = MemoryStore::new();
        let mut store = StateStore::new(Box::new(backend.clone()));
        let settings = MapSettings { base_layer: BaseLayer::Esri, show_annotations: false, center: [1.0, 2.0], zoom: 9.0 };
        store.save_settings(&settings).unwrap();
        let raw = backend.raw(SETTINGS_KEY).unwrap();
        assert!(raw.contains("\"baseLayer\":\"esri\""));
        assert!(raw.contains("\"showAnnotations\":false"));
        assert_eq!(store.load_settings(), settings);
    }

    #[test]
    fn reads_layer_entries_written_by_the_web_client() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                LAYERS_KEY,
                r##"[{"id":"k1","name":"Trees","visible":false,"color":"#fff",
                    "features":{"type":"FeatureCollection","features":[
                      {"type":"Feature","geometry":{"type":"Point","coordinates":[-96.5,32.9]},"properties":{"id":"t1"}}]}}]"##,
            )
            .unwrap();
        let layers = StateStore::new(Box::new(backend)).load_layers();
        let layer = layers.get("k1").unwrap();
        assert!(!layer.visible);
        assert_eq!(layer.color.as_deref(), Some("#fff"));
        assert_eq!(layer.features.find("t1").unwrap().geometry.footprint()[0].lat, 32.9);
    }
}
