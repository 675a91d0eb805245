use crate::error;
use crate::host::{browser_store, MapHost};
use crate::interop::{new_obj, opt_str, set_kv, to_js};
use crate::Annotator;
use geonote::ExportFile;
use geonote::store::MemoryStore;
use geonote::{BaseLayer, ClickAction, DrawMode, Key, MapClick, Properties, Validation};
use serde::Serialize;
use wasm_bindgen::prelude::*;

const MODES: [&str; 3] = ["point", "line", "polygon"];
const BASE_LAYERS: [&str; 3] = ["nearmap", "esri", "osm"];
const VALIDATION: [&str; 3] = ["0", "1", "2"];

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route core `tracing` events to the browser console.
#[wasm_bindgen]
pub fn init_logging() {
    if tracing_wasm::try_set_as_global_default().is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logging already initialized"));
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditingView<'a> {
    layer_id: &'a str,
    feature_id: &'a str,
    name: &'a str,
    description: &'a str,
    validated: &'static str,
    properties: &'a Properties,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportView<'a> {
    file_name: &'a str,
    contents: &'a str,
}

fn export_to_js(f: ExportFile) -> JsValue {
    to_js(&ExportView { file_name: &f.file_name, contents: &f.contents })
}

fn click_to_js(action: &ClickAction) -> JsValue {
    let o = new_obj();
    match action {
        ClickAction::Copied(text) => {
            set_kv(&o, "kind", &JsValue::from_str("copied"));
            set_kv(&o, "text", &JsValue::from_str(text));
        }
        ClickAction::AddVertex(p) => {
            set_kv(&o, "kind", &JsValue::from_str("vertex"));
            set_kv(&o, "position", &to_js(p));
        }
        ClickAction::Edit { layer_id, feature_id } => {
            set_kv(&o, "kind", &JsValue::from_str("edit"));
            set_kv(&o, "layerId", &JsValue::from_str(layer_id));
            set_kv(&o, "featureId", &JsValue::from_str(feature_id));
        }
        ClickAction::Ignored => set_kv(&o, "kind", &JsValue::from_str("ignored")),
    }
    o.into()
}

#[wasm_bindgen]
impl Annotator {
    /// Annotator backed by `window.localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new(host: MapHost) -> Annotator {
        Annotator::rs_with_backend(host, browser_store())
    }
    /// Annotator whose state lives only as long as the page.
    pub fn with_memory_store(host: MapHost) -> Annotator {
        Annotator::rs_with_backend(host, Box::new(MemoryStore::new()))
    }

    // State getters
    pub fn layers(&self) -> JsValue {
        to_js(&self.inner.layer_rows())
    }
    pub fn layer_count(&self) -> u32 {
        self.inner.layers().len() as u32
    }
    pub fn feature_count(&self, layer_id: &str) -> Option<u32> {
        self.inner.layers().get(layer_id).map(|l| l.features.len() as u32)
    }
    pub fn active_layer(&self) -> Option<String> {
        self.inner.active_layer().map(str::to_string)
    }
    pub fn selected_feature(&self) -> JsValue {
        match self.inner.selected_feature() {
            Some((l, f)) => to_js(&[l, f]),
            None => JsValue::NULL,
        }
    }
    pub fn settings(&self) -> JsValue {
        to_js(self.inner.settings())
    }
    pub fn editing(&self) -> JsValue {
        let Some(e) = self.inner.editing() else {
            return JsValue::NULL;
        };
        to_js(&EditingView {
            layer_id: &e.layer_id,
            feature_id: &e.feature_id,
            name: e.name(),
            description: e.description(),
            validated: e.validated().as_str(),
            properties: &e.properties,
        })
    }

    // Layers
    pub fn create_layer_prompted(&mut self) -> Option<String> {
        self.inner.create_layer_prompted().ok().flatten()
    }
    pub fn create_layer(&mut self, name: &str) -> Option<String> {
        self.inner.create_layer(name).ok()
    }
    pub fn create_layer_res(&mut self, name: &str) -> JsValue {
        error::wrap(self.inner.create_layer(name), |id| JsValue::from_str(&id))
    }
    pub fn import_geojson_res(&mut self, text: &str, file_name: &str) -> JsValue {
        error::wrap(self.inner.import_layer(text, file_name), |id| JsValue::from_str(&id))
    }
    pub fn toggle_layer_res(&mut self, id: &str) -> JsValue {
        error::wrap(self.inner.toggle_layer(id), JsValue::from_bool)
    }
    pub fn rename_layer_res(&mut self, id: &str, name: &str) -> JsValue {
        error::wrap(self.inner.rename_layer(id, name), |_| JsValue::TRUE)
    }
    pub fn remove_layer(&mut self, id: &str) -> bool {
        self.inner.remove_layer(id).unwrap_or(false)
    }
    pub fn remove_layer_res(&mut self, id: &str) -> JsValue {
        error::wrap(self.inner.remove_layer(id), JsValue::from_bool)
    }
    pub fn set_active_layer_res(&mut self, id: &str) -> JsValue {
        error::wrap(self.inner.set_active_layer(id), |_| JsValue::from_str(id))
    }
    pub fn toggle_layer_expanded(&mut self, id: &str) -> bool {
        self.inner.toggle_layer_expanded(id)
    }

    // Features and the edit form
    pub fn select_feature_res(&mut self, layer_id: &str, feature_id: &str) -> JsValue {
        error::wrap(self.inner.select_feature(layer_id, feature_id), |_| self.selected_feature())
    }
    pub fn open_feature_res(&mut self, layer_id: &str, feature_id: &str) -> JsValue {
        error::wrap(self.inner.open_feature(layer_id, feature_id), |_| self.editing())
    }
    pub fn update_edit_res(&mut self, name: &str, description: &str, validated: &str) -> JsValue {
        let Some(v) = Validation::parse(validated) else {
            return error::invalid_choice("validated", &VALIDATION, validated);
        };
        let Some(form) = self.inner.editing_mut() else {
            return error::err("not_editing", "no feature is open for editing", None);
        };
        form.set_name(name);
        form.set_description(description);
        form.set_validated(v);
        error::ok(self.editing())
    }
    pub fn save_edit(&mut self) -> bool {
        self.inner.save_edit()
    }
    pub fn cancel_edit(&mut self) {
        self.inner.cancel_edit();
    }
    pub fn delete_feature(&mut self, layer_id: &str, feature_id: &str) -> bool {
        self.inner.delete_feature(layer_id, feature_id).unwrap_or(false)
    }
    pub fn delete_feature_res(&mut self, layer_id: &str, feature_id: &str) -> JsValue {
        error::wrap(self.inner.delete_feature(layer_id, feature_id), JsValue::from_bool)
    }

    // Export
    pub fn export_layer_res(&self, id: &str) -> JsValue {
        error::wrap(self.inner.export_layer(id), export_to_js)
    }
    pub fn export_all_res(&self) -> JsValue {
        error::wrap(self.inner.export_all(), export_to_js)
    }

    // Drawing
    pub fn start_drawing_res(&mut self, mode: &str) -> JsValue {
        let Some(m) = DrawMode::parse(mode) else {
            return error::invalid_choice("mode", &MODES, mode);
        };
        error::wrap(self.inner.start_drawing(m), |_| JsValue::from_str(m.as_str()))
    }
    pub fn toggle_drawing_mode_res(&mut self, mode: &str) -> JsValue {
        let Some(m) = DrawMode::parse(mode) else {
            return error::invalid_choice("mode", &MODES, mode);
        };
        error::wrap(self.inner.toggle_drawing_mode(m), |now| opt_str(now.map(DrawMode::as_str)))
    }
    pub fn drawing_mode(&self) -> Option<String> {
        self.inner.drawing().mode().map(|m| m.as_str().to_string())
    }
    pub fn vertex_count(&self) -> u32 {
        self.inner.drawing().vertices().len() as u32
    }
    /// Whether to show the finish control.
    pub fn has_pending_vertices(&self) -> bool {
        self.inner.drawing().has_pending_vertices()
    }
    pub fn can_finish_drawing(&self) -> bool {
        self.inner.drawing().can_finish()
    }
    pub fn finish_drawing_res(&mut self) -> JsValue {
        error::wrap(self.inner.finish_drawing(), |id| opt_str(id.as_deref()))
    }
    pub fn undo_vertex(&mut self) -> bool {
        self.inner.undo_vertex()
    }
    pub fn cancel_drawing(&mut self) -> bool {
        self.inner.cancel_drawing()
    }
    /// Forward a `KeyboardEvent.key`; returns whether it was consumed.
    pub fn key_down(&mut self, key: &str) -> bool {
        Key::parse(key).is_some_and(|k| self.inner.handle_key(k))
    }

    // Map events
    pub fn map_click_res(&mut self, lat: f64, lng: f64) -> JsValue {
        if !lat.is_finite() {
            return error::non_finite("lat");
        }
        if !lng.is_finite() {
            return error::non_finite("lng");
        }
        error::wrap(self.inner.map_click(MapClick::BaseMap { lat, lng }), |a| click_to_js(&a))
    }
    pub fn feature_click_res(&mut self, layer_id: &str, feature_id: &str) -> JsValue {
        let click = MapClick::Feature { layer_id: layer_id.to_string(), feature_id: feature_id.to_string() };
        error::wrap(self.inner.map_click(click), |a| click_to_js(&a))
    }
    pub fn record_view_res(&mut self, lat: f64, lng: f64, zoom: f64) -> JsValue {
        for (name, v) in [("lat", lat), ("lng", lng), ("zoom", zoom)] {
            if !v.is_finite() {
                return error::non_finite(name);
            }
        }
        self.inner.record_view(lat, lng, zoom);
        error::ok(JsValue::TRUE)
    }

    // Zoom
    pub fn zoom_to_layer(&mut self, id: &str) -> bool {
        self.inner.zoom_to_layer(id)
    }
    pub fn zoom_to_feature(&mut self, layer_id: &str, feature_id: &str) -> bool {
        self.inner.zoom_to_feature(layer_id, feature_id)
    }
    pub fn zoom_to_coordinates_res(&mut self, lat: &str, lng: &str) -> JsValue {
        error::wrap(self.inner.zoom_to_coordinates(lat, lng), |_| JsValue::TRUE)
    }

    // Settings
    pub fn set_base_layer_res(&mut self, name: &str) -> JsValue {
        let Some(base) = BaseLayer::parse(name) else {
            return error::invalid_choice("baseLayer", &BASE_LAYERS, name);
        };
        self.inner.set_base_layer(base);
        error::ok(JsValue::from_str(name))
    }
    pub fn set_show_annotations(&mut self, show: bool) {
        self.inner.set_show_annotations(show);
    }
}
