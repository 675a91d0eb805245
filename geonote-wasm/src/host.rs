//! Browser-side implementations of the core ports. Map drawing, clipboard
//! access and dialogs are delegated to a JS `MapHost` object; persistence
//! goes straight to `window.localStorage`.

use crate::interop::to_js;
use geonote::config::{PREVIEW_FILL_OPACITY, PREVIEW_STYLE};
use geonote::ports::{Clipboard, MapWidget, RenderLayer, StyleFn, UserPrompt};
use geonote::store::{KeyValueStore, MemoryStore};
use geonote::tiles::TileSource;
use geonote::{Bounds, DrawMode, Error, Feature, FeatureStyle, Ports, Position, Preview};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type MapHost;

    #[wasm_bindgen(method)]
    fn render(this: &MapHost, scene: JsValue);
    #[wasm_bindgen(method, js_name = showPreview)]
    fn show_preview(this: &MapHost, preview: JsValue);
    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &MapHost, lat: f64, lng: f64, zoom: f64);
    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &MapHost, south: f64, west: f64, north: f64, east: f64);
    #[wasm_bindgen(method, js_name = setTileSource)]
    fn set_tile_source(this: &MapHost, source: JsValue);
    #[wasm_bindgen(method, js_name = copyText)]
    fn copy_text(this: &MapHost, text: &str);
    #[wasm_bindgen(method)]
    fn prompt(this: &MapHost, message: &str) -> Option<String>;
    #[wasm_bindgen(method)]
    fn confirm(this: &MapHost, message: &str) -> bool;
    #[wasm_bindgen(method)]
    fn alert(this: &MapHost, message: &str);
}

pub fn ports(host: MapHost, store: Box<dyn KeyValueStore>) -> Ports {
    Ports {
        store,
        widget: Box::new(HostWidget(host.clone())),
        clipboard: Box::new(HostClipboard(host.clone())),
        prompt: Box::new(HostPrompt(host)),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SceneLayer<'a> {
    layer_id: &'a str,
    features: Vec<SceneFeature<'a>>,
}

#[derive(Serialize)]
struct SceneFeature<'a> {
    feature: &'a Feature,
    style: FeatureStyle,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenePreview<'a> {
    mode: DrawMode,
    positions: &'a [Position],
    style: FeatureStyle,
    fill_opacity: f64,
}

struct HostWidget(MapHost);

impl MapWidget for HostWidget {
    fn render(&mut self, layers: &[RenderLayer<'_>], style: &StyleFn<'_>) {
        let scene: Vec<SceneLayer<'_>> = layers
            .iter()
            .map(|l| SceneLayer {
                layer_id: l.layer_id,
                features: l
                    .collection
                    .features
                    .iter()
                    .map(|f| SceneFeature { feature: f, style: style(l.layer_id, f) })
                    .collect(),
            })
            .collect();
        self.0.render(to_js(&scene));
    }

    fn show_preview(&mut self, preview: Option<&Preview>) {
        let js = match preview {
            Some(p) => to_js(&ScenePreview {
                mode: p.mode,
                positions: &p.positions,
                style: PREVIEW_STYLE,
                fill_opacity: PREVIEW_FILL_OPACITY,
            }),
            None => JsValue::NULL,
        };
        self.0.show_preview(js);
    }

    fn set_view(&mut self, center: Position, zoom: f64) {
        self.0.set_view(center.lat, center.lng, zoom);
    }

    fn fit_bounds(&mut self, b: &Bounds) {
        self.0.fit_bounds(b.south, b.west, b.north, b.east);
    }

    fn set_tile_source(&mut self, source: &TileSource) {
        self.0.set_tile_source(to_js(source));
    }
}

struct HostClipboard(MapHost);

impl Clipboard for HostClipboard {
    fn write_text(&mut self, text: &str) {
        self.0.copy_text(text);
        web_sys::console::log_1(&JsValue::from_str(&format!("Copied coordinates: {}", text)));
    }
}

struct HostPrompt(MapHost);

impl UserPrompt for HostPrompt {
    fn request_text(&mut self, prompt: &str) -> Option<String> {
        self.0.prompt(prompt)
    }

    fn request_confirmation(&mut self, prompt: &str) -> bool {
        self.0.confirm(prompt)
    }

    fn alert(&mut self, message: &str) {
        self.0.alert(message);
    }
}

pub struct LocalStorage(web_sys::Storage);

impl LocalStorage {
    pub fn open() -> Option<LocalStorage> {
        web_sys::window()?.local_storage().ok().flatten().map(LocalStorage)
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> geonote::Result<()> {
        self.0
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }
}

/// Local storage when the page has it; otherwise state lives for the page only.
pub fn browser_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Some(s) => Box::new(s),
        None => {
            web_sys::console::warn_1(&JsValue::from_str("localStorage unavailable; changes will not persist"));
            Box::new(MemoryStore::new())
        }
    }
}
