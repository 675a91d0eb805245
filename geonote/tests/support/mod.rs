#![allow(dead_code)]

use geonote::drawing::Preview;
use geonote::ports::{Clipboard, MapWidget, RenderLayer, StyleFn, UserPrompt};
use geonote::store::{KeyValueStore, MemoryStore};
use geonote::tiles::TileSource;
use geonote::{App, Bounds, Error, FeatureStyle, Ports, Position};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Snapshot of one `render` call: `(layer id, feature id, style)` per feature.
pub type Frame = Vec<(String, String, FeatureStyle)>;

#[derive(Default)]
pub struct WidgetLog {
    pub frames: Vec<Frame>,
    pub previews: Vec<Option<Preview>>,
    pub views: Vec<(Position, f64)>,
    pub fits: Vec<Bounds>,
    pub tiles: Vec<TileSource>,
}

impl WidgetLog {
    pub fn last_frame(&self) -> &Frame {
        self.frames.last().expect("at least one render")
    }
}

#[derive(Clone, Default)]
pub struct RecordingWidget(pub Rc<RefCell<WidgetLog>>);

impl MapWidget for RecordingWidget {
    fn render(&mut self, layers: &[RenderLayer<'_>], style: &StyleFn<'_>) {
        let frame = layers
            .iter()
            .flat_map(|l| {
                l.collection.features.iter().map(move |f| {
                    (l.layer_id.to_string(), f.id().unwrap_or_default().to_string(), style(l.layer_id, f))
                })
            })
            .collect();
        self.0.borrow_mut().frames.push(frame);
    }

    fn show_preview(&mut self, preview: Option<&Preview>) {
        self.0.borrow_mut().previews.push(preview.cloned());
    }

    fn set_view(&mut self, center: Position, zoom: f64) {
        self.0.borrow_mut().views.push((center, zoom));
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        self.0.borrow_mut().fits.push(*bounds);
    }

    fn set_tile_source(&mut self, source: &TileSource) {
        self.0.borrow_mut().tiles.push(*source);
    }
}

#[derive(Clone, Default)]
pub struct RecordingClipboard(pub Rc<RefCell<Vec<String>>>);

impl Clipboard for RecordingClipboard {
    fn write_text(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

#[derive(Default)]
pub struct PromptScript {
    pub texts: VecDeque<Option<String>>,
    pub confirmations: VecDeque<bool>,
    pub asked: Vec<String>,
    pub alerts: Vec<String>,
}

/// Answers prompts from a queue; an empty queue means "cancel".
#[derive(Clone, Default)]
pub struct ScriptedPrompt(pub Rc<RefCell<PromptScript>>);

impl ScriptedPrompt {
    pub fn answer(&self, text: Option<&str>) {
        self.0.borrow_mut().texts.push_back(text.map(str::to_string));
    }

    pub fn confirm(&self, yes: bool) {
        self.0.borrow_mut().confirmations.push_back(yes);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.0.borrow().alerts.clone()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn request_text(&mut self, prompt: &str) -> Option<String> {
        let mut s = self.0.borrow_mut();
        s.asked.push(prompt.to_string());
        s.texts.pop_front().flatten()
    }

    fn request_confirmation(&mut self, prompt: &str) -> bool {
        let mut s = self.0.borrow_mut();
        s.asked.push(prompt.to_string());
        s.confirmations.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.0.borrow_mut().alerts.push(message.to_string());
    }
}

/// Backend whose writes always fail, as with a full quota.
#[derive(Clone, Default)]
pub struct FullStore;

impl KeyValueStore for FullStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) -> geonote::Result<()> {
        Err(Error::Storage("quota exceeded".into()))
    }
}

pub struct Harness {
    pub app: App,
    pub store: MemoryStore,
    pub widget: RecordingWidget,
    pub clipboard: RecordingClipboard,
    pub prompt: ScriptedPrompt,
}

impl Harness {
    pub fn new() -> Harness {
        Harness::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Harness {
        let mut h = Harness::with_backend(Box::new(store.clone()));
        h.store = store;
        h
    }

    pub fn with_backend(backend: Box<dyn KeyValueStore>) -> Harness {
        let widget = RecordingWidget::default();
        let clipboard = RecordingClipboard::default();
        let prompt = ScriptedPrompt::default();
        let app = App::new(Ports {
            store: backend,
            widget: Box::new(widget.clone()),
            clipboard: Box::new(clipboard.clone()),
            prompt: Box::new(prompt.clone()),
        });
        Harness { app, store: MemoryStore::new(), widget, clipboard, prompt }
    }

    /// Restart on the same storage.
    pub fn reload(&self) -> Harness {
        Harness::with_store(self.store.clone())
    }
}

pub const SAMPLE: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-96.57, 32.91]}, "properties": {"id": "a", "name": "Tower", "tags": ["x", "y"]}},
    {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[-96.5, 32.9], [-96.4, 33.0]]}, "properties": {"name": "Fence"}},
    {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[-96.6, 32.8], [-96.5, 32.8], [-96.5, 32.7], [-96.6, 32.8]]]}, "properties": {"id": "a"}}
  ]
}"#;
