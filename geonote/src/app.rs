use crate::config::EXPORT_ALL_NAME;
use crate::drawing::{DrawMode, DrawingSession};
use crate::error::{Error, Result};
use crate::geometry::bounds::{compute_bounds, feature_bounds};
use crate::geometry::limits;
use crate::layers::{self, LayerSet};
use crate::model::{BaseLayer, EditingFeature, Feature, FeatureId, LayerId, MapSettings};
use crate::panel::{EditingPanel, LayerControls, LayerRow};
use crate::ports::{Clipboard, MapWidget, UserPrompt, ZoomControl};
use crate::store::{KeyValueStore, StateStore};
use crate::view::{ClickAction, MapClick, MapViewAdapter};

/// Everything the controller talks to outside the process.
pub struct Ports {
    pub store: Box<dyn KeyValueStore>,
    pub widget: Box<dyn MapWidget>,
    pub clipboard: Box<dyn Clipboard>,
    pub prompt: Box<dyn UserPrompt>,
}

/// A file ready to be offered for download.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

/// Keys the controller reacts to while drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Escape,
}

impl Key {
    pub fn parse(s: &str) -> Option<Key> {
        match s {
            "Backspace" => Some(Key::Backspace),
            "Delete" => Some(Key::Delete),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Application state owned by a single controller. Every user event maps to
/// one method; each method persists and re-renders before returning.
pub struct App {
    layers: LayerSet,
    settings: MapSettings,
    active_layer: Option<LayerId>,
    selected: Option<(LayerId, FeatureId)>,
    drawing: DrawingSession,
    panel: EditingPanel,
    store: StateStore,
    view: MapViewAdapter,
    prompt: Box<dyn UserPrompt>,
}

impl App {
    /// Load persisted state and push the initial view.
    pub fn new(ports: Ports) -> App {
        let store = StateStore::new(ports.store);
        let layers = store.load_layers();
        let settings = store.load_settings();
        tracing::info!(layers = layers.len(), "state loaded");
        let mut app = App {
            layers,
            settings,
            active_layer: None,
            selected: None,
            drawing: DrawingSession::Idle,
            panel: EditingPanel::default(),
            store,
            view: MapViewAdapter::new(ports.widget, ports.clipboard),
            prompt: ports.prompt,
        };
        app.view.apply_settings(&app.settings);
        app.render();
        app
    }

    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn active_layer(&self) -> Option<&str> {
        self.active_layer.as_deref()
    }

    pub fn selected_feature(&self) -> Option<(&str, &str)> {
        self.selected.as_ref().map(|(l, f)| (l.as_str(), f.as_str()))
    }

    pub fn drawing(&self) -> &DrawingSession {
        &self.drawing
    }

    pub fn editing(&self) -> Option<&EditingFeature> {
        self.panel.editing()
    }

    /// The open edit form, for field updates before [`App::save_edit`].
    pub fn editing_mut(&mut self) -> Option<&mut EditingFeature> {
        self.panel.editing_mut()
    }

    pub fn layer_rows(&self) -> Vec<LayerRow> {
        self.panel.rows(&self.layers, self.active_layer(), self.selected_feature())
    }

    // --- layers ---

    /// Ask for a name and create a layer. A cancelled prompt creates nothing.
    pub fn create_layer_prompted(&mut self) -> Result<Option<LayerId>> {
        match self.prompt.request_text("Enter layer name:") {
            None => Ok(None),
            Some(name) => self.create_layer(&name).map(Some),
        }
    }

    pub fn create_layer(&mut self, name: &str) -> Result<LayerId> {
        let created = layers::create_layer(name);
        let layer = self.report(created)?;
        self.adopt_layer(layer)
    }

    /// Import GeoJSON text as a new layer named after the file.
    pub fn import_layer(&mut self, raw: &str, file_name: &str) -> Result<LayerId> {
        let imported = layers::import_layer(raw, file_name);
        let layer = self.report(imported)?;
        self.adopt_layer(layer)
    }

    fn adopt_layer(&mut self, layer: crate::model::Layer) -> Result<LayerId> {
        let id = layer.id.clone();
        self.layers.insert(layer)?;
        self.active_layer = Some(id.clone());
        self.commit_layers();
        Ok(id)
    }

    pub fn toggle_layer(&mut self, id: &str) -> Result<bool> {
        let toggled = self.layers.toggle_visibility(id);
        let visible = self.report(toggled)?;
        self.commit_layers();
        Ok(visible)
    }

    pub fn rename_layer(&mut self, id: &str, name: &str) -> Result<()> {
        let renamed = self.layers.rename_layer(id, name);
        self.report(renamed)?;
        self.commit_layers();
        Ok(())
    }

    /// Remove a layer after confirmation. Returns false when declined.
    pub fn remove_layer(&mut self, id: &str) -> Result<bool> {
        let controls = self.controls(id);
        let controls = self.report(controls)?;
        if !controls.remove {
            return self.report(Err(Error::ProtectedLayer(id.to_string())));
        }
        if !self.prompt.request_confirmation("Are you sure you want to delete this layer?") {
            return Ok(false);
        }
        let removed = self.layers.remove_layer(id);
        self.report(removed)?;
        if self.active_layer() == Some(id) {
            self.active_layer = None;
        }
        if self.selected_feature().is_some_and(|(l, _)| l == id) {
            self.selected = None;
        }
        if self.drawing.target() == Some(id) {
            self.drawing.cancel();
            self.view.sync_preview(&self.drawing);
        }
        self.panel.forget_layer(id);
        self.commit_layers();
        Ok(true)
    }

    pub fn set_active_layer(&mut self, id: &str) -> Result<()> {
        let controls = self.controls(id);
        let controls = self.report(controls)?;
        if !controls.activate {
            return self.report(Err(Error::ProtectedLayer(id.to_string())));
        }
        self.active_layer = Some(id.to_string());
        Ok(())
    }

    pub fn toggle_layer_expanded(&mut self, id: &str) -> bool {
        self.panel.toggle_expanded(id)
    }

    fn controls(&self, id: &str) -> Result<LayerControls> {
        self.layers
            .get(id)
            .map(LayerControls::for_layer)
            .ok_or_else(|| Error::layer_not_found(id))
    }

    // --- features ---

    pub fn add_feature(&mut self, layer_id: &str, feature: Feature) -> Result<FeatureId> {
        let bounds = feature_bounds(&feature);
        let added = self.layers.add_feature(layer_id, feature);
        let id = self.report(added)?;
        self.commit_layers();
        self.view.zoom_to_bounds(bounds);
        Ok(id)
    }

    /// Open a feature in the edit form.
    pub fn open_feature(&mut self, layer_id: &str, feature_id: &str) -> Result<()> {
        let feature = self
            .layers
            .find_feature(layer_id, feature_id)
            .ok_or_else(|| Error::feature_not_found(feature_id))?;
        self.panel.open(EditingFeature {
            layer_id: layer_id.to_string(),
            feature_id: feature_id.to_string(),
            properties: feature.properties.clone(),
        });
        Ok(())
    }

    /// Panel selection: toggles the highlight, opens the form and zooms.
    pub fn select_feature(&mut self, layer_id: &str, feature_id: &str) -> Result<()> {
        self.open_feature(layer_id, feature_id)?;
        if self.controls(layer_id)?.activate {
            self.active_layer = Some(layer_id.to_string());
        }
        self.selected = if self.selected_feature() == Some((layer_id, feature_id)) {
            None
        } else {
            Some((layer_id.to_string(), feature_id.to_string()))
        };
        self.render();
        self.zoom_to_feature(layer_id, feature_id);
        Ok(())
    }

    /// Write the form back and close it. False when nothing was open or the
    /// feature is gone.
    pub fn save_edit(&mut self) -> bool {
        let Some(editing) = self.panel.close() else {
            return false;
        };
        let updated = self
            .layers
            .update_feature_properties(&editing.layer_id, &editing.feature_id, &editing.patch());
        if updated {
            self.commit_layers();
        }
        updated
    }

    pub fn cancel_edit(&mut self) {
        self.panel.close();
    }

    pub fn delete_feature(&mut self, layer_id: &str, feature_id: &str) -> Result<bool> {
        if let Some(controls) = self.layers.get(layer_id).map(LayerControls::for_layer) {
            if !controls.delete_features {
                return self.report(Err(Error::ProtectedLayer(layer_id.to_string())));
            }
        }
        let removed = self.layers.delete_feature(layer_id, feature_id);
        if removed {
            if self.panel.is_editing(layer_id, Some(feature_id)) {
                self.panel.close();
            }
            if self.selected_feature() == Some((layer_id, feature_id)) {
                self.selected = None;
            }
            self.commit_layers();
        }
        Ok(removed)
    }

    // --- export ---

    pub fn export_layer(&self, id: &str) -> Result<ExportFile> {
        let layer = self.layers.get(id).ok_or_else(|| Error::layer_not_found(id))?;
        let fc = layers::export_collection([layer]);
        tracing::info!(layer = id, features = fc.len(), "export layer");
        Ok(ExportFile {
            file_name: format!("{}.geojson", layer.name),
            contents: crate::geojson::to_pretty_string(&fc)?,
        })
    }

    pub fn export_all(&self) -> Result<ExportFile> {
        let fc = self.layers.export_all();
        tracing::info!(features = fc.len(), "export all layers");
        Ok(ExportFile {
            file_name: format!("{}.geojson", EXPORT_ALL_NAME),
            contents: crate::geojson::to_pretty_string(&fc)?,
        })
    }

    // --- drawing ---

    pub fn start_drawing(&mut self, mode: DrawMode) -> Result<()> {
        let target = self.active_layer.clone();
        let started = self.drawing.start(mode, target.as_deref());
        self.report(started)?;
        self.view.sync_preview(&self.drawing);
        Ok(())
    }

    /// Mode-button behavior: pressing the current mode again stops drawing.
    pub fn toggle_drawing_mode(&mut self, mode: DrawMode) -> Result<Option<DrawMode>> {
        if self.drawing.mode() == Some(mode) {
            self.cancel_drawing();
            return Ok(None);
        }
        self.start_drawing(mode)?;
        Ok(Some(mode))
    }

    /// Finalize a line/polygon. `Ok(None)` when there are too few vertices.
    pub fn finish_drawing(&mut self) -> Result<Option<FeatureId>> {
        let Some(draft) = self.drawing.finish() else {
            return Ok(None);
        };
        self.view.sync_preview(&self.drawing);
        let name = self.prompt.request_text(&draft.name_prompt());
        let target = draft.target.clone();
        self.add_feature(&target, draft.into_feature(name)).map(Some)
    }

    pub fn undo_vertex(&mut self) -> bool {
        let removed = self.drawing.remove_last_vertex();
        self.view.sync_preview(&self.drawing);
        removed
    }

    pub fn cancel_drawing(&mut self) -> bool {
        let cancelled = self.drawing.cancel();
        self.view.sync_preview(&self.drawing);
        cancelled
    }

    /// Keyboard shortcuts while drawing; returns whether the key was used.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.drawing.is_active() {
            return false;
        }
        match key {
            Key::Backspace | Key::Delete => self.undo_vertex(),
            Key::Escape => self.cancel_drawing(),
        }
    }

    // --- map ---

    /// Handle one click from the widget. Point-mode clicks create a feature
    /// right away and return its id.
    pub fn map_click(&mut self, click: MapClick) -> Result<ClickAction> {
        let clicked = self.view.handle_click(click, &self.layers, &self.drawing);
        let action = self.report(clicked)?;
        match &action {
            ClickAction::AddVertex(p) => {
                if let Some(draft) = self.drawing.add_vertex(*p) {
                    let name = self.prompt.request_text(&draft.name_prompt());
                    let target = draft.target.clone();
                    self.add_feature(&target, draft.into_feature(name))?;
                }
                self.view.sync_preview(&self.drawing);
            }
            ClickAction::Edit { layer_id, feature_id } => {
                self.open_feature(layer_id, feature_id)?;
            }
            ClickAction::Copied(text) => tracing::debug!(%text, "coordinate copied"),
            ClickAction::Ignored => {}
        }
        Ok(action)
    }

    pub fn zoom_to_layer(&mut self, id: &str) -> bool {
        let bounds = self.layers.get(id).and_then(|l| compute_bounds(&l.features));
        self.view.zoom_to_bounds(bounds)
    }

    pub fn zoom_to_feature(&mut self, layer_id: &str, feature_id: &str) -> bool {
        let bounds = self.layers.find_feature(layer_id, feature_id).and_then(feature_bounds);
        self.view.zoom_to_bounds(bounds)
    }

    /// Zoom to typed-in coordinates.
    pub fn zoom_to_coordinates(&mut self, lat: &str, lng: &str) -> Result<()> {
        let parsed = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>());
        let (lat, lng) = match parsed {
            (Ok(lat), Ok(lng)) if limits::in_lat_bounds(lat) && limits::in_lng_bounds(lng) => (lat, lng),
            _ => return self.report(Err(Error::Validation("Please enter valid coordinates".to_string()))),
        };
        self.view.zoom_to_point(lat, lng);
        Ok(())
    }

    pub fn set_base_layer(&mut self, base: BaseLayer) {
        self.settings.base_layer = base;
        self.view.set_base_layer(&self.settings);
        self.commit_settings();
    }

    pub fn set_show_annotations(&mut self, show: bool) {
        self.settings.show_annotations = show;
        self.commit_settings();
        self.render();
    }

    /// Record the viewport after the user pans or zooms.
    pub fn record_view(&mut self, lat: f64, lng: f64, zoom: f64) {
        if !(lat.is_finite() && lng.is_finite() && zoom.is_finite()) {
            tracing::warn!(lat, lng, zoom, "ignoring non-finite view");
            return;
        }
        self.settings.center = [lat, lng];
        self.settings.zoom = zoom;
        self.commit_settings();
    }

    // --- plumbing ---

    fn render(&mut self) {
        let selected = self.selected.as_ref().map(|(l, f)| (l.as_str(), f.as_str()));
        self.view.sync(&self.layers, &self.settings, selected);
    }

    fn commit_layers(&mut self) {
        if let Err(e) = self.store.save_layers(&self.layers) {
            tracing::warn!(error = %e, "failed to persist layers");
        }
        self.render();
    }

    fn commit_settings(&mut self) {
        if let Err(e) = self.store.save_settings(&self.settings) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
    }

    /// Surface input and parse failures in a dialog; log the rest.
    fn report<T>(&mut self, r: Result<T>) -> Result<T> {
        if let Err(e) = &r {
            if e.is_user_facing() {
                self.prompt.alert(&e.to_string());
            } else {
                tracing::warn!(code = e.code(), error = %e, "command rejected");
            }
        }
        r
    }
}
