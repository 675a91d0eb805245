use crate::config::{COORD_PRECISION, POINT_ZOOM};
use crate::drawing::DrawingSession;
use crate::error::{Error, Result};
use crate::geometry::bounds::Bounds;
use crate::layers::LayerSet;
use crate::model::{Feature, FeatureId, Geometry, LayerId, MapSettings, Position};
use crate::ports::{Clipboard, MapWidget, RenderLayer, ZoomControl};
use crate::style::{feature_style, FeatureStyle};
use crate::tiles::tile_source;

/// A click reported by the widget. A click on a rendered feature arrives
/// only as [`MapClick::Feature`], never also as a base-map click.
#[derive(Clone, Debug, PartialEq)]
pub enum MapClick {
    BaseMap { lat: f64, lng: f64 },
    Feature { layer_id: LayerId, feature_id: FeatureId },
}

/// What the controller should do in response to a click.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickAction {
    /// Coordinate text was sent to the clipboard.
    Copied(String),
    AddVertex(Position),
    Edit { layer_id: LayerId, feature_id: FeatureId },
    Ignored,
}

/// `"lat, lng"` with fixed precision, as copied to the clipboard.
pub fn format_coordinate(lat: f64, lng: f64) -> String {
    format!("{:.*}, {:.*}", COORD_PRECISION, lat, COORD_PRECISION, lng)
}

/// Validation color, overridden by the highlight for the selected feature.
pub fn style_with_selection<'a>(selected: Option<(&'a str, &'a str)>) -> impl Fn(&str, &Feature) -> FeatureStyle + 'a {
    move |layer_id: &str, feature: &Feature| {
        let base = feature_style(&feature.properties);
        match (selected, feature.id()) {
            (Some((sel_layer, sel_id)), Some(id)) if sel_layer == layer_id && sel_id == id => base.highlighted(),
            _ => base,
        }
    }
}

/// Bridges layer state to the external map widget.
pub struct MapViewAdapter {
    widget: Box<dyn MapWidget>,
    clipboard: Box<dyn Clipboard>,
}

impl MapViewAdapter {
    pub fn new(widget: Box<dyn MapWidget>, clipboard: Box<dyn Clipboard>) -> Self {
        MapViewAdapter { widget, clipboard }
    }

    /// Push the visible layers. Nothing is rendered while annotations are hidden.
    pub fn sync(&mut self, layers: &LayerSet, settings: &MapSettings, selected: Option<(&str, &str)>) {
        let visible: Vec<RenderLayer<'_>> = if settings.show_annotations {
            layers
                .iter()
                .filter(|l| l.visible)
                .map(|l| RenderLayer { layer_id: &l.id, collection: &l.features })
                .collect()
        } else {
            Vec::new()
        };
        tracing::debug!(layers = visible.len(), "render");
        let style = style_with_selection(selected);
        self.widget.render(&visible, &style);
    }

    pub fn sync_preview(&mut self, session: &DrawingSession) {
        self.widget.show_preview(session.preview().as_ref());
    }

    /// Push the tile source and viewport from settings.
    pub fn apply_settings(&mut self, settings: &MapSettings) {
        self.widget.set_tile_source(&tile_source(settings.base_layer));
        let [lat, lng] = settings.center;
        self.widget.set_view(Position::new(lat, lng), settings.zoom);
    }

    pub fn set_base_layer(&mut self, settings: &MapSettings) {
        self.widget.set_tile_source(&tile_source(settings.base_layer));
    }

    pub fn copy_coordinate(&mut self, lat: f64, lng: f64) -> String {
        let text = format_coordinate(lat, lng);
        self.clipboard.write_text(&text);
        text
    }

    /// Route a click: base-map clicks feed the drawing session when one is
    /// active and copy the coordinate otherwise; feature clicks open the
    /// feature for editing (Point features also copy their coordinate).
    pub fn handle_click(&mut self, click: MapClick, layers: &LayerSet, drawing: &DrawingSession) -> Result<ClickAction> {
        match click {
            MapClick::BaseMap { lat, lng } if !(lat.is_finite() && lng.is_finite()) => {
                Err(Error::Validation("Invalid coordinates".to_string()))
            }
            MapClick::BaseMap { lat, lng } => {
                if drawing.is_active() {
                    Ok(ClickAction::AddVertex(Position::new(lat, lng)))
                } else {
                    Ok(ClickAction::Copied(self.copy_coordinate(lat, lng)))
                }
            }
            MapClick::Feature { layer_id, feature_id } => {
                let Some(feature) = layers.find_feature(&layer_id, &feature_id) else {
                    tracing::warn!(layer = %layer_id, feature = %feature_id, "click on unknown feature");
                    return Ok(ClickAction::Ignored);
                };
                if let Geometry::Point(p) = &feature.geometry {
                    self.copy_coordinate(p.lat, p.lng);
                }
                Ok(ClickAction::Edit { layer_id, feature_id })
            }
        }
    }
}

impl ZoomControl for MapViewAdapter {
    fn zoom_to_point(&mut self, lat: f64, lng: f64) {
        self.widget.set_view(Position::new(lat, lng), POINT_ZOOM);
    }

    fn zoom_to_bounds(&mut self, bounds: Option<Bounds>) -> bool {
        match bounds {
            None => false,
            Some(b) if b.is_degenerate() => {
                self.zoom_to_point(b.south, b.west);
                true
            }
            Some(b) => {
                self.widget.fit_bounds(&b);
                true
            }
        }
    }
}
