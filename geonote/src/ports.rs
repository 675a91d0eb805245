//! Boundaries to the outside world: the map widget, the clipboard and
//! blocking user dialogs. The browser binding implements these; tests use
//! recording fakes.

use crate::drawing::Preview;
use crate::geometry::bounds::Bounds;
use crate::model::{Feature, FeatureCollection, Position};
use crate::style::FeatureStyle;
use crate::tiles::TileSource;

/// One visible layer handed to the widget.
#[derive(Clone, Copy, Debug)]
pub struct RenderLayer<'a> {
    pub layer_id: &'a str,
    pub collection: &'a FeatureCollection,
}

/// Per-feature style callback: `(layer id, feature) -> style`.
pub type StyleFn<'a> = dyn Fn(&str, &Feature) -> FeatureStyle + 'a;

/// The interactive map: tiles, projection, pan/zoom and feature drawing.
pub trait MapWidget {
    /// Replace every rendered feature layer.
    fn render(&mut self, layers: &[RenderLayer<'_>], style: &StyleFn<'_>);
    /// Show or clear the in-progress drawing shape.
    fn show_preview(&mut self, preview: Option<&Preview>);
    fn set_view(&mut self, center: Position, zoom: f64);
    fn fit_bounds(&mut self, bounds: &Bounds);
    fn set_tile_source(&mut self, source: &TileSource);
}

/// Fire-and-forget clipboard writes.
pub trait Clipboard {
    fn write_text(&mut self, text: &str);
}

/// Blocking prompt/confirm/alert dialogs.
pub trait UserPrompt {
    fn request_text(&mut self, prompt: &str) -> Option<String>;
    fn request_confirmation(&mut self, prompt: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Zoom actions offered to the panel and other collaborators.
pub trait ZoomControl {
    fn zoom_to_point(&mut self, lat: f64, lng: f64);
    /// Fit the given box; `None` (nothing to fit) is a no-op. Returns
    /// whether the view moved.
    fn zoom_to_bounds(&mut self, bounds: Option<Bounds>) -> bool;
}
