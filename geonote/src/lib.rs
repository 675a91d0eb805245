pub mod model;
pub mod error;
pub mod config;
pub mod ids;
pub mod properties;
pub mod style;
pub mod geometry {
    pub mod bounds;
    pub mod limits;
}
pub mod geojson;
pub mod layers;
pub mod drawing;
pub mod store;
pub mod tiles;
pub mod ports;
pub mod view;
pub mod panel;
mod app;

pub use app::{App, ExportFile, Key, Ports};
pub use drawing::{DrawMode, Draft, DrawingSession, Preview};
pub use error::{Error, Result};
pub use geometry::bounds::{compute_bounds, feature_bounds, Bounds};
pub use ids::generate_id;
pub use layers::{create_layer, export_collection, import_layer, LayerSet};
pub use model::{
    BaseLayer, EditingFeature, Feature, FeatureCollection, FeatureId, Geometry, Layer, LayerId,
    MapSettings, Position, Properties, Validation,
};
pub use properties::sanitize_properties;
pub use style::{feature_style, FeatureStyle};
pub use view::{ClickAction, MapClick};
