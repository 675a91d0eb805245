// Application-wide constants: storage keys, map defaults and drawing style.

use crate::style::FeatureStyle;

pub const LAYERS_KEY: &str = "geojson-layers";
pub const SETTINGS_KEY: &str = "map-settings";

/// Reserved id of the protected base layer.
pub const PROTECTED_LAYER_ID: &str = "permanent";

/// `[lat, lng]`
pub const DEFAULT_CENTER: [f64; 2] = [32.91, -96.57];
pub const DEFAULT_ZOOM: f64 = 17.0;

/// Zoom level used when jumping to a single coordinate.
pub const POINT_ZOOM: f64 = 18.0;

/// Decimal places used when copying a coordinate.
pub const COORD_PRECISION: usize = 6;

pub const EXPORT_ALL_NAME: &str = "all-layers";

pub const PREVIEW_STYLE: FeatureStyle = FeatureStyle {
    color: "#3b82f6",
    weight: 3.0,
    opacity: 1.0,
    fill: true,
};
pub const PREVIEW_FILL_OPACITY: f64 = 0.2;
