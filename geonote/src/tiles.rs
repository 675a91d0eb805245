use crate::model::BaseLayer;
use serde::Serialize;

const NEARMAP_URL: &str = "https://atlas-preprod.flyziplinedev.com/service?\
SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0&\
LAYER=nearmap&STYLE=default&FORMAT=image/png&\
TILEMATRIXSET=GLOBAL_WEBMERCATOR_HIGH_RES&\
TILEMATRIX={z}&TILEROW={y}&TILECOL={x}";
const ESRI_URL: &str = "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
const OSM_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Raster tile endpoint configuration for one base layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_size: u32,
    pub subdomains: &'static [&'static str],
}

pub fn tile_source(base: BaseLayer) -> TileSource {
    match base {
        BaseLayer::Nearmap => TileSource {
            url_template: NEARMAP_URL,
            attribution: "&copy; Nearmap / Zipline WMTS",
            min_zoom: 1,
            max_zoom: 22,
            tile_size: 256,
            subdomains: &[],
        },
        BaseLayer::Esri => TileSource {
            url_template: ESRI_URL,
            attribution: "&copy; Esri, Maxar, Earthstar Geographics",
            min_zoom: 0,
            max_zoom: 18,
            tile_size: 256,
            subdomains: &[],
        },
        BaseLayer::Osm => TileSource {
            url_template: OSM_URL,
            attribution: "&copy; OpenStreetMap contributors",
            min_zoom: 0,
            max_zoom: 18,
            tile_size: 256,
            subdomains: &["a", "b", "c"],
        },
    }
}
