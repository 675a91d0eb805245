// Centralized ingestion limits to harden against untrusted input (imported GeoJSON)

// Collection size caps
pub const MAX_IMPORT_FEATURES: usize = 200_000;

// Geometry caps
pub const MAX_VERTICES_PER_GEOMETRY: usize = 100_000;
pub const MAX_RINGS_PER_POLYGON: usize = 1_000;

// Numeric bounds
pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;
pub const LNG_MIN: f64 = -180.0;
pub const LNG_MAX: f64 = 180.0;

#[inline]
pub fn in_lat_bounds(lat: f64) -> bool { lat.is_finite() && (LAT_MIN..=LAT_MAX).contains(&lat) }

#[inline]
pub fn in_lng_bounds(lng: f64) -> bool { lng.is_finite() && (LNG_MIN..=LNG_MAX).contains(&lng) }
