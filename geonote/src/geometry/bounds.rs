use crate::model::{Feature, FeatureCollection, Geometry, Position};
use serde::Serialize;

/// Axis-aligned lat/lng box used for zoom-to-fit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn is_degenerate(&self) -> bool {
        self.south == self.north && self.west == self.east
    }
}

/// Running min/max accumulator; invalid until the first position is added.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundsBuilder {
    acc: Option<Bounds>,
}

impl BoundsBuilder {
    pub fn extend(&mut self, p: &Position) {
        self.acc = Some(match self.acc {
            None => Bounds { south: p.lat, west: p.lng, north: p.lat, east: p.lng },
            Some(b) => Bounds {
                south: b.south.min(p.lat),
                west: b.west.min(p.lng),
                north: b.north.max(p.lat),
                east: b.east.max(p.lng),
            },
        });
    }

    pub fn extend_geometry(&mut self, g: &Geometry) {
        for p in g.footprint() {
            self.extend(p);
        }
    }

    pub fn finish(self) -> Option<Bounds> {
        self.acc
    }
}

/// Bounds of every feature in the collection; `None` when there is nothing to fit.
pub fn compute_bounds(fc: &FeatureCollection) -> Option<Bounds> {
    let mut b = BoundsBuilder::default();
    for f in &fc.features {
        b.extend_geometry(&f.geometry);
    }
    b.finish()
}

pub fn feature_bounds(f: &Feature) -> Option<Bounds> {
    let mut b = BoundsBuilder::default();
    b.extend_geometry(&f.geometry);
    b.finish()
}
