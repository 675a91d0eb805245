//! In-progress point/line/polygon drawing.
//!
//! The session only accumulates vertices. Finalizing hands back a [`Draft`]
//! which the caller names and stores, so the session never touches layers.

use crate::error::{Error, Result};
use crate::ids::{generate_id, now_millis};
use crate::model::{Feature, Geometry, LayerId, Position, Properties, Validation};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    Point,
    Line,
    Polygon,
}

impl DrawMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DrawMode::Point => "point",
            DrawMode::Line => "line",
            DrawMode::Polygon => "polygon",
        }
    }

    pub fn parse(s: &str) -> Option<DrawMode> {
        match s {
            "point" => Some(DrawMode::Point),
            "line" => Some(DrawMode::Line),
            "polygon" => Some(DrawMode::Polygon),
            _ => None,
        }
    }

    fn min_vertices(self) -> usize {
        match self {
            DrawMode::Point => 1,
            DrawMode::Line | DrawMode::Polygon => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum DrawingSession {
    #[default]
    Idle,
    Active {
        mode: DrawMode,
        vertices: Vec<Position>,
        target: LayerId,
    },
}

/// A finalized shape waiting for a name and a home layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Draft {
    pub mode: DrawMode,
    pub geometry: Geometry,
    pub target: LayerId,
}

impl Draft {
    pub fn name_prompt(&self) -> String {
        format!("Enter a name for this {}:", self.mode.as_str())
    }

    pub fn default_name(&self) -> String {
        match self.mode {
            DrawMode::Point => format!("Point {}", now_millis()),
            mode => format!("{} {}", mode.as_str(), now_millis()),
        }
    }

    /// Build the feature with a fresh id and pending status. A blank or
    /// missing name falls back to [`Draft::default_name`].
    pub fn into_feature(self, name: Option<String>) -> Feature {
        let name = name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| self.default_name());
        let mut props = Properties::new();
        props.insert("id".to_string(), Value::String(generate_id()));
        props.insert("name".to_string(), Value::String(name));
        props.insert("validated".to_string(), Value::String(Validation::Pending.as_str().to_string()));
        Feature::new(self.geometry, props)
    }
}

/// Shape drawn while a line or polygon is being built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Preview {
    pub mode: DrawMode,
    pub positions: Vec<Position>,
}

impl DrawingSession {
    /// Begin a session, replacing any session already in progress.
    pub fn start(&mut self, mode: DrawMode, target: Option<&str>) -> Result<()> {
        let target = target.ok_or(Error::NoActiveLayer)?;
        if let DrawingSession::Active { vertices, .. } = self {
            tracing::debug!(discarded = vertices.len(), "drawing session replaced");
        }
        *self = DrawingSession::Active { mode, vertices: Vec::new(), target: target.to_string() };
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DrawingSession::Active { .. })
    }

    pub fn mode(&self) -> Option<DrawMode> {
        match self {
            DrawingSession::Active { mode, .. } => Some(*mode),
            DrawingSession::Idle => None,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            DrawingSession::Active { target, .. } => Some(target),
            DrawingSession::Idle => None,
        }
    }

    pub fn vertices(&self) -> &[Position] {
        match self {
            DrawingSession::Active { vertices, .. } => vertices,
            DrawingSession::Idle => &[],
        }
    }

    /// True while unfinalized vertices are pending.
    pub fn has_pending_vertices(&self) -> bool {
        !self.vertices().is_empty()
    }

    pub fn can_finish(&self) -> bool {
        match self {
            DrawingSession::Active { mode, vertices, .. } => {
                *mode != DrawMode::Point && vertices.len() >= mode.min_vertices()
            }
            DrawingSession::Idle => false,
        }
    }

    /// Append a vertex. In point mode the click finalizes immediately.
    pub fn add_vertex(&mut self, p: Position) -> Option<Draft> {
        match self {
            DrawingSession::Idle => None,
            DrawingSession::Active { mode: DrawMode::Point, target, .. } => {
                let draft = Draft { mode: DrawMode::Point, geometry: Geometry::Point(p), target: std::mem::take(target) };
                *self = DrawingSession::Idle;
                Some(draft)
            }
            DrawingSession::Active { vertices, .. } => {
                vertices.push(p);
                None
            }
        }
    }

    /// Drop the most recent vertex; false when there was none.
    pub fn remove_last_vertex(&mut self) -> bool {
        match self {
            DrawingSession::Active { vertices, .. } => vertices.pop().is_some(),
            DrawingSession::Idle => false,
        }
    }

    /// Discard the session; false when already idle.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        *self = DrawingSession::Idle;
        was_active
    }

    /// Finalize a line or polygon. Below two vertices nothing happens and the
    /// session stays active.
    pub fn finish(&mut self) -> Option<Draft> {
        if !self.can_finish() {
            return None;
        }
        let DrawingSession::Active { mode, vertices, target } = std::mem::take(self) else {
            return None;
        };
        let geometry = match mode {
            DrawMode::Line => Geometry::LineString(vertices),
            DrawMode::Polygon => Geometry::Polygon(vec![close_ring(vertices)]),
            DrawMode::Point => Geometry::Point(*vertices.first()?),
        };
        Some(Draft { mode, geometry, target })
    }

    pub fn preview(&self) -> Option<Preview> {
        match self {
            DrawingSession::Active { mode, vertices, .. } if *mode != DrawMode::Point && vertices.len() > 1 => {
                Some(Preview { mode: *mode, positions: vertices.clone() })
            }
            _ => None,
        }
    }
}

fn close_ring(mut ring: Vec<Position>) -> Vec<Position> {
    if let Some(&first) = ring.first() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lng: f64) -> Position {
        Position::new(lat, lng)
    }

    #[test]
    fn start_requires_target() {
        let mut s = DrawingSession::default();
        assert_eq!(s.start(DrawMode::Line, None), Err(Error::NoActiveLayer));
        assert!(!s.is_active());
    }

    #[test]
    fn line_finishes_in_lng_lat_order() {
        let mut s = DrawingSession::default();
        s.start(DrawMode::Line, Some("l")).unwrap();
        for v in [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)] {
            assert!(s.add_vertex(v).is_none());
        }
        let draft = s.finish().unwrap();
        assert!(!s.is_active());
        let f = draft.into_feature(None);
        let v = serde_json::to_value(&f.geometry).unwrap();
        assert_eq!(v["coordinates"], serde_json::json!([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]));
        assert_eq!(f.properties["validated"], "1");
        assert!(f.name().unwrap().starts_with("line "));
    }

    #[test]
    fn finish_below_threshold_keeps_session() {
        let mut s = DrawingSession::default();
        s.start(DrawMode::Polygon, Some("l")).unwrap();
        s.add_vertex(p(0.0, 0.0));
        assert!(s.finish().is_none());
        assert!(s.is_active());
        assert_eq!(s.vertices().len(), 1);
        assert!(s.preview().is_none());
    }

    #[test]
    fn polygon_ring_is_closed() {
        let mut s = DrawingSession::default();
        s.start(DrawMode::Polygon, Some("l")).unwrap();
        for v in [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)] {
            s.add_vertex(v);
        }
        assert_eq!(s.preview().unwrap().positions.len(), 3);
        let Geometry::Polygon(rings) = s.finish().unwrap().geometry else { panic!("expected polygon") };
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0].first(), rings[0].last());
    }

    #[test]
    fn point_finalizes_on_first_click() {
        let mut s = DrawingSession::default();
        s.start(DrawMode::Point, Some("l")).unwrap();
        let draft = s.add_vertex(p(5.0, 6.0)).unwrap();
        assert_eq!(draft.target, "l");
        assert!(!s.is_active());
        let f = draft.into_feature(Some("Well".to_string()));
        assert_eq!(f.name(), Some("Well"));
    }

    #[test]
    fn undo_cancel_and_restart() {
        let mut s = DrawingSession::default();
        s.start(DrawMode::Line, Some("a")).unwrap();
        s.add_vertex(p(0.0, 0.0));
        s.add_vertex(p(1.0, 1.0));
        assert!(s.remove_last_vertex());
        assert_eq!(s.vertices().len(), 1);
        // restarting never merges vertex sets
        s.start(DrawMode::Line, Some("b")).unwrap();
        assert!(s.vertices().is_empty());
        assert_eq!(s.target(), Some("b"));
        assert!(!s.remove_last_vertex());
        assert!(s.cancel());
        assert!(!s.cancel());
        assert!(s.add_vertex(p(0.0, 0.0)).is_none());
    }

    #[test]
    fn blank_name_uses_default() {
        let d = Draft { mode: DrawMode::Point, geometry: Geometry::Point(p(0.0, 0.0)), target: "l".into() };
        assert_eq!(d.name_prompt(), "Enter a name for this point:");
        let f = d.into_feature(Some("  ".to_string()));
        assert!(f.name().unwrap().starts_with("Point "));
    }
}
