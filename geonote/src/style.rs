use crate::model::{Properties, Validation};
use serde::Serialize;

pub const PENDING_COLOR: &str = "#c72e28ff";
pub const INVALID_COLOR: &str = "#ef4444";
pub const VALID_COLOR: &str = "#10b981";
pub const SELECTED_COLOR: &str = "blue";
pub const SELECTED_WEIGHT: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeatureStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill: bool,
}

/// Stroke style derived from the `validated` property.
pub fn feature_style(props: &Properties) -> FeatureStyle {
    let color = match Validation::of(props) {
        Some(Validation::Invalid) => INVALID_COLOR,
        Some(Validation::Valid) => VALID_COLOR,
        Some(Validation::Pending) | None => PENDING_COLOR,
    };
    FeatureStyle { color, weight: 3.0, opacity: 0.8, fill: false }
}

impl FeatureStyle {
    pub fn highlighted(self) -> FeatureStyle {
        FeatureStyle { color: SELECTED_COLOR, weight: SELECTED_WEIGHT, ..self }
    }
}
