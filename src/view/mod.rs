mod distortion;
mod plain;

pub use distortion::DistortionView;
pub use plain::PlainView;

use crate::{
    animation::{driver::Transaction, value::AnimValue},
    foundation::{
        core::{Rect, Rgba8Premul, hex_color},
        error::{DistortionError, DistortionResult},
    },
    layer::{
        Layer,
        core::{BACKGROUND_COLOR, OPACITY},
    },
};

/// A property assignment a view can receive, directly or inside an animate block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    BackgroundColor(#[serde(with = "hex_color")] Rgba8Premul),
    Opacity(f64),
    Distortion(f64),
}

impl Assignment {
    pub fn is_finite(&self) -> bool {
        match *self {
            Self::BackgroundColor(_) => true,
            Self::Opacity(v) | Self::Distortion(v) => v.is_finite(),
        }
    }
}

fn ensure_finite(id: &str, assignment: &Assignment) -> DistortionResult<()> {
    if assignment.is_finite() {
        Ok(())
    } else {
        Err(DistortionError::validation(format!(
            "view '{id}': assigned values must be finite"
        )))
    }
}

/// A positioned view backed by a layer it exclusively owns.
pub trait View {
    fn id(&self) -> &str;

    /// Position and size in stage coordinates.
    fn frame(&self) -> Rect;

    fn layer(&self) -> &dyn Layer;

    fn layer_mut(&mut self) -> &mut dyn Layer;

    /// Checks `assignment` without touching any state. `apply` fails exactly when this does.
    fn accepts(&self, assignment: &Assignment) -> DistortionResult<()>;

    fn apply(&mut self, assignment: &Assignment, txn: &Transaction) -> DistortionResult<()>;

    /// Display-refresh callback: redraw layer content from the presentation state at `now_secs`.
    fn display(&mut self, now_secs: f64);

    fn background_color(&self) -> Rgba8Premul {
        self.layer()
            .core()
            .model_value(BACKGROUND_COLOR)
            .and_then(AnimValue::as_color)
            .unwrap_or_else(Rgba8Premul::transparent)
    }

    fn set_background_color(&mut self, color: Rgba8Premul, txn: &Transaction) {
        self.layer_mut()
            .set_value(BACKGROUND_COLOR, AnimValue::Color(color), txn);
    }

    fn opacity(&self) -> f64 {
        self.layer()
            .core()
            .model_value(OPACITY)
            .and_then(AnimValue::as_scalar)
            .unwrap_or(1.0)
    }

    fn set_opacity(&mut self, opacity: f64, txn: &Transaction) {
        self.layer_mut()
            .set_value(OPACITY, AnimValue::Scalar(opacity), txn);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/view.rs"]
mod tests;
