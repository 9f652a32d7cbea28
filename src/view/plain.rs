use crate::{
    animation::driver::Transaction,
    foundation::{
        core::Rect,
        error::{DistortionError, DistortionResult},
    },
    layer::{BasicLayer, Layer},
    view::{Assignment, View},
};

/// View without custom content: background color and opacity only.
#[derive(Clone, Debug)]
pub struct PlainView {
    id: String,
    frame: Rect,
    layer: BasicLayer,
}

impl PlainView {
    pub fn new(id: impl Into<String>, frame: Rect) -> Self {
        Self {
            id: id.into(),
            frame,
            layer: BasicLayer::new(frame.size()),
        }
    }
}

impl View for PlainView {
    fn id(&self) -> &str {
        &self.id
    }

    fn frame(&self) -> Rect {
        self.frame
    }

    fn layer(&self) -> &dyn Layer {
        &self.layer
    }

    fn layer_mut(&mut self) -> &mut dyn Layer {
        &mut self.layer
    }

    fn accepts(&self, assignment: &Assignment) -> DistortionResult<()> {
        if let Assignment::Distortion(_) = assignment {
            return Err(DistortionError::validation(format!(
                "view '{}' has no distortion property",
                self.id
            )));
        }
        super::ensure_finite(&self.id, assignment)
    }

    fn apply(&mut self, assignment: &Assignment, txn: &Transaction) -> DistortionResult<()> {
        self.accepts(assignment)?;
        match *assignment {
            Assignment::BackgroundColor(c) => self.set_background_color(c, txn),
            Assignment::Opacity(o) => self.set_opacity(o, txn),
            Assignment::Distortion(_) => {}
        }
        Ok(())
    }

    fn display(&mut self, _now_secs: f64) {
        self.layer.core_mut().mark_displayed();
    }
}
