use crate::{
    animation::driver::Transaction,
    foundation::{core::Rect, error::DistortionResult},
    layer::{Layer, scalar::AnimatableScalarNode},
    render::shape::ShapeRenderer,
    view::{Assignment, View},
};

/// View whose visible region is the pillow outline driven by its `distortion` scalar.
#[derive(Clone, Debug)]
pub struct DistortionView {
    id: String,
    frame: Rect,
    node: AnimatableScalarNode,
    renderer: ShapeRenderer,
}

impl DistortionView {
    pub fn new(id: impl Into<String>, frame: Rect) -> Self {
        Self {
            id: id.into(),
            frame,
            node: AnimatableScalarNode::new(frame.size()),
            renderer: ShapeRenderer,
        }
    }

    pub fn node(&self) -> &AnimatableScalarNode {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut AnimatableScalarNode {
        &mut self.node
    }

    /// Model value; see [`AnimatableScalarNode::presented`] for the in-flight one.
    pub fn distortion(&self) -> f64 {
        self.node.get()
    }

    pub fn set_distortion(&mut self, value: f64, txn: &Transaction) {
        self.node.set(value, txn);
    }
}

impl View for DistortionView {
    fn id(&self) -> &str {
        &self.id
    }

    fn frame(&self) -> Rect {
        self.frame
    }

    fn layer(&self) -> &dyn Layer {
        &self.node
    }

    fn layer_mut(&mut self) -> &mut dyn Layer {
        &mut self.node
    }

    fn accepts(&self, assignment: &Assignment) -> DistortionResult<()> {
        super::ensure_finite(&self.id, assignment)
    }

    fn apply(&mut self, assignment: &Assignment, txn: &Transaction) -> DistortionResult<()> {
        self.accepts(assignment)?;
        match *assignment {
            Assignment::BackgroundColor(c) => self.set_background_color(c, txn),
            Assignment::Opacity(o) => self.set_opacity(o, txn),
            Assignment::Distortion(d) => self.set_distortion(d, txn),
        }
        Ok(())
    }

    fn display(&mut self, now_secs: f64) {
        let key = self.node.key().to_owned();
        self.renderer.display(self.node.core_mut(), now_secs, &key);
        self.node.core_mut().mark_displayed();
    }
}
