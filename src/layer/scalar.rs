use crate::{
    animation::{driver::Transaction, transition::Transition, value::AnimValue},
    foundation::core::Size,
    layer::{
        Layer,
        core::{BACKGROUND_COLOR, LayerCore},
    },
};

/// Key path of the pillow distortion scalar.
pub const DISTORTION_KEY: &str = "distortion";

/// A layer carrying one custom scalar property that animates like a built-in one.
///
/// Custom scalars have no transition of their own. Inside an animate block the node borrows the
/// block's `backgroundColor` transition, retargets it at its own key, starts it from the
/// in-flight value and clears the end value so the new assignment fills it in.
#[derive(Clone, Debug)]
pub struct AnimatableScalarNode {
    core: LayerCore,
    key: String,
}

impl AnimatableScalarNode {
    pub fn new(bounds: Size) -> Self {
        Self::with_key(bounds, DISTORTION_KEY)
    }

    pub fn with_key(bounds: Size, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut core = LayerCore::new(bounds);
        core.set_model_value(&key, AnimValue::Scalar(0.0));
        Self { core, key }
    }

    /// Copy initializer: model values (the scalar included) without attached transitions.
    pub fn from_layer(other: &Self) -> Self {
        let mut core = LayerCore::new(other.core.bounds());
        for (key, value) in other.core.model_values() {
            core.set_model_value(key, value);
        }
        Self {
            core,
            key: other.key.clone(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Model value of the scalar.
    pub fn get(&self) -> f64 {
        self.core
            .model_value(&self.key)
            .and_then(AnimValue::as_scalar)
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, value: f64, txn: &Transaction) {
        let key = self.key.clone();
        self.set_value(&key, AnimValue::Scalar(value), txn);
    }

    /// In-flight value of the scalar at `now_secs`, if a presentation snapshot exists.
    pub fn presented(&self, now_secs: f64) -> Option<f64> {
        self.core.presentation(now_secs)?.scalar(&self.key)
    }

    pub fn is_animatable_key(&self, key: &str) -> bool {
        key == self.key
    }
}

impl Layer for AnimatableScalarNode {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }

    fn needs_display_for_key(&self, key: &str) -> bool {
        self.is_animatable_key(key)
    }

    fn action_for_key(&mut self, key: &str, txn: &Transaction) -> Option<Transition> {
        if !self.is_animatable_key(key) {
            return self.core.default_action(key, txn);
        }

        let Some(mut transition) = self.core.default_action(BACKGROUND_COLOR, txn) else {
            tracing::debug!(key, "no transition template, redrawing immediately");
            self.core.set_needs_display();
            return None;
        };
        let Some(snapshot) = self.core.presentation(txn.now_secs()) else {
            tracing::debug!(key, "no presentation snapshot, redrawing immediately");
            self.core.set_needs_display();
            return None;
        };

        transition.key_path = key.to_owned();
        transition.from = snapshot.get(key);
        transition.to = None;
        Some(transition)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/scalar.rs"]
mod tests;
