use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::{
        driver::Transaction,
        transition::{GroupId, Transition},
        value::AnimValue,
    },
    foundation::core::{Rgba8Premul, Size},
    render::shape::ClipMask,
};

/// Key path of the background color. Always animatable inside an animate block.
pub const BACKGROUND_COLOR: &str = "backgroundColor";
/// Key path of the layer opacity. Always animatable inside an animate block.
pub const OPACITY: &str = "opacity";

const ALWAYS_ANIMATABLE: [&str; 2] = [BACKGROUND_COLOR, OPACITY];

/// Read-only view of every property's value at one instant: transitions applied on top of the
/// model values.
#[derive(Clone, Debug, PartialEq)]
pub struct PresentationSnapshot {
    time_secs: f64,
    values: BTreeMap<String, AnimValue>,
}

impl PresentationSnapshot {
    pub fn time_secs(&self) -> f64 {
        self.time_secs
    }

    pub fn get(&self, key: &str) -> Option<AnimValue> {
        self.values.get(key).copied()
    }

    pub fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AnimValue::as_scalar)
    }

    pub fn color(&self, key: &str) -> Option<Rgba8Premul> {
        self.get(key).and_then(AnimValue::as_color)
    }
}

/// State shared by every renderable layer: model values, attached transitions, display
/// requests and the clip mask.
#[derive(Clone, Debug)]
pub struct LayerCore {
    bounds: Size,
    model: BTreeMap<String, AnimValue>,
    animations: BTreeMap<String, Transition>,
    committed: bool,
    needs_display: bool,
    display_requests: u64,
    mask: Option<ClipMask>,
    /// Groups with an interrupted transition, kept until [`Self::take_cancelled`].
    cancelled_groups: BTreeSet<GroupId>,
}

impl LayerCore {
    pub fn new(bounds: Size) -> Self {
        let mut model = BTreeMap::new();
        model.insert(
            BACKGROUND_COLOR.to_owned(),
            AnimValue::Color(Rgba8Premul::transparent()),
        );
        model.insert(OPACITY.to_owned(), AnimValue::Scalar(1.0));
        Self {
            bounds,
            model,
            animations: BTreeMap::new(),
            committed: false,
            needs_display: false,
            display_requests: 0,
            mask: None,
            cancelled_groups: BTreeSet::new(),
        }
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn model_value(&self, key: &str) -> Option<AnimValue> {
        self.model.get(key).copied()
    }

    pub fn model_values(&self) -> impl Iterator<Item = (&str, AnimValue)> {
        self.model.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Raw model write. Goes around action lookup; see [`super::Layer::set_value`].
    pub fn set_model_value(&mut self, key: &str, value: AnimValue) {
        self.model.insert(key.to_owned(), value);
    }

    /// Attach the layer to a render tree. Presentation snapshots exist from here on.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Snapshot of the in-flight values at `now_secs`, or `None` if the layer has never been
    /// committed.
    pub fn presentation(&self, now_secs: f64) -> Option<PresentationSnapshot> {
        if !self.committed {
            return None;
        }
        let values = self
            .model
            .iter()
            .map(|(key, model)| (key.clone(), self.value_at(key, *model, now_secs)))
            .collect();
        Some(PresentationSnapshot {
            time_secs: now_secs,
            values,
        })
    }

    fn value_at(&self, key: &str, model: AnimValue, now_secs: f64) -> AnimValue {
        self.animations
            .get(key)
            .and_then(|tr| tr.value_at(now_secs, model))
            .unwrap_or(model)
    }

    /// Base action lookup: a transition template for the always-animatable keys inside an
    /// animate block, nothing otherwise.
    ///
    /// The start value is the in-flight value of `key` before the assignment lands; the end
    /// value is left unset.
    pub fn default_action(&self, key: &str, txn: &Transaction) -> Option<Transition> {
        if !ALWAYS_ANIMATABLE.contains(&key) {
            return None;
        }
        let mut transition = txn.transition_for(key)?;
        transition.from = self
            .model
            .get(key)
            .map(|model| self.value_at(key, *model, txn.now_secs()));
        Some(transition)
    }

    /// Attach `transition`, replacing (and cancelling) any transition on the same key.
    pub fn add_animation(&mut self, transition: Transition) {
        let key = transition.key_path.clone();
        let group = transition.group;
        if let Some(prev) = self.animations.insert(key, transition) {
            // Re-assigning a key inside the same block does not cancel the block.
            if prev.group != group {
                self.cancel(&prev);
            }
        }
    }

    /// Drop the transition on `key`, if any. The model value shows immediately.
    pub fn remove_animation(&mut self, key: &str) {
        if let Some(prev) = self.animations.remove(key) {
            self.cancel(&prev);
        }
    }

    fn cancel(&mut self, prev: &Transition) {
        if let Some(group) = prev.group {
            tracing::debug!(key = %prev.key_path, group = group.0, "transition cancelled");
            self.cancelled_groups.insert(group);
        }
    }

    pub fn animation(&self, key: &str) -> Option<&Transition> {
        self.animations.get(key)
    }

    pub fn animations(&self) -> impl Iterator<Item = &Transition> {
        self.animations.values()
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Remove transitions that have run to completion at `now_secs` and return them.
    pub fn prune_finished(&mut self, now_secs: f64) -> Vec<Transition> {
        let finished_keys: Vec<String> = self
            .animations
            .iter()
            .filter(|(_, t)| t.is_finished(now_secs))
            .map(|(k, _)| k.clone())
            .collect();
        finished_keys
            .into_iter()
            .filter_map(|k| self.animations.remove(&k))
            .collect()
    }

    pub fn is_group_active(&self, group: GroupId) -> bool {
        self.animations.values().any(|t| t.group == Some(group))
    }

    /// Whether any transition of `group` was cancelled before finishing. Clears the record.
    ///
    /// Records are only cleared here. Whoever drives animate blocks must call this once per
    /// group after it retires (the stage does so for every block it runs); blocks run straight
    /// through [`Animator`](crate::animation::driver::Animator) leave their record behind.
    pub fn take_cancelled(&mut self, group: GroupId) -> bool {
        self.cancelled_groups.remove(&group)
    }

    /// Request a redraw. Requests coalesce until the layer is displayed.
    pub fn set_needs_display(&mut self) {
        if !self.needs_display {
            self.needs_display = true;
            self.display_requests += 1;
        }
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    /// Number of coalesced redraw requests made over the layer's lifetime.
    pub fn display_requests(&self) -> u64 {
        self.display_requests
    }

    pub fn mark_displayed(&mut self) {
        self.needs_display = false;
    }

    pub fn mask(&self) -> Option<&ClipMask> {
        self.mask.as_ref()
    }

    pub fn set_mask(&mut self, mask: Option<ClipMask>) {
        self.mask = mask;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/core.rs"]
mod tests;
