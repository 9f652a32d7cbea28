pub mod core;
pub mod scalar;

use crate::animation::{driver::Transaction, transition::Transition, value::AnimValue};
use crate::foundation::core::Size;

use self::core::LayerCore;

/// A renderable layer: the capability set views build on.
///
/// Implementors own a [`LayerCore`] and may override which keys trigger a redraw and which
/// transition (if any) an assignment runs.
pub trait Layer {
    fn core(&self) -> &LayerCore;

    fn core_mut(&mut self) -> &mut LayerCore;

    /// Whether a change of `key` invalidates the layer's drawn content.
    fn needs_display_for_key(&self, _key: &str) -> bool {
        false
    }

    /// Transition to run when `key` is assigned under `txn`, or `None` for a discrete jump.
    fn action_for_key(&mut self, key: &str, txn: &Transaction) -> Option<Transition> {
        self.core().default_action(key, txn)
    }

    /// Assign `value` to `key`, running the action lookup against the pre-assignment state.
    ///
    /// Without an action the value jumps: any transition on the key is dropped and, for keys
    /// that affect drawing, a redraw is requested.
    fn set_value(&mut self, key: &str, value: AnimValue, txn: &Transaction) {
        let action = self.action_for_key(key, txn);
        let redraw = self.needs_display_for_key(key);
        let core = self.core_mut();
        core.set_model_value(key, value);
        match action {
            Some(transition) => core.add_animation(transition),
            None => {
                core.remove_animation(key);
                if redraw {
                    core.set_needs_display();
                }
            }
        }
    }

    /// Whether the display pass at `now_secs` has to redraw this layer.
    fn needs_display_at(&self, now_secs: f64) -> bool {
        let core = self.core();
        core.needs_display()
            || core
                .animations()
                .any(|t| self.needs_display_for_key(&t.key_path) && !t.is_finished(now_secs))
    }
}

/// Layer with only the base properties (background color, opacity).
#[derive(Clone, Debug)]
pub struct BasicLayer {
    core: LayerCore,
}

impl BasicLayer {
    pub fn new(bounds: Size) -> Self {
        Self {
            core: LayerCore::new(bounds),
        }
    }
}

impl Layer for BasicLayer {
    fn core(&self) -> &LayerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LayerCore {
        &mut self.core
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/basic.rs"]
mod tests;
