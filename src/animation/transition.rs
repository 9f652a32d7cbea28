use crate::animation::{timing::TimingCurve, value::AnimValue};

/// Identifier shared by every transition created inside one animate block.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct GroupId(pub u64);

/// A property transition attached to a layer.
///
/// `from` and `to` are optional: a missing endpoint resolves to the property's model value at
/// sampling time. Clearing `to` is how a transition picks up the value assigned by the animate
/// block that created it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transition {
    pub key_path: String,
    pub from: Option<AnimValue>,
    pub to: Option<AnimValue>,
    /// Stage time at which the transition was added.
    pub begin_secs: f64,
    #[serde(default)]
    pub delay_secs: f64,
    pub duration_secs: f64,
    #[serde(default)]
    pub timing: TimingCurve,
    #[serde(default)]
    pub autoreverses: bool,
    #[serde(default)]
    pub group: Option<GroupId>,
}

impl Transition {
    pub fn new(key_path: impl Into<String>, begin_secs: f64, duration_secs: f64) -> Self {
        Self {
            key_path: key_path.into(),
            from: None,
            to: None,
            begin_secs,
            delay_secs: 0.0,
            duration_secs,
            timing: TimingCurve::default(),
            autoreverses: false,
            group: None,
        }
    }

    /// Active span after the delay (doubled when autoreversing).
    pub fn active_secs(&self) -> f64 {
        let d = self.duration_secs.max(0.0);
        if self.autoreverses { d * 2.0 } else { d }
    }

    /// Stage time at which the transition is removed.
    pub fn end_secs(&self) -> f64 {
        self.begin_secs + self.delay_secs.max(0.0) + self.active_secs()
    }

    pub fn is_finished(&self, now_secs: f64) -> bool {
        now_secs >= self.end_secs()
    }

    /// Interpolated value at `now_secs`, or `None` once the transition has finished and the
    /// model value should show through.
    pub fn value_at(&self, now_secs: f64, model: AnimValue) -> Option<AnimValue> {
        if self.is_finished(now_secs) {
            return None;
        }
        let from = self.from.unwrap_or(model);
        let to = self.to.unwrap_or(model);

        let local = now_secs - self.begin_secs - self.delay_secs.max(0.0);
        if local <= 0.0 {
            // Backwards fill while waiting out the delay.
            return Some(from);
        }

        let duration = self.duration_secs.max(0.0);
        let mut u = local / duration;
        if self.autoreverses && u > 1.0 {
            u = 2.0 - u;
        }
        let eased = self.timing.apply(u.clamp(0.0, 1.0), duration);
        Some(AnimValue::interpolate(from, to, eased))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
