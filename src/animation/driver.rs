use crate::{
    animation::{
        timing::TimingCurve,
        transition::{GroupId, Transition},
    },
    foundation::error::{DistortionError, DistortionResult},
};

/// Options of a declarative "animate over `duration_secs`" block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationOptions {
    pub duration_secs: f64,
    #[serde(default)]
    pub delay_secs: f64,
    #[serde(default)]
    pub timing: TimingCurve,
    #[serde(default)]
    pub autoreverse: bool,
}

impl AnimationOptions {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            delay_secs: 0.0,
            timing: TimingCurve::default(),
            autoreverse: false,
        }
    }

    pub fn with_delay(mut self, delay_secs: f64) -> Self {
        self.delay_secs = delay_secs;
        self
    }

    pub fn with_timing(mut self, timing: impl Into<TimingCurve>) -> Self {
        self.timing = timing.into();
        self
    }

    pub fn autoreversing(mut self) -> Self {
        self.autoreverse = true;
        self
    }

    /// Rejects negative or non-finite times and springs that would never settle.
    pub fn validate(&self) -> DistortionResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(DistortionError::animation(
                "animation duration_secs must be finite and >= 0",
            ));
        }
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            return Err(DistortionError::animation(
                "animation delay_secs must be finite and >= 0",
            ));
        }
        if let TimingCurve::Spring(s) = self.timing {
            if !s.damping.is_finite() || s.damping <= 0.0 {
                return Err(DistortionError::animation("spring damping must be > 0"));
            }
            if !s.initial_velocity.is_finite() {
                return Err(DistortionError::animation(
                    "spring initial_velocity must be finite",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveAnimation {
    pub options: AnimationOptions,
    pub group: GroupId,
}

/// Context every property assignment runs in.
///
/// Outside an animate block the transaction is immediate and assignments jump. Inside one,
/// layers may answer the assignment with a [`Transition`] built from the block's options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transaction {
    now_secs: f64,
    animation: Option<ActiveAnimation>,
}

impl Transaction {
    pub fn immediate(now_secs: f64) -> Self {
        Self {
            now_secs,
            animation: None,
        }
    }

    pub fn animated(now_secs: f64, options: AnimationOptions, group: GroupId) -> Self {
        Self {
            now_secs,
            animation: Some(ActiveAnimation { options, group }),
        }
    }

    pub fn now_secs(&self) -> f64 {
        self.now_secs
    }

    pub fn animation(&self) -> Option<&ActiveAnimation> {
        self.animation.as_ref()
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    /// A transition for `key_path` carrying this block's timing, with both endpoints unset.
    /// `None` outside an animate block.
    pub fn transition_for(&self, key_path: &str) -> Option<Transition> {
        let active = self.animation?;
        Some(Transition {
            delay_secs: active.options.delay_secs,
            timing: active.options.timing,
            autoreverses: active.options.autoreverse,
            group: Some(active.group),
            ..Transition::new(key_path, self.now_secs, active.options.duration_secs)
        })
    }
}

/// Host animation driver: hands out transactions and group ids.
#[derive(Debug, Default)]
pub struct Animator {
    next_group: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn immediate(&self, now_secs: f64) -> Transaction {
        Transaction::immediate(now_secs)
    }

    pub fn begin(&mut self, now_secs: f64, options: AnimationOptions) -> Transaction {
        Transaction::animated(now_secs, options, self.next_group_id())
    }

    /// Run `f` inside an animate block: every assignment made through the provided transaction
    /// shares one begin time and one group.
    pub fn animate<V: ?Sized, R>(
        &mut self,
        now_secs: f64,
        options: AnimationOptions,
        target: &mut V,
        f: impl FnOnce(&mut V, &Transaction) -> R,
    ) -> (GroupId, R) {
        let group = self.next_group_id();
        tracing::debug!(group = group.0, now_secs, "animate block");
        let txn = Transaction::animated(now_secs, options, group);
        (group, f(target, &txn))
    }

    fn next_group_id(&mut self) -> GroupId {
        let group = GroupId(self.next_group);
        self.next_group += 1;
        group
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
