use crate::animation::{ease::Ease, spring::Spring};

/// Maps linear transition progress to the progress that is actually displayed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingCurve {
    Ease(Ease),
    Spring(Spring),
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::Ease(Ease::default())
    }
}

impl TimingCurve {
    /// `u` is the linear progress in `[0, 1]`; springs need the duration to fit their
    /// frequency. The result may leave `[0, 1]` for springs (overshoot).
    pub fn apply(self, u: f64, duration_secs: f64) -> f64 {
        match self {
            Self::Ease(ease) => ease.apply(u),
            Self::Spring(spring) => spring.apply(u, duration_secs),
        }
    }
}

impl From<Ease> for TimingCurve {
    fn from(ease: Ease) -> Self {
        Self::Ease(ease)
    }
}

impl From<Spring> for TimingCurve {
    fn from(spring: Spring) -> Self {
        Self::Spring(spring)
    }
}
