/// Residual amplitude of the spring envelope at the end of the transition.
const SETTLE_RESIDUAL: f64 = 1e-3;

/// Damped-spring timing, parameterized the way animate-with-spring blocks are: a damping
/// ratio and an initial velocity, fitted to a fixed duration.
///
/// `damping` is the damping ratio `ζ`. Values below `1` oscillate around the target; `1` and
/// above are treated as critically damped. `initial_velocity` is expressed in units of the
/// total travel distance per second.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spring {
    pub damping: f64,
    #[serde(default)]
    pub initial_velocity: f64,
}

impl Spring {
    pub fn new(damping: f64, initial_velocity: f64) -> Self {
        Self {
            damping,
            initial_velocity,
        }
    }

    /// Map linear progress `u` over a transition of `duration_secs` to spring progress.
    ///
    /// The natural frequency is chosen so the envelope has decayed to [`SETTLE_RESIDUAL`] when
    /// `u` reaches `1`, where progress is pinned to exactly `1`.
    pub fn apply(self, u: f64, duration_secs: f64) -> f64 {
        if u <= 0.0 {
            return 0.0;
        }
        if u >= 1.0 || duration_secs <= 0.0 {
            return 1.0;
        }

        let zeta = self.damping.clamp(1e-3, 1.0);
        let omega = (1.0 / SETTLE_RESIDUAL).ln() / (zeta * duration_secs);
        let v0 = self.initial_velocity;
        let t = u * duration_secs;

        // Displacement from the target: y(0) = 1, y'(0) = -v0.
        let y = if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * t).exp();
            decay * ((omega_d * t).cos() + ((zeta * omega - v0) / omega_d) * (omega_d * t).sin())
        } else {
            (-omega * t).exp() * (1.0 + (omega - v0) * t)
        };
        1.0 - y
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
