use crate::foundation::core::Rgba8Premul;

pub trait Lerp: Sized {
    /// Interpolate from `a` to `b`. `t` is normally in `[0, 1]` but may overshoot.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Rgba8Premul {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn ch(a: u8, b: u8, t: f64) -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        }
        let a_out = ch(a.a, b.a, t);
        // Premultiplied channels can never exceed alpha.
        Self {
            r: ch(a.r, b.r, t).min(a_out),
            g: ch(a.g, b.g, t).min(a_out),
            b: ch(a.b, b.b, t).min(a_out),
            a: a_out,
        }
    }
}

/// A value a layer property can hold and a transition can interpolate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimValue {
    Scalar(f64),
    Color(Rgba8Premul),
}

impl AnimValue {
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    pub fn as_color(self) -> Option<Rgba8Premul> {
        match self {
            Self::Color(c) => Some(c),
            Self::Scalar(_) => None,
        }
    }

    /// Interpolate two values of the same kind. Mismatched kinds hold `a` until the end of the
    /// transition and then switch to `b`.
    pub fn interpolate(a: Self, b: Self, t: f64) -> Self {
        match (a, b) {
            (Self::Scalar(x), Self::Scalar(y)) => Self::Scalar(f64::lerp(&x, &y, t)),
            (Self::Color(x), Self::Color(y)) => Self::Color(Rgba8Premul::lerp(&x, &y, t)),
            _ => {
                if t < 1.0 {
                    a
                } else {
                    b
                }
            }
        }
    }
}

impl From<f64> for AnimValue {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Rgba8Premul> for AnimValue {
    fn from(c: Rgba8Premul) -> Self {
        Self::Color(c)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
