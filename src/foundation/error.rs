/// Convenience result type used across the crate.
pub type DistortionResult<T> = Result<T, DistortionError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The animation core itself never fails: a missing presentation snapshot or transition
/// template degrades to an immediate redraw. Errors surface at the edges (scene parsing,
/// assignments a view cannot accept, rasterization).
#[derive(thiserror::Error, Debug)]
pub enum DistortionError {
    /// Invalid user-provided or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Animate-block options that cannot produce a transition.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while rasterizing a stage frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DistortionError {
    /// Build a [`DistortionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DistortionError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`DistortionError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DistortionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
