//! Distortion is a small layer/animation host built around one trick: a custom scalar layer
//! property that animates in lockstep with the built-in ones.
//!
//! A view's `distortion` value `s` bends each edge of its rectangle inward into a "pillow"
//! outline. Assigning `s` inside an animate block produces a transition with the block's timing,
//! even though the host only knows how to animate its own properties.
//!
//! # Pipeline overview
//!
//! 1. **Assign**: views receive [`Assignment`]s, immediately or inside an animate block
//!    ([`Animator::animate`]); layers answer with [`Transition`]s.
//! 2. **Tick**: [`Stage::advance_to`] moves the display-refresh clock forward, retires finished
//!    transitions, runs scheduled scene actions and redraws layers that need it.
//! 3. **Display**: [`ShapeRenderer`] rebuilds the pillow [`ClipMask`] from the in-flight value.
//! 4. **Rasterize** (optional): [`CpuRasterizer`] turns the stage into premultiplied RGBA8.
//!
//! Everything runs on the caller's thread. `unsafe` is forbidden in this crate.
#![forbid(unsafe_code)]

pub mod animation;
pub mod foundation;
pub mod host;
pub mod layer;
pub mod render;
pub mod scene;
pub mod view;

pub use animation::driver::{ActiveAnimation, AnimationOptions, Animator, Transaction};
pub use animation::ease::Ease;
pub use animation::spring::Spring;
pub use animation::timing::TimingCurve;
pub use animation::transition::{GroupId, Transition};
pub use animation::value::{AnimValue, Lerp};
pub use foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, FrameRange, PathEl, Point, Rect, Rgba8Premul, Size,
};
pub use foundation::error::{DistortionError, DistortionResult};
pub use host::clock::DisplayLink;
pub use host::stage::Stage;
pub use layer::core::{BACKGROUND_COLOR, LayerCore, OPACITY, PresentationSnapshot};
pub use layer::scalar::{AnimatableScalarNode, DISTORTION_KEY};
pub use layer::{BasicLayer, Layer};
pub use render::raster::{CpuRasterizer, FrameRGBA};
pub use render::shape::{BULGE_DIVISOR, ClipMask, PillowGeometry, ShapeRenderer};
pub use scene::model::{ActionSpec, AnimateSpec, SceneSpec, ViewKind, ViewSpec};
pub use view::{Assignment, DistortionView, PlainView, View};
