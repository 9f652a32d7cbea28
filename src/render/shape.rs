use kurbo::Shape as _;

use crate::{
    foundation::core::{BezPath, Point, Rect, Size},
    layer::core::LayerCore,
};

/// `d = max(w, h) / BULGE_DIVISOR * s`.
pub const BULGE_DIVISOR: f64 = 8.0;

/// Closed path restricting which pixels of a layer are visible, in layer-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipMask {
    path: BezPath,
}

impl ClipMask {
    pub fn new(path: BezPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &BezPath {
        &self.path
    }

    pub fn bounding_box(&self) -> Rect {
        self.path.bounding_box()
    }

    /// Nonzero-winding containment test.
    pub fn contains(&self, p: Point) -> bool {
        self.path.contains(p)
    }
}

/// Corner and control points of the pillow outline, clockwise from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PillowGeometry {
    pub bulge: f64,
    pub corners: [Point; 4],
    /// `controls[i]` shapes the edge from `corners[i]` to `corners[(i + 1) % 4]`.
    pub controls: [Point; 4],
}

/// Rebuilds the pillow clip mask of a layer from its in-flight distortion value.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShapeRenderer;

impl ShapeRenderer {
    pub fn bulge(size: Size, distortion: f64) -> f64 {
        size.width.max(size.height) / BULGE_DIVISOR * distortion
    }

    pub fn geometry(size: Size, distortion: f64) -> PillowGeometry {
        let (w, h) = (size.width, size.height);
        let d = Self::bulge(size, distortion);
        PillowGeometry {
            bulge: d,
            corners: [
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(w, h),
                Point::new(0.0, h),
            ],
            controls: [
                Point::new(w / 2.0, d),
                Point::new(w - d, h / 2.0),
                Point::new(w / 2.0, h - d),
                Point::new(d, h / 2.0),
            ],
        }
    }

    /// Closed outline: four quadratic edges through the displaced midpoints.
    ///
    /// At `distortion == 0` every control point is its edge's midpoint, so each edge is a
    /// straight segment and the outline is exactly the `w × h` rectangle.
    pub fn pillow_path(size: Size, distortion: f64) -> BezPath {
        let g = Self::geometry(size, distortion);
        let mut path = BezPath::new();
        path.move_to(g.corners[0]);
        for i in 0..4 {
            path.quad_to(g.controls[i], g.corners[(i + 1) % 4]);
        }
        path.close_path();
        path
    }

    /// Display callback body: install the pillow mask for the in-flight value of `key`.
    ///
    /// Without a presentation snapshot the frame is skipped and the previous mask stays.
    /// Returns whether the mask was rebuilt.
    pub fn display(&self, core: &mut LayerCore, now_secs: f64, key: &str) -> bool {
        let Some(distortion) = core
            .presentation(now_secs)
            .and_then(|snapshot| snapshot.scalar(key))
        else {
            tracing::trace!(key, now_secs, "no snapshot, keeping stale mask");
            return false;
        };
        let path = Self::pillow_path(core.bounds(), distortion);
        tracing::trace!(key, now_secs, distortion, "mask rebuilt");
        core.set_mask(Some(ClipMask::new(path)));
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shape.rs"]
mod tests;
