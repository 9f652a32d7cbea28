use crate::{
    foundation::{
        core::{Affine, BezPath, PathEl, Rgba8Premul},
        error::{DistortionError, DistortionResult},
    },
    host::stage::Stage,
    layer::core::{BACKGROUND_COLOR, OPACITY},
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Premultiplied RGBA at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Convert to straight alpha in place (as image encoders expect).
    pub fn unpremultiply(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let c = Rgba8Premul {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            };
            px.copy_from_slice(&c.to_straight_rgba());
        }
        self.premultiplied = false;
    }
}

/// CPU rasterizer powered by `vello_cpu`.
///
/// Draws the stage background, then every view's presentation background color over its
/// frame, clipped to the view's mask when it has one.
#[derive(Default)]
pub struct CpuRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for CpuRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRasterizer")
            .field("has_ctx", &self.ctx.is_some())
            .finish()
    }
}

impl CpuRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(now_secs = stage.now_secs()))]
    pub fn render(&mut self, stage: &Stage) -> DistortionResult<FrameRGBA> {
        let canvas = stage.canvas();
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| DistortionError::render("canvas width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| DistortionError::render("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(DistortionError::render("canvas width/height must be > 0"));
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(stage.background()));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));

        let now = stage.now_secs();
        for view in stage.views() {
            let core = view.layer().core();
            let Some(snapshot) = core.presentation(now) else {
                continue;
            };
            let color = snapshot
                .color(BACKGROUND_COLOR)
                .unwrap_or_else(Rgba8Premul::transparent);
            let opacity = snapshot.scalar(OPACITY).unwrap_or(1.0).clamp(0.0, 1.0) as f32;
            if color.a == 0 || opacity <= 0.0 {
                continue;
            }

            let frame = view.frame();
            ctx.set_transform(affine_to_cpu(Affine::translate(frame.origin().to_vec2())));
            ctx.set_paint(color_to_cpu(color));
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            match core.mask() {
                Some(mask) => ctx.fill_path(&bezpath_to_cpu(mask.path())),
                None => ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    frame.width(),
                    frame.height(),
                )),
            }
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn color_to_cpu(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_straight_rgba();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
