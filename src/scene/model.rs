use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{
    animation::{driver::AnimationOptions, ease::Ease, spring::Spring},
    foundation::{
        core::{Canvas, Fps, Rect, Rgba8Premul, hex_color},
        error::{DistortionError, DistortionResult},
    },
    view::Assignment,
};

/// JSON-facing description of a stage: views plus a schedule of property changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneSpec {
    pub canvas: Canvas,
    pub fps: Fps,
    pub duration_secs: f64,
    #[serde(with = "hex_color", default = "default_background")]
    pub background: Rgba8Premul,
    pub views: Vec<ViewSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

fn default_background() -> Rgba8Premul {
    Rgba8Premul::WHITE
}

fn default_view_color() -> Rgba8Premul {
    Rgba8Premul::opaque(0x9e, 0x9e, 0x9e)
}

fn one() -> f64 {
    1.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Plain,
    Distortion,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewSpec {
    pub id: String,
    pub kind: ViewKind,
    /// `[x, y, width, height]` in stage pixels.
    pub frame: [f64; 4],
    #[serde(with = "hex_color", default = "default_view_color")]
    pub background: Rgba8Premul,
    #[serde(default = "one")]
    pub opacity: f64,
    #[serde(default)]
    pub distortion: f64,
}

impl ViewSpec {
    pub fn frame_rect(&self) -> Rect {
        let [x, y, w, h] = self.frame;
        Rect::new(x, y, x + w, y + h)
    }
}

/// Something that happens to one view at `at_secs`: immediate assignments first, then an
/// optional animate block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActionSpec {
    pub at_secs: f64,
    pub target: String,
    #[serde(default)]
    pub set: Vec<Assignment>,
    #[serde(default)]
    pub animate: Option<AnimateSpec>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimateSpec {
    #[serde(flatten)]
    pub options: AnimationOptions,
    pub values: Vec<Assignment>,
    /// Applied immediately once the block finishes, unless it was interrupted.
    #[serde(default)]
    pub on_complete: Vec<Assignment>,
}

impl SceneSpec {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> DistortionResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DistortionError::serde(format!("parse scene JSON: {e}")))
    }

    pub fn from_json_str(s: &str) -> DistortionResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| DistortionError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DistortionResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DistortionError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> DistortionResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DistortionError::serde(format!("serialize scene JSON: {e}")))
    }

    pub fn duration_frames(&self) -> u64 {
        (self.duration_secs * self.fps.as_f64()).ceil().max(0.0) as u64
    }

    pub fn view(&self, id: &str) -> Option<&ViewSpec> {
        self.views.iter().find(|v| v.id == id)
    }

    pub fn validate(&self) -> DistortionResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(DistortionError::validation("fps must have num>0 and den>0"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(DistortionError::validation("canvas width/height must be > 0"));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(DistortionError::validation(
                "canvas width/height must fit in 16 bits",
            ));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(DistortionError::validation(
                "duration_secs must be finite and > 0",
            ));
        }

        let mut ids = BTreeSet::new();
        for view in &self.views {
            if view.id.trim().is_empty() {
                return Err(DistortionError::validation("view id must be non-empty"));
            }
            if !ids.insert(view.id.as_str()) {
                return Err(DistortionError::validation(format!(
                    "duplicate view id '{}'",
                    view.id
                )));
            }
            let [x, y, w, h] = view.frame;
            if ![x, y, w, h].iter().all(|v| v.is_finite()) || w <= 0.0 || h <= 0.0 {
                return Err(DistortionError::validation(format!(
                    "view '{}' frame must be finite with width/height > 0",
                    view.id
                )));
            }
            check_assignment(view, &Assignment::Opacity(view.opacity))?;
            if view.kind == ViewKind::Distortion || view.distortion != 0.0 {
                check_assignment(view, &Assignment::Distortion(view.distortion))?;
            }
        }

        for action in &self.actions {
            if !action.at_secs.is_finite() || action.at_secs < 0.0 {
                return Err(DistortionError::validation(format!(
                    "action on '{}': at_secs must be finite and >= 0",
                    action.target
                )));
            }
            let Some(view) = self.view(&action.target) else {
                return Err(DistortionError::validation(format!(
                    "action targets unknown view '{}'",
                    action.target
                )));
            };
            for a in &action.set {
                check_assignment(view, a)?;
            }
            if let Some(animate) = &action.animate {
                animate.options.validate()?;
                for a in animate.values.iter().chain(&animate.on_complete) {
                    check_assignment(view, a)?;
                }
            }
        }
        Ok(())
    }

    /// The four demo squares, each button pressed at `t = 0.25s`:
    ///
    /// 1. a plain view fading red → blue,
    /// 2. a distortion view going red/flat → blue/pillow,
    /// 3. the same with a bouncy spring,
    /// 4. the same easing out and auto-reversing, reset to red/flat on completion.
    pub fn demo() -> Self {
        const SIDE: f64 = 100.0;
        const GAP: f64 = 20.0;
        const PRESS: f64 = 0.25;

        let view = |i: usize, id: &str, kind: ViewKind| ViewSpec {
            id: id.to_owned(),
            kind,
            frame: [GAP + (SIDE + GAP) * i as f64, GAP, SIDE, SIDE],
            background: default_view_color(),
            opacity: 1.0,
            distortion: 0.0,
        };
        let reset = |kind: ViewKind| {
            let mut set = vec![Assignment::BackgroundColor(Rgba8Premul::RED)];
            if kind == ViewKind::Distortion {
                set.push(Assignment::Distortion(0.0));
            }
            set
        };
        let press = |id: &str,
                     kind: ViewKind,
                     options: AnimationOptions,
                     on_complete: Vec<Assignment>| {
            let mut values = vec![Assignment::BackgroundColor(Rgba8Premul::BLUE)];
            if kind == ViewKind::Distortion {
                values.push(Assignment::Distortion(1.0));
            }
            ActionSpec {
                at_secs: PRESS,
                target: id.to_owned(),
                set: reset(kind),
                animate: Some(AnimateSpec {
                    options,
                    values,
                    on_complete,
                }),
            }
        };

        Self {
            canvas: Canvas {
                width: (GAP + (SIDE + GAP) * 4.0) as u32,
                height: (SIDE + GAP * 2.0) as u32,
            },
            fps: Fps { num: 60, den: 1 },
            duration_secs: 2.5,
            background: default_background(),
            views: vec![
                view(0, "square1", ViewKind::Plain),
                view(1, "square2", ViewKind::Distortion),
                view(2, "square3", ViewKind::Distortion),
                view(3, "square4", ViewKind::Distortion),
            ],
            actions: vec![
                press(
                    "square1",
                    ViewKind::Plain,
                    AnimationOptions::new(1.0),
                    Vec::new(),
                ),
                press(
                    "square2",
                    ViewKind::Distortion,
                    AnimationOptions::new(1.0),
                    Vec::new(),
                ),
                press(
                    "square3",
                    ViewKind::Distortion,
                    AnimationOptions::new(1.0).with_timing(Spring::new(0.2, 0.4)),
                    Vec::new(),
                ),
                press(
                    "square4",
                    ViewKind::Distortion,
                    AnimationOptions::new(1.0)
                        .with_timing(Ease::OutCubic)
                        .autoreversing(),
                    reset(ViewKind::Distortion),
                ),
            ],
        }
    }
}

fn check_assignment(view: &ViewSpec, a: &Assignment) -> DistortionResult<()> {
    if matches!(a, Assignment::Distortion(_)) && view.kind == ViewKind::Plain {
        return Err(DistortionError::validation(format!(
            "view '{}' is plain and has no distortion property",
            view.id
        )));
    }
    if !a.is_finite() {
        return Err(DistortionError::validation(format!(
            "view '{}': assigned values must be finite",
            view.id
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
