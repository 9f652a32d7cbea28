use crate::{
    animation::{
        driver::{AnimationOptions, Animator},
        transition::GroupId,
    },
    foundation::{
        core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8Premul},
        error::{DistortionError, DistortionResult},
    },
    host::clock::DisplayLink,
    render::raster::{CpuRasterizer, FrameRGBA},
    scene::model::{ActionSpec, SceneSpec, ViewKind},
    view::{Assignment, DistortionView, PlainView, View},
};

/// Slack when comparing schedule times against tick times.
const TIME_EPS: f64 = 1e-9;

#[derive(Debug)]
struct PendingCompletion {
    view: usize,
    group: GroupId,
    on_complete: Vec<Assignment>,
}

/// Host of a set of views: owns them, drives the animation clock and runs the display pass.
///
/// Everything happens on the caller's thread. Time only moves forward, one display-refresh
/// tick per frame.
pub struct Stage {
    canvas: Canvas,
    background: Rgba8Premul,
    clock: DisplayLink,
    animator: Animator,
    views: Vec<Box<dyn View>>,
    schedule: Vec<ActionSpec>,
    next_action: usize,
    pending: Vec<PendingCompletion>,
    current: Option<FrameIndex>,
    now_secs: f64,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("canvas", &self.canvas)
            .field("views", &self.views.iter().map(|v| v.id()).collect::<Vec<_>>())
            .field("current", &self.current)
            .field("now_secs", &self.now_secs)
            .finish_non_exhaustive()
    }
}

impl Stage {
    pub fn new(canvas: Canvas, fps: Fps, background: Rgba8Premul) -> Self {
        Self {
            canvas,
            background,
            clock: DisplayLink::new(fps),
            animator: Animator::new(),
            views: Vec::new(),
            schedule: Vec::new(),
            next_action: 0,
            pending: Vec::new(),
            current: None,
            now_secs: 0.0,
        }
    }

    /// Build the views of `scene` with their initial values and queue its actions.
    pub fn from_scene(scene: &SceneSpec) -> DistortionResult<Self> {
        scene.validate()?;
        let mut stage = Self::new(scene.canvas, scene.fps, scene.background);
        let txn = stage.animator.immediate(0.0);
        for spec in &scene.views {
            let mut view: Box<dyn View> = match spec.kind {
                ViewKind::Plain => Box::new(PlainView::new(spec.id.clone(), spec.frame_rect())),
                ViewKind::Distortion => {
                    let mut v = DistortionView::new(spec.id.clone(), spec.frame_rect());
                    v.set_distortion(spec.distortion, &txn);
                    Box::new(v)
                }
            };
            view.set_background_color(spec.background, &txn);
            view.set_opacity(spec.opacity, &txn);
            stage.add_view(view)?;
        }
        for action in &scene.actions {
            stage.schedule(action.clone())?;
        }
        Ok(stage)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn background(&self) -> Rgba8Premul {
        self.background
    }

    pub fn clock(&self) -> DisplayLink {
        self.clock
    }

    pub fn now_secs(&self) -> f64 {
        self.now_secs
    }

    /// Last frame ticked, `None` before the first tick.
    pub fn current_frame(&self) -> Option<FrameIndex> {
        self.current
    }

    /// Add a view and commit its layer so it has a presentation from now on.
    pub fn add_view(&mut self, mut view: Box<dyn View>) -> DistortionResult<usize> {
        if self.index_of(view.id()).is_some() {
            return Err(DistortionError::validation(format!(
                "duplicate view id '{}'",
                view.id()
            )));
        }
        view.layer_mut().core_mut().commit();
        view.layer_mut().core_mut().set_needs_display();
        self.views.push(view);
        Ok(self.views.len() - 1)
    }

    pub fn views(&self) -> impl Iterator<Item = &dyn View> {
        self.views.iter().map(|v| v.as_ref())
    }

    pub fn view(&self, id: &str) -> Option<&dyn View> {
        self.index_of(id).map(|i| self.views[i].as_ref())
    }

    pub fn view_mut(&mut self, id: &str) -> Option<&mut (dyn View + 'static)> {
        let i = self.index_of(id)?;
        Some(self.views[i].as_mut())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.views.iter().position(|v| v.id() == id)
    }

    fn require(&self, id: &str) -> DistortionResult<usize> {
        self.index_of(id)
            .ok_or_else(|| DistortionError::validation(format!("unknown view '{id}'")))
    }

    /// Every assignment is checked up front so a rejected batch changes nothing.
    fn check(&self, view: usize, assignments: &[Assignment]) -> DistortionResult<()> {
        assignments
            .iter()
            .try_for_each(|a| self.views[view].accepts(a))
    }

    /// Queue `action` to run on the first tick at or after `action.at_secs`.
    pub fn schedule(&mut self, action: ActionSpec) -> DistortionResult<()> {
        let i = self.require(&action.target)?;
        if !action.at_secs.is_finite() || action.at_secs < 0.0 {
            return Err(DistortionError::validation(
                "action at_secs must be finite and >= 0",
            ));
        }
        self.check(i, &action.set)?;
        if let Some(animate) = &action.animate {
            animate.options.validate()?;
            self.check(i, &animate.values)?;
            self.check(i, &animate.on_complete)?;
        }
        // Keep the unprocessed tail sorted; equal times run in insertion order.
        let tail = &self.schedule[self.next_action..];
        let at = tail.partition_point(|a| a.at_secs <= action.at_secs);
        self.schedule.insert(self.next_action + at, action);
        Ok(())
    }

    /// Assign values to a view immediately (no transition).
    pub fn set(&mut self, id: &str, assignments: &[Assignment]) -> DistortionResult<()> {
        let i = self.require(id)?;
        self.check(i, assignments)?;
        let txn = self.animator.immediate(self.now_secs);
        for a in assignments {
            self.views[i].apply(a, &txn)?;
        }
        Ok(())
    }

    /// Run an animate block on a view at the current time.
    ///
    /// `on_complete` is applied immediately once every transition of the block has finished,
    /// and skipped if any of them was interrupted.
    pub fn animate(
        &mut self,
        id: &str,
        options: AnimationOptions,
        values: &[Assignment],
        on_complete: Vec<Assignment>,
    ) -> DistortionResult<GroupId> {
        options.validate()?;
        let i = self.require(id)?;
        self.check(i, values)?;
        self.check(i, &on_complete)?;
        let (group, applied) = self.animator.animate(
            self.now_secs,
            options,
            self.views[i].as_mut(),
            |view, txn| -> DistortionResult<()> {
                for a in values {
                    view.apply(a, txn)?;
                }
                Ok(())
            },
        );
        applied?;
        self.pending.push(PendingCompletion {
            view: i,
            group,
            on_complete,
        });
        Ok(group)
    }

    /// Tick every frame up to and including `frame`.
    pub fn advance_to(&mut self, frame: FrameIndex) -> DistortionResult<()> {
        let start = match self.current {
            None => 0,
            Some(cur) if cur <= frame => cur.0 + 1,
            Some(cur) => {
                return Err(DistortionError::validation(format!(
                    "stage is at frame {} and cannot rewind to {}",
                    cur.0, frame.0
                )));
            }
        };
        for f in start..=frame.0 {
            self.tick(FrameIndex(f))?;
        }
        Ok(())
    }

    /// Advance to `frame` and rasterize it.
    pub fn render_frame(
        &mut self,
        frame: FrameIndex,
        rasterizer: &mut CpuRasterizer,
    ) -> DistortionResult<FrameRGBA> {
        self.advance_to(frame)?;
        rasterizer.render(self)
    }

    /// Render every frame of `range` in order, handing each one to `sink`.
    pub fn render_frames<F>(
        &mut self,
        range: FrameRange,
        rasterizer: &mut CpuRasterizer,
        mut sink: F,
    ) -> DistortionResult<()>
    where
        F: FnMut(FrameIndex, FrameRGBA) -> DistortionResult<()>,
    {
        for frame in range.iter() {
            let rgba = self.render_frame(frame, rasterizer)?;
            sink(frame, rgba)?;
        }
        Ok(())
    }

    /// One display-refresh pass: retire finished transitions, fire completions, run due
    /// actions, then redraw whatever needs it.
    #[tracing::instrument(level = "trace", skip(self))]
    fn tick(&mut self, frame: FrameIndex) -> DistortionResult<()> {
        let now = self.clock.time_secs(frame);
        self.now_secs = now;
        self.current = Some(frame);

        for view in &mut self.views {
            let layer = view.layer_mut();
            let finished = layer.core_mut().prune_finished(now);
            if finished
                .iter()
                .any(|t| layer.needs_display_for_key(&t.key_path))
            {
                layer.core_mut().set_needs_display();
            }
        }
        self.fire_completions()?;
        self.run_due_actions()?;

        for view in &mut self.views {
            if view.layer().needs_display_at(now) {
                view.display(now);
            }
        }
        Ok(())
    }

    fn fire_completions(&mut self) -> DistortionResult<()> {
        let pending = std::mem::take(&mut self.pending);
        let mut still_pending = Vec::with_capacity(pending.len());
        for p in pending {
            let core = self.views[p.view].layer_mut().core_mut();
            if core.is_group_active(p.group) {
                still_pending.push(p);
                continue;
            }
            let finished = !core.take_cancelled(p.group);
            tracing::debug!(
                view = self.views[p.view].id(),
                group = p.group.0,
                finished,
                "animation completed"
            );
            if finished && !p.on_complete.is_empty() {
                let txn = self.animator.immediate(self.now_secs);
                for a in &p.on_complete {
                    self.views[p.view].apply(a, &txn)?;
                }
            }
        }
        self.pending = still_pending;
        Ok(())
    }

    fn run_due_actions(&mut self) -> DistortionResult<()> {
        while let Some(action) = self.schedule.get(self.next_action) {
            if action.at_secs > self.now_secs + TIME_EPS {
                break;
            }
            let action = action.clone();
            self.next_action += 1;
            tracing::debug!(target_view = %action.target, at_secs = action.at_secs, "running action");
            self.set(&action.target, &action.set)?;
            if let Some(animate) = action.animate {
                self.animate(
                    &action.target,
                    animate.options,
                    &animate.values,
                    animate.on_complete,
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/stage.rs"]
mod tests;
