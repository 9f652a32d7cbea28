use crate::foundation::core::{Fps, FrameIndex};

/// Display-refresh clock: maps frame ticks to stage time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayLink {
    fps: Fps,
}

impl DisplayLink {
    pub fn new(fps: Fps) -> Self {
        Self { fps }
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn time_secs(&self, frame: FrameIndex) -> f64 {
        self.fps.frames_to_secs(frame.0)
    }

    /// Last frame whose timestamp is not after `secs`.
    pub fn frame_at(&self, secs: f64) -> FrameIndex {
        let f = self.fps.secs_to_frames_floor(secs);
        // Float error can put the exact frame timestamp one tick early.
        if self.time_secs(FrameIndex(f + 1)) <= secs {
            FrameIndex(f + 1)
        } else {
            FrameIndex(f)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/clock.rs"]
mod tests;
