//! View-window derivation and curve-space to pixel-space mapping.

use crate::consts::{
    STAGE_GAP, WINDOW_H_GROWTH, WINDOW_H_MIN, WINDOW_W_GROWTH, WINDOW_W_MIN,
};
use crate::core::{Canvas, Point};

/// The currently visible spans of the plot, derived fresh each frame.
///
/// `w` is the visible time-span, `h` the visible value-span. Both have floors
/// (10 and 2) applied by [`ViewWindow::for_round`], so every mapper built from
/// a window is free of degenerate divisions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewWindow {
    pub w: f64,
    pub h: f64,
}

impl ViewWindow {
    /// Window for a round at `elapsed` seconds with current curve `value`.
    pub fn for_round(elapsed: f64, value: f64) -> Self {
        Self {
            w: (elapsed * WINDOW_W_GROWTH).max(WINDOW_W_MIN),
            h: (value * WINDOW_H_GROWTH).max(WINDOW_H_MIN),
        }
    }
}

/// Pixel-space geometry of the plot area inside the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    /// Bottom-left corner of the plot, where both axes meet.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Stage {
    pub fn for_canvas(canvas: Canvas) -> Self {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        Self {
            origin: Point::new(STAGE_GAP, h - STAGE_GAP),
            width: w - STAGE_GAP * 2.0,
            height: h - STAGE_GAP * 2.0,
        }
    }
}

/// Maps `(time, value)` pairs into pixel coordinates for one frame.
///
/// Callers guarantee `window.w > 0` and `window.h > 0` (the state machine's
/// window floors); the mapper does not re-check.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateMapper {
    pub stage: Stage,
    pub window: ViewWindow,
}

impl CoordinateMapper {
    pub fn new(stage: Stage, window: ViewWindow) -> Self {
        Self { stage, window }
    }

    /// Map curve-space `(t, value)` to a pixel point.
    pub fn map(&self, t: f64, value: f64) -> Point {
        Point::new(
            self.stage.origin.x + self.stage.width / self.window.w * t,
            self.stage.origin.y - self.stage.height / self.window.h * value,
        )
    }

    /// Inverse of [`map`](Self::map): pixel point back to `(t, value)`.
    pub fn unmap(&self, p: Point) -> (f64, f64) {
        (
            (p.x - self.stage.origin.x) * self.window.w / self.stage.width,
            (self.stage.origin.y - p.y) * self.window.h / self.stage.height,
        )
    }
}
