//! The drawing-surface seam.
//!
//! Renderers talk to a [`Surface`] and never to a concrete rasterizer; the
//! CPU implementation lives in [`crate::render::cpu`] and tests substitute a
//! recording double. All coordinates are device pixels.

use crate::assets::PreparedImage;
use crate::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::error::LiftoffResult;

/// A color stop along a gradient, `offset` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba8,
}

/// Fill/stroke paint. Gradient geometry is expressed in device pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: Point,
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Build a gradient stop list from `(offset, color)` pairs.
    pub fn stops(pairs: &[(f64, Rgba8)]) -> Vec<GradientStop> {
        pairs
            .iter()
            .map(|&(offset, color)| GradientStop { offset, color })
            .collect()
    }
}

/// Drop shadow applied beneath a draw operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba8,
    pub offset_y: f64,
    pub blur: f64,
}

/// Stroke geometry and post-effects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    /// Blur applied to the stroked result itself, in pixels; 0 disables.
    pub blur: f64,
    pub shadow: Option<Shadow>,
}

/// Horizontal anchoring of drawn text relative to its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Text styling for a single draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub align: TextAlign,
    pub paint: Paint,
    pub alpha: f64,
    pub shadow: Option<Shadow>,
}

impl TextStyle {
    pub fn solid(size_px: f32, align: TextAlign, color: Rgba8) -> Self {
        Self {
            size_px,
            align,
            paint: Paint::Solid(color),
            alpha: 1.0,
            shadow: None,
        }
    }
}

/// Measured extents of laid-out text, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// A fixed-size 2D pixel canvas, the only output of the system.
///
/// The operations mirror what the render pipeline needs: filled primitives
/// and paths with gradient paints, stroked paths with glow/shadow effects,
/// transformed image blits, and measured text. `blur` parameters apply a
/// Gaussian-style filter to that operation's output before compositing.
pub trait Surface {
    fn canvas(&self) -> Canvas;

    fn fill_rect(
        &mut self,
        rect: Rect,
        paint: &Paint,
        alpha: f64,
        blur: f64,
    ) -> LiftoffResult<()>;

    fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        paint: &Paint,
        blur: f64,
    ) -> LiftoffResult<()>;

    fn fill_path(&mut self, path: &BezPath, paint: &Paint, alpha: f64) -> LiftoffResult<()>;

    fn stroke_path(
        &mut self,
        path: &BezPath,
        style: &StrokeStyle,
        paint: &Paint,
    ) -> LiftoffResult<()>;

    /// Blit `image` with `transform` mapping image pixel space to device
    /// space (scaling to a destination size is part of the transform).
    fn draw_image(&mut self, image: &PreparedImage, transform: Affine) -> LiftoffResult<()>;

    /// Draw `text` with its baseline at `origin`, returning its metrics.
    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        style: &TextStyle,
    ) -> LiftoffResult<TextMetrics>;

    fn measure_text(&mut self, text: &str, size_px: f32) -> LiftoffResult<TextMetrics>;
}
